//! TmdbClient against a local fake of the movie-details endpoint

use enrichment::{AttributeCache, EnrichmentSource, EnrichmentStage, Lookup, TmdbClient};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const API_KEY: &str = "test-key";

/// Serves `/3/movie/550` (found), `/3/movie/7` (hangs) and 404 for everything
/// else. Requests without the right api key get a 401.
async fn spawn_fake_tmdb() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let request = String::from_utf8_lossy(&request);
                let target = request.split_whitespace().nth(1).unwrap_or_default().to_string();

                let (status, body) = if !target.contains(&format!("api_key={}", API_KEY)) {
                    ("401 Unauthorized", r#"{"status_code": 7}"#.to_string())
                } else if target.starts_with("/3/movie/550?") {
                    (
                        "200 OK",
                        r#"{"id": 550, "popularity": 61.4, "revenue": 100853753,
                            "tagline": "Mischief. Mayhem. Soap.", "vote_average": 8.4,
                            "vote_count": 26280}"#
                            .to_string(),
                    )
                } else if target.starts_with("/3/movie/7?") {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    ("200 OK", "{}".to_string())
                } else {
                    ("404 Not Found", r#"{"status_code": 34}"#.to_string())
                };

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

fn client(addr: SocketAddr, api_key: &str) -> TmdbClient {
    TmdbClient::new(api_key, format!("http://{}", addr), Duration::from_millis(500)).unwrap()
}

#[tokio::test]
async fn test_found_movie_decodes_fields() {
    let addr = spawn_fake_tmdb().await;
    let lookup = client(addr, API_KEY).fetch(550).await.unwrap();

    match lookup {
        Lookup::Found(entry) => {
            assert_eq!(entry.vote_average, Some(8.4));
            assert_eq!(entry.vote_count, Some(26280));
            assert_eq!(entry.tagline.as_deref(), Some("Mischief. Mayhem. Soap."));
        }
        other => panic!("expected Found, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_success_status_is_unavailable() {
    let addr = spawn_fake_tmdb().await;
    let lookup = client(addr, API_KEY).fetch(12345).await.unwrap();
    assert_eq!(lookup, Lookup::Unavailable { status: 404 });

    let lookup = client(addr, "wrong-key").fetch(550).await.unwrap();
    assert_eq!(lookup, Lookup::Unavailable { status: 401 });
}

#[tokio::test]
async fn test_timeout_is_an_error() {
    let addr = spawn_fake_tmdb().await;
    assert!(client(addr, API_KEY).fetch(7).await.is_err());
}

#[tokio::test]
async fn test_stage_over_http() {
    let addr = spawn_fake_tmdb().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");

    let mut cache = AttributeCache::load(&path).unwrap();
    let report = EnrichmentStage::new(Arc::new(client(addr, API_KEY)))
        .with_concurrency(2)
        .run(&mut cache, &[550, 12345, 7])
        .await
        .unwrap();

    assert_eq!(report.fetched, 1);
    assert_eq!(report.unavailable, 1);
    assert_eq!(report.failed, 1);

    let reloaded = AttributeCache::load(&path).unwrap();
    assert!(reloaded.contains(550));
    assert!(reloaded.is_known_miss(12345));
    // Timed-out lookups are retried next run
    assert!(!reloaded.contains(7));
    assert!(!reloaded.is_known_miss(7));
}
