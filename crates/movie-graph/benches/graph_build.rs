//! Benchmarks for graph construction
//!
//! Run with: cargo bench --package movie-graph
//!
//! Builds the graph for synthetic catalogs where every movie has three of
//! twenty genres, which is roughly the shape of the TMDb 5000 data.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::MovieId;
use movie_graph::{build_graph, to_json, GraphRow};

const GENRES: [&str; 20] = [
    "Action", "Adventure", "Animation", "Comedy", "Crime", "Documentary", "Drama", "Family",
    "Fantasy", "Foreign", "History", "Horror", "Music", "Mystery", "Romance", "Science Fiction",
    "TV Movie", "Thriller", "War", "Western",
];

fn synthetic_genres(count: usize) -> Vec<Vec<String>> {
    (0..count)
        .map(|i| {
            (0..3)
                .map(|k| GENRES[(i * 7 + k * 3) % GENRES.len()].to_string())
                .collect()
        })
        .collect()
}

fn bench_build_graph(c: &mut Criterion) {
    let genres = synthetic_genres(1035);

    c.bench_function("build_graph_1035", |b| {
        b.iter(|| {
            let rows = genres.iter().enumerate().map(|(i, g)| GraphRow {
                id: i as MovieId,
                title: "movie",
                genres: g,
            });
            black_box(build_graph(rows).unwrap())
        })
    });
}

fn bench_serialize_graph(c: &mut Criterion) {
    let genres = synthetic_genres(1035);
    let rows = genres.iter().enumerate().map(|(i, g)| GraphRow {
        id: i as MovieId,
        title: "movie",
        genres: g,
    });
    let graph = build_graph(rows).expect("Failed to build graph");

    c.bench_function("to_json_1035", |b| {
        b.iter(|| black_box(to_json(black_box(&graph)).unwrap()))
    });
}

criterion_group!(benches, bench_build_graph, bench_serialize_graph);
criterion_main!(benches);
