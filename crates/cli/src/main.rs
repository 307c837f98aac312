use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use data_loader::MovieId;
use movie_graph::{load_graph, GraphStats};
use pipeline::{EmptyMatchPolicy, Preferences, RankedCandidate};
use service::{
    BuildOrchestrator, DetailView, EnrichmentConfig, MovieQuery, RecommendationService, RunConfig,
    ServiceError,
};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

/// movie-graph - genre graph and recommendations over the TMDb 5000 dataset
#[derive(Parser)]
#[command(name = "movie-graph")]
#[command(about = "Build a movie genre graph and recommend movies from it", long_about = None)]
struct Cli {
    #[command(flatten)]
    paths: PathArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct PathArgs {
    /// Movies table (tmdb_5000_movies.csv)
    #[arg(long, global = true, default_value = "data/tmdb_5000_movies.csv")]
    movies: PathBuf,

    /// Credits table (tmdb_5000_credits.csv)
    #[arg(long, global = true, default_value = "data/tmdb_5000_credits.csv")]
    credits: PathBuf,

    /// Enrichment cache file
    #[arg(long, global = true, default_value = "data/tmdb_cache.json")]
    cache: PathBuf,

    /// Node-link graph file
    #[arg(long, global = true, default_value = "data/movie_graph.json")]
    graph: PathBuf,

    /// Number of movies kept after cleaning
    #[arg(long, global = true, default_value_t = data_loader::DEFAULT_CUTOFF)]
    cutoff: usize,

    /// Number of recommendations to show
    #[arg(long, global = true, default_value_t = pipeline::DEFAULT_TOP_K)]
    limit: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the tables, enrich from TMDb, build and save the graph
    Build {
        /// TMDb API key; without one only cached attributes are used
        #[arg(long, env = "TMDB_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// TMDb API root
        #[arg(long, default_value = enrichment::DEFAULT_TMDB_BASE_URL)]
        base_url: String,

        /// Maximum TMDb requests in flight
        #[arg(long, default_value_t = enrichment::DEFAULT_CONCURRENCY)]
        concurrency: usize,

        /// Per-request timeout in seconds
        #[arg(long, default_value_t = 10)]
        timeout_secs: u64,

        /// Ask again for movies TMDb had no data for in earlier runs
        #[arg(long)]
        retry_misses: bool,
    },

    /// Show node/edge counts of the saved graph file
    GraphStats,

    /// Show how many movies carry each genre
    Genres,

    /// Show one movie's attributes
    Movie {
        /// Exact title
        #[arg(long, conflicts_with = "id", required_unless_present = "id")]
        title: Option<String>,

        /// TMDb movie id
        #[arg(long)]
        id: Option<MovieId>,

        /// Which attributes to show
        #[arg(long, value_enum, default_value_t = ViewArg::Basic)]
        view: ViewArg,
    },

    /// Movies that have every listed genre
    RecommendGenres {
        /// Comma-separated genre names, e.g. "Action,Adventure"
        #[arg(long, value_delimiter = ',', required = true)]
        genres: Vec<String>,
    },

    /// Movies whose genres overlap most with movies you like
    RecommendLiked {
        /// Exact titles of liked movies (repeat the flag or list several)
        #[arg(long, num_args = 1.., required = true)]
        titles: Vec<String>,
    },

    /// Movies matching a genre, actor and/or crew member
    RecommendPrefs {
        #[arg(long)]
        genre: Option<String>,

        /// Actor or actress name
        #[arg(long)]
        cast: Option<String>,

        /// Crew member name (director, writer, ...)
        #[arg(long)]
        crew: Option<String>,

        /// What to do when a preference matches no movie
        #[arg(long, value_enum, default_value_t = PolicyArg::Exclude)]
        empty_policy: PolicyArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ViewArg {
    Basic,
    People,
    Production,
    Ratings,
    All,
}

impl From<ViewArg> for DetailView {
    fn from(view: ViewArg) -> Self {
        match view {
            ViewArg::Basic => DetailView::Basic,
            ViewArg::People => DetailView::People,
            ViewArg::Production => DetailView::Production,
            ViewArg::Ratings => DetailView::Ratings,
            ViewArg::All => DetailView::All,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// A preference matching nothing empties the result
    Exclude,
    /// A preference matching nothing is skipped
    Ignore,
}

impl From<PolicyArg> for EmptyMatchPolicy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::Exclude => EmptyMatchPolicy::Exclude,
            PolicyArg::Ignore => EmptyMatchPolicy::Ignore,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = RunConfig {
        movies_path: cli.paths.movies,
        credits_path: cli.paths.credits,
        cache_path: cli.paths.cache,
        graph_path: cli.paths.graph,
        cutoff: cli.paths.cutoff,
        top_k: cli.paths.limit,
        ..RunConfig::default()
    };

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Build {
            api_key,
            base_url,
            concurrency,
            timeout_secs,
            retry_misses,
        } => {
            config.enrichment = EnrichmentConfig {
                api_key,
                base_url,
                concurrency,
                timeout: Duration::from_secs(timeout_secs),
                retry_misses,
            };
            handle_build(config).await?
        }
        Commands::GraphStats => handle_graph_stats(&config)?,
        Commands::Genres => handle_genres(&load_service(&config)?),
        Commands::Movie { title, id, view } => {
            let query = match (id, title) {
                (Some(id), _) => MovieQuery::Id(id),
                (None, Some(title)) => MovieQuery::Title(title),
                (None, None) => anyhow::bail!("Pass --title or --id"),
            };
            handle_movie(&load_service(&config)?, &query, view.into())?
        }
        Commands::RecommendGenres { genres } => {
            handle_recommend_genres(&load_service(&config)?, &genres)?
        }
        Commands::RecommendLiked { titles } => {
            let recommendations = load_service(&config)?.recommend_from_titles(&titles)?;
            print_recommendations("Because you liked those movies", &recommendations);
        }
        Commands::RecommendPrefs {
            genre,
            cast,
            crew,
            empty_policy,
        } => {
            config.empty_match_policy = empty_policy.into();
            let preferences = Preferences {
                genre,
                cast_name: cast,
                crew_name: crew,
            };
            let recommendations = load_service(&config)?.recommend_by_preferences(&preferences);
            print_recommendations("Matching your preferences", &recommendations);
        }
    }

    Ok(())
}

/// Load the catalog and graph without touching the network
fn load_service(config: &RunConfig) -> Result<RecommendationService> {
    let start = Instant::now();
    let session = BuildOrchestrator::new(config.clone()).load_session()?;
    info!(
        "Loaded {} movies ({} ranked) and the genre graph in {:?}",
        session.full_catalog.len(),
        session.catalog.len(),
        start.elapsed()
    );
    Ok(session.service(config))
}

/// Handle the 'build' command
async fn handle_build(config: RunConfig) -> Result<()> {
    let graph_path = config.graph_path.clone();
    let output = BuildOrchestrator::new(config).run().await?;

    println!("{}", "Build complete".bold().blue());
    println!("{}Cleaned rows: {}", "• ".green(), output.cleaned_rows);
    println!(
        "{}Catalog size: {} of {}",
        "• ".green(),
        output.session.catalog.len(),
        output.session.full_catalog.len()
    );
    match &output.enrichment {
        Some(report) => println!(
            "{}Enrichment: {} fetched, {} cached, {} unavailable, {} skipped, {} failed",
            "• ".green(),
            report.fetched,
            report.cached,
            report.unavailable,
            report.skipped_misses,
            report.failed
        ),
        None => println!("{}Enrichment: skipped (no TMDB_API_KEY)", "• ".yellow()),
    }
    println!(
        "{}Graph: {} nodes, {} edges -> {}",
        "• ".green(),
        output.stats.nodes,
        output.stats.edges,
        graph_path.display()
    );
    println!("{} Done in {:?}", "✓".green(), output.elapsed);
    Ok(())
}

/// Handle the 'graph-stats' command
fn handle_graph_stats(config: &RunConfig) -> Result<()> {
    let graph = load_graph(&config.graph_path)
        .with_context(|| format!("Failed to load graph {}", config.graph_path.display()))?;
    let stats = GraphStats::of(&graph);

    println!("{}", format!("Graph {}", config.graph_path.display()).bold().blue());
    println!("{}Nodes: {}", "• ".cyan(), stats.nodes);
    println!("{}Edges: {}", "• ".cyan(), stats.edges);
    println!("{}Density: {:.4}", "• ".cyan(), stats.density);
    println!("{}Isolated nodes: {}", "• ".cyan(), stats.isolated_nodes);
    Ok(())
}

/// Handle the 'genres' command: a text bar chart of movies per genre
fn handle_genres(service: &RecommendationService) {
    let counts = service.genre_counts();
    let max = counts.first().map(|(_, c)| *c).unwrap_or(0).max(1);
    let width = counts.iter().map(|(g, _)| g.len()).max().unwrap_or(0);

    println!("{}", "Movies per genre:".bold().blue());
    for (genre, count) in &counts {
        let bar = "#".repeat((count * 40).div_ceil(max));
        println!("  {:<width$}  {:>5}  {}", genre, count, bar.green(), width = width);
    }
}

/// Handle the 'movie' command
fn handle_movie(service: &RecommendationService, query: &MovieQuery, view: DetailView) -> Result<()> {
    let details = service.movie_details(query, view)?;
    println!("{}", format!("{} ({})", details.title, details.id).bold().blue());
    for (label, value) in &details.fields {
        println!("{}{}: {}", "• ".green(), label, value);
    }
    Ok(())
}

/// Handle the 'recommend-genres' command
fn handle_recommend_genres(service: &RecommendationService, genres: &[String]) -> Result<()> {
    match service.recommend_by_genres(genres) {
        Ok(recommendations) => {
            print_recommendations(&format!("Movies in {}", genres.join(" + ")), &recommendations);
            Ok(())
        }
        Err(err @ ServiceError::UnknownGenres(_)) => {
            let known: Vec<String> = service.genre_counts().into_iter().map(|(g, _)| g).collect();
            eprintln!("{} {}", "Available genres:".yellow(), known.join(", "));
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}

fn format_score(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.1}", v))
}

/// Helper function to format and print recommendations
fn print_recommendations(header: &str, recommendations: &[RankedCandidate]) {
    println!("{}", format!("{}:", header).bold().blue());
    if recommendations.is_empty() {
        println!("  {}", "No matching movies".yellow());
        return;
    }
    for (i, rec) in recommendations.iter().enumerate() {
        println!(
            "{}. {} ({}) - overlap {}, vote {}, popularity {}",
            (i + 1).to_string().green(),
            rec.title,
            rec.movie_id,
            rec.genre_overlap,
            format_score(rec.vote_average),
            format_score(rec.popularity)
        );
    }
}
