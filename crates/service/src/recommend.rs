//! Validating front door to the recommendation engine.
//!
//! The engine trusts its input. This layer checks user-supplied genres and
//! titles against the full catalog first and reports every unknown name at
//! once, and it renders movie detail views.
//!
//! Lookups use every cleaned movie, while the engine ranks only the first N.
//! A liked movie past the cutoff is accepted but has no graph node, so it
//! adds nothing to the overlap scores.

use crate::error::{Result, ServiceError};
use data_loader::{Catalog, MovieId, MovieRecord};
use std::sync::Arc;
use pipeline::{Preferences, RankedCandidate, RecommendationEngine};
use tracing::debug;

/// How to find a single movie
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovieQuery {
    Id(MovieId),
    /// Exact display title
    Title(String),
}

impl std::fmt::Display for MovieQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MovieQuery::Id(id) => write!(f, "id {}", id),
            MovieQuery::Title(title) => write!(f, "title {:?}", title),
        }
    }
}

/// Which group of attributes to show for a movie
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DetailView {
    /// Id, title, overview, release date, genres, homepage
    #[default]
    Basic,
    /// Original language, runtime, cast, crew
    People,
    /// Production companies and countries, budget, revenue
    Production,
    /// Popularity, vote average, vote count
    Ratings,
    /// Every attribute: the four views above plus original title, keywords,
    /// spoken languages and tagline
    All,
}

/// A movie's attributes as label/value pairs, in display order
#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetails {
    pub id: MovieId,
    pub title: String,
    pub fields: Vec<(&'static str, String)>,
}

impl MovieDetails {
    pub fn field(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, v)| v.as_str())
    }
}

const MISSING: &str = "n/a";

fn list(values: &[String]) -> String {
    if values.is_empty() {
        MISSING.to_string()
    } else {
        values.join(", ")
    }
}

fn optional<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| v.to_string())
}

fn detail_fields(movie: &MovieRecord, view: DetailView) -> Vec<(&'static str, String)> {
    let e = &movie.enrichment;
    let basic = || {
        vec![
            ("id", movie.id.to_string()),
            ("title", movie.title.clone()),
            ("overview", movie.overview.clone()),
            ("release_date", movie.release_date.clone()),
            ("genres", list(&movie.genres)),
            ("homepage", optional(movie.homepage.as_deref())),
        ]
    };
    let people = || {
        vec![
            ("original_language", optional(movie.original_language.as_deref())),
            ("runtime", format!("{} min", movie.runtime)),
            ("cast", list(&movie.cast)),
            ("crew", list(&movie.crew)),
        ]
    };
    let production = || {
        vec![
            ("production_companies", list(&movie.production_companies)),
            ("production_countries", list(&movie.production_countries)),
            ("budget", optional(movie.budget)),
            ("revenue", optional(e.revenue.map(|r| format!("{:.0}", r)))),
        ]
    };
    let ratings = || {
        vec![
            ("popularity", optional(e.popularity)),
            ("vote_average", optional(e.vote_average)),
            ("vote_count", optional(e.vote_count)),
        ]
    };

    let rest = || {
        vec![
            ("original_title", movie.original_title.clone()),
            ("keywords", list(&movie.keywords)),
            ("spoken_languages", list(&movie.spoken_languages)),
            ("tagline", optional(e.tagline.as_deref())),
        ]
    };

    match view {
        DetailView::Basic => basic(),
        DetailView::People => people(),
        DetailView::Production => production(),
        DetailView::Ratings => ratings(),
        DetailView::All => [basic(), people(), production(), ratings(), rest()].concat(),
    }
}

#[derive(Clone)]
pub struct RecommendationService {
    engine: RecommendationEngine,
    /// Every cleaned movie, a superset of the engine's catalog
    full_catalog: Arc<Catalog>,
}

impl RecommendationService {
    pub fn new(engine: RecommendationEngine, full_catalog: Arc<Catalog>) -> Self {
        Self {
            engine,
            full_catalog,
        }
    }

    pub fn engine(&self) -> &RecommendationEngine {
        &self.engine
    }

    /// Strict genre match after checking every genre exists in the full catalog
    pub fn recommend_by_genres(&self, genres: &[String]) -> Result<Vec<RankedCandidate>> {
        let genres: Vec<String> = clean_inputs(genres);
        let vocabulary = self.full_catalog.genre_vocabulary();
        let unknown: Vec<String> = genres
            .iter()
            .filter(|g| !vocabulary.contains(g.as_str()))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(ServiceError::UnknownGenres(unknown));
        }
        Ok(self.engine.by_genres(&genres))
    }

    /// Liked-history ranking from exact display titles
    pub fn recommend_from_titles(&self, titles: &[String]) -> Result<Vec<RankedCandidate>> {
        let catalog = &self.full_catalog;
        let mut liked = Vec::new();
        let mut unknown = Vec::new();
        for title in clean_inputs(titles) {
            match catalog.find_by_title(&title) {
                Some(movie) => liked.push(movie.id),
                None => unknown.push(title),
            }
        }
        if !unknown.is_empty() {
            return Err(ServiceError::UnknownTitles(unknown));
        }
        debug!("Resolved {} liked titles", liked.len());
        Ok(self.engine.by_liked(&liked))
    }

    /// Preference ranking; preferences are not validated, an unmatched one
    /// is handled by the engine's empty-match policy
    pub fn recommend_by_preferences(&self, preferences: &Preferences) -> Vec<RankedCandidate> {
        self.engine.by_preferences(preferences)
    }

    pub fn movie_details(&self, query: &MovieQuery, view: DetailView) -> Result<MovieDetails> {
        let catalog = &self.full_catalog;
        let movie = match query {
            MovieQuery::Id(id) => catalog.get_movie(*id),
            MovieQuery::Title(title) => catalog.find_by_title(title.trim()),
        }
        .ok_or_else(|| ServiceError::MovieNotFound(query.to_string()))?;

        Ok(MovieDetails {
            id: movie.id,
            title: movie.title.clone(),
            fields: detail_fields(movie, view),
        })
    }

    /// Movies per genre over the full catalog, most common first
    pub fn genre_counts(&self) -> Vec<(String, usize)> {
        self.full_catalog.genre_counts()
    }
}

/// Trim entries and drop blank ones
fn clean_inputs(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}
