use crate::traits::Filter;
use data_loader::MovieRecord;

/// Keeps movies whose crew includes one person (any job)
pub struct CrewFilter {
    name: String,
}

impl CrewFilter {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Filter for CrewFilter {
    fn name(&self) -> &str {
        "CrewFilter"
    }

    fn matches(&self, movie: &MovieRecord) -> bool {
        movie.crew.iter().any(|n| *n == self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::test_support::movie;

    #[test]
    fn test_crew_filter_ignores_cast() {
        let filter = CrewFilter::new("James Cameron");
        assert!(filter.matches(&movie(1, &[], &[], &["James Cameron"])));
        assert!(!filter.matches(&movie(2, &[], &["James Cameron"], &[])));
    }
}
