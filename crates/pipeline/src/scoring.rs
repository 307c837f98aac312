//! Genre overlap and the composite ranking order.
//!
//! Candidates are ordered by, in turn:
//! 1. `genre_overlap`, highest first
//! 2. `vote_average`, highest first, missing values last
//! 3. `popularity`, highest first, missing values last
//!
//! The sort is stable, so candidates that tie on all three keys keep the
//! order they came in (catalog order).

use crate::types::RankedCandidate;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Number of distinct genre names two lists have in common
pub fn genre_overlap(a: &[String], b: &[String]) -> usize {
    let a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let b: HashSet<&str> = b.iter().map(String::as_str).collect();
    a.intersection(&b).count()
}

/// Descending order on optional scores with `None` after every value
fn descending_none_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Composite comparison; `Less` means `a` ranks ahead of `b`
pub fn composite_order(a: &RankedCandidate, b: &RankedCandidate) -> Ordering {
    b.genre_overlap
        .cmp(&a.genre_overlap)
        .then_with(|| descending_none_last(a.vote_average, b.vote_average))
        .then_with(|| descending_none_last(a.popularity, b.popularity))
}

/// Sort by the composite order and keep the first `top_k`
pub fn rank_by_composite(mut candidates: Vec<RankedCandidate>, top_k: usize) -> Vec<RankedCandidate> {
    candidates.sort_by(composite_order);
    candidates.truncate(top_k);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genres(names: &[&str]) -> Vec<String> {
        names.iter().map(|g| g.to_string()).collect()
    }

    fn candidate(id: u32, overlap: usize, vote: Option<f64>, pop: Option<f64>) -> RankedCandidate {
        RankedCandidate {
            movie_id: id,
            title: id.to_string(),
            genre_overlap: overlap,
            vote_average: vote,
            popularity: pop,
        }
    }

    fn ranked_ids(candidates: Vec<RankedCandidate>) -> Vec<u32> {
        rank_by_composite(candidates, usize::MAX)
            .into_iter()
            .map(|c| c.movie_id)
            .collect()
    }

    #[test]
    fn test_overlap_uses_sets() {
        assert_eq!(genre_overlap(&genres(&["A", "A", "B"]), &genres(&["A", "C"])), 1);
        assert_eq!(genre_overlap(&genres(&["A", "B"]), &genres(&["B", "A"])), 2);
        assert_eq!(genre_overlap(&genres(&[]), &genres(&["A"])), 0);
    }

    #[test]
    fn test_overlap_dominates() {
        let ids = ranked_ids(vec![
            candidate(1, 1, Some(9.0), Some(100.0)),
            candidate(2, 2, Some(1.0), Some(1.0)),
        ]);
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_ties_break_on_vote_then_popularity() {
        let ids = ranked_ids(vec![
            candidate(1, 1, Some(6.0), Some(50.0)),
            candidate(2, 1, Some(7.0), Some(10.0)),
            candidate(3, 1, Some(6.0), Some(80.0)),
        ]);
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_missing_values_sort_last() {
        let ids = ranked_ids(vec![
            candidate(1, 1, None, Some(99.0)),
            candidate(2, 1, Some(0.0), None),
            candidate(3, 1, Some(0.0), Some(1.0)),
        ]);
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_full_ties_keep_input_order() {
        let ids = ranked_ids(vec![
            candidate(5, 0, None, None),
            candidate(3, 0, None, None),
            candidate(4, 0, None, None),
        ]);
        assert_eq!(ids, vec![5, 3, 4]);
    }

    #[test]
    fn test_truncates_to_top_k() {
        let ranked = rank_by_composite((1..=10).map(|i| candidate(i, i as usize, None, None)).collect(), 3);
        assert_eq!(ranked.iter().map(|c| c.movie_id).collect::<Vec<_>>(), vec![10, 9, 8]);
    }
}
