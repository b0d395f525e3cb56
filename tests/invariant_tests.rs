//! Interleaved add/remove sequences checked against a model.
//!
//! Every mutation is followed by a full `check_consistency` pass, and the
//! final contents are compared entry-by-entry against a `BTreeMap` model of
//! the same operations.

use std::collections::BTreeMap;

use crosslist::{Error, RatingMatrix};

/// Small deterministic generator so failures reproduce exactly.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn below(&mut self, bound: u64) -> u64 {
        self.next() % bound
    }
}

fn assert_matches_model(matrix: &RatingMatrix, model: &BTreeMap<(u64, u64), f64>) {
    assert_eq!(matrix.len(), model.len());

    for (&(reviewer, movie), &score) in model {
        assert_eq!(matrix.get_rating(reviewer, movie), Ok(score));
    }

    // Rows reproduce the model grouped by reviewer, ascending by movie.
    for reviewer in matrix.reviewers() {
        let row: Vec<(u64, f64)> = matrix.reviewer_row(reviewer).unwrap().collect();
        let expected: Vec<(u64, f64)> = model
            .iter()
            .filter(|((r, _), _)| *r == reviewer)
            .map(|((_, m), s)| (*m, *s))
            .collect();
        assert_eq!(row, expected, "row of reviewer {reviewer}");
    }

    // Columns reproduce the model grouped by movie, ascending by reviewer.
    for movie in matrix.movies() {
        let column: Vec<(u64, f64)> = matrix.movie_column(movie).unwrap().collect();
        let expected: Vec<(u64, f64)> = model
            .iter()
            .filter(|((_, m), _)| *m == movie)
            .map(|((r, _), s)| (*r, *s))
            .collect();
        assert_eq!(column, expected, "column of movie {movie}");
    }
}

#[test]
fn test_random_interleaving_preserves_invariants() {
    let mut rng = Lcg(0xC0FFEE);
    let mut matrix = RatingMatrix::default();
    let mut model: BTreeMap<(u64, u64), f64> = BTreeMap::new();

    for step in 0..2000 {
        let reviewer = 1 + rng.below(12);
        let movie = 1 + rng.below(12);
        let pair = (reviewer, movie);

        if model.contains_key(&pair) {
            if rng.below(4) == 0 {
                // Duplicate add: rejected, nothing changes.
                let err = matrix.add_rating(reviewer, movie, 3.0).unwrap_err();
                assert_eq!(err, Error::DuplicateRating { reviewer, movie });
            } else {
                let expected = model.remove(&pair).unwrap();
                assert_eq!(matrix.remove_rating(reviewer, movie), Ok(expected));
            }
        } else if rng.below(5) == 0 {
            // Remove of a missing pair: rejected, nothing changes.
            assert_eq!(matrix.remove_rating(reviewer, movie), Err(Error::NotFound));
        } else {
            let score = 1.0 + rng.below(9) as f64 / 2.0;
            matrix.add_rating(reviewer, movie, score).unwrap();
            model.insert(pair, score);
        }

        if let Err(violation) = matrix.check_consistency() {
            panic!("invariant violated after step {step}: {violation}");
        }
        assert_eq!(matrix.len(), model.len(), "after step {step}");
    }

    assert_matches_model(&matrix, &model);
}

#[test]
fn test_drain_leaves_empty_structure() {
    let mut rng = Lcg(42);
    let mut matrix = RatingMatrix::default();
    let mut pairs = Vec::new();

    for _ in 0..200 {
        let reviewer = 1 + rng.below(10);
        let movie = 1 + rng.below(10);
        if matrix.add_rating(reviewer, movie, 2.5).is_ok() {
            pairs.push((reviewer, movie));
        }
    }
    matrix.check_consistency().unwrap();

    // Remove in a different order than insertion.
    pairs.reverse();
    for (i, (reviewer, movie)) in pairs.iter().enumerate() {
        matrix.remove_rating(*reviewer, *movie).unwrap();
        if let Err(violation) = matrix.check_consistency() {
            panic!("invariant violated after removal {i}: {violation}");
        }
    }

    assert!(matrix.is_empty());
    assert_eq!(matrix.reviewer_count(), 0);
    assert_eq!(matrix.movie_count(), 0);
    assert!(matrix.reviewers().next().is_none());
    assert!(matrix.movies().next().is_none());
}

#[test]
fn test_reinsertion_after_full_drain() {
    let mut matrix = RatingMatrix::default();
    for round in 0..3u64 {
        let offset = round * 10;
        for i in 1..=5u64 {
            matrix.add_rating(offset + i, offset + i + 1, 3.0).unwrap();
        }
        matrix.check_consistency().unwrap();
        for i in 1..=5u64 {
            matrix.remove_rating(offset + i, offset + i + 1).unwrap();
        }
        matrix.check_consistency().unwrap();
        assert!(matrix.is_empty());
    }
}
