//! Nearest-neighbor similarity over the rating matrix.
//!
//! Both queries walk the matrix's existing chains directly. Candidates are
//! visited in ascending ID order, the shared ratings of two subjects are
//! found with a two-cursor merge-join over their sorted chains, and the
//! nearest neighbor is the candidate with the smallest mean absolute score
//! difference over the overlap. An exact tie keeps the earlier candidate,
//! so ties always resolve to the lower ID.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Error, Result};
use crate::matrix::{MovieId, RatingMatrix, ReviewerId};

/// Nearest neighbor found by a similarity query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    /// ID of the most similar reviewer or movie
    pub id: u64,
    /// Mean of `|score_a - score_b|` over the shared ratings
    pub mean_abs_diff: f64,
    /// Number of shared ratings the mean was computed over
    pub overlap: usize,
}

/// Find the reviewer whose ratings most closely match `reviewer`'s.
///
/// Only movies both reviewers rated contribute; candidates sharing no movie
/// are skipped entirely. Fails with [`Error::NotFound`] when the reviewer
/// has no ratings and [`Error::NoSimilarCandidate`] when no other reviewer
/// overlaps.
pub fn most_similar_reviewer(matrix: &RatingMatrix, reviewer: ReviewerId) -> Result<Neighbor> {
    let subject = matrix.reviewer_row(reviewer)?;
    let mut best: Option<Neighbor> = None;

    for candidate in matrix.reviewers() {
        if candidate == reviewer {
            continue;
        }
        let candidate_row = matrix.reviewer_row(candidate)?;
        let (overlap, sum) = overlap_stats(subject.clone(), candidate_row);
        if overlap == 0 {
            continue;
        }
        let mean_abs_diff = sum / overlap as f64;
        trace!(candidate, overlap, mean_abs_diff, "scored reviewer candidate");
        if best
            .as_ref()
            .map_or(true, |b| mean_abs_diff < b.mean_abs_diff)
        {
            best = Some(Neighbor {
                id: candidate,
                mean_abs_diff,
                overlap,
            });
        }
    }

    best.ok_or(Error::NoSimilarCandidate)
}

/// Find the movie whose ratings most closely match `movie`'s.
///
/// Structurally identical to [`most_similar_reviewer`], merge-joining the
/// two movies' columns over the reviewers both share.
pub fn most_similar_movie(matrix: &RatingMatrix, movie: MovieId) -> Result<Neighbor> {
    let subject = matrix.movie_column(movie)?;
    let mut best: Option<Neighbor> = None;

    for candidate in matrix.movies() {
        if candidate == movie {
            continue;
        }
        let candidate_column = matrix.movie_column(candidate)?;
        let (overlap, sum) = overlap_stats(subject.clone(), candidate_column);
        if overlap == 0 {
            continue;
        }
        let mean_abs_diff = sum / overlap as f64;
        trace!(candidate, overlap, mean_abs_diff, "scored movie candidate");
        if best
            .as_ref()
            .map_or(true, |b| mean_abs_diff < b.mean_abs_diff)
        {
            best = Some(Neighbor {
                id: candidate,
                mean_abs_diff,
                overlap,
            });
        }
    }

    best.ok_or(Error::NoSimilarCandidate)
}

/// Run [`most_similar_reviewer`] for many reviewers.
///
/// Each query is independent and read-only, so `parallel` only changes the
/// scheduling; per-query results match the sequential path exactly.
pub fn batch_most_similar_reviewers(
    matrix: &RatingMatrix,
    reviewers: &[ReviewerId],
    parallel: bool,
) -> Vec<Result<Neighbor>> {
    if parallel {
        reviewers
            .par_iter()
            .map(|&r| most_similar_reviewer(matrix, r))
            .collect()
    } else {
        reviewers
            .iter()
            .map(|&r| most_similar_reviewer(matrix, r))
            .collect()
    }
}

/// Run [`most_similar_movie`] for many movies.
pub fn batch_most_similar_movies(
    matrix: &RatingMatrix,
    movies: &[MovieId],
    parallel: bool,
) -> Vec<Result<Neighbor>> {
    if parallel {
        movies
            .par_iter()
            .map(|&m| most_similar_movie(matrix, m))
            .collect()
    } else {
        movies
            .iter()
            .map(|&m| most_similar_movie(matrix, m))
            .collect()
    }
}

/// Merge-join two ascending `(key, score)` walks.
///
/// Returns the overlap size and the sum of absolute score differences over
/// the shared keys. Runs in one pass with O(1) state.
fn overlap_stats(
    a: impl Iterator<Item = (u64, f64)>,
    b: impl Iterator<Item = (u64, f64)>,
) -> (usize, f64) {
    let mut a = a.peekable();
    let mut b = b.peekable();
    let mut overlap = 0usize;
    let mut sum = 0.0f64;

    while let (Some(&(key_a, score_a)), Some(&(key_b, score_b))) = (a.peek(), b.peek()) {
        if key_a == key_b {
            sum += (score_a - score_b).abs();
            overlap += 1;
            a.next();
            b.next();
        } else if key_a < key_b {
            a.next();
        } else {
            b.next();
        }
    }
    (overlap, sum)
}
