//! Error types for matrix mutation and similarity queries.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by `RatingMatrix` operations and similarity queries.
///
/// Mutating operations validate their input before touching any link, so an
/// error always means the structure is unchanged.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    /// Malformed or out-of-range ID or score.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An add for a (reviewer, movie) pair that already holds a rating.
    #[error("rating for reviewer {reviewer} and movie {movie} already exists")]
    DuplicateRating {
        /// Reviewer ID of the existing rating
        reviewer: u64,
        /// Movie ID of the existing rating
        movie: u64,
    },

    /// Lookup or removal of a rating, reviewer, or movie that is not present.
    #[error("no such rating, reviewer, or movie")]
    NotFound,

    /// A similarity query where no other reviewer/movie shares a rating.
    #[error("no candidate shares any rating with the query subject")]
    NoSimilarCandidate,
}

impl Error {
    /// Create an `InvalidInput` error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}
