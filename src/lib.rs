//! # crosslist
//!
//! Sparse reviewer×movie rating storage as an orthogonal linked structure,
//! with nearest-neighbor similarity queries over reviewers and movies.
//!
//! Every rating is a single node threaded into two sorted chains at once
//! (its reviewer's row and its movie's column), hanging off two sorted
//! header lists. Similarity queries merge-join those chains directly, with
//! no auxiliary index anywhere.

pub mod config;
pub mod error;
pub mod matrix;
pub mod similarity;

pub use config::MatrixConfig;
pub use error::{Error, Result};
pub use matrix::{MovieId, RatingMatrix, ReviewerId};
pub use similarity::{most_similar_movie, most_similar_reviewer, Neighbor};
