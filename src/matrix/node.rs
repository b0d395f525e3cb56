//! Header and rating node types threaded through the arenas.

use super::arena::SlotId;

pub(crate) type NodeRef = SlotId;
pub(crate) type HeaderRef = SlotId;

/// One reviewer or movie in its sorted header list.
///
/// `head` points at the first rating node of this header's row or column,
/// lowest key first. A header only exists while its chain is non-empty.
#[derive(Debug)]
pub(crate) struct Header {
    pub id: u64,
    pub prev: Option<HeaderRef>,
    pub next: Option<HeaderRef>,
    pub head: Option<NodeRef>,
}

impl Header {
    pub(crate) fn detached(id: u64) -> Self {
        Self {
            id,
            prev: None,
            next: None,
            head: None,
        }
    }
}

/// A single (reviewer, movie, score) fact.
///
/// The node is threaded into exactly two chains at once: its reviewer's row
/// (ordered by movie ID) and its movie's column (ordered by reviewer ID).
/// It is one entity reachable both ways, not two copies.
#[derive(Debug)]
pub(crate) struct RatingNode {
    pub reviewer: u64,
    pub movie: u64,
    pub score: f64,
    pub row_prev: Option<NodeRef>,
    pub row_next: Option<NodeRef>,
    pub col_prev: Option<NodeRef>,
    pub col_next: Option<NodeRef>,
}

impl RatingNode {
    pub(crate) fn detached(reviewer: u64, movie: u64, score: f64) -> Self {
        Self {
            reviewer,
            movie,
            score,
            row_prev: None,
            row_next: None,
            col_prev: None,
            col_next: None,
        }
    }
}
