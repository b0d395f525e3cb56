//! Borrowing iterators over chains and header lists.
//!
//! All iterators are plain link walks: cloning one restarts the walk from
//! wherever the clone was taken, and none of them allocate.

use super::arena::Arena;
use super::node::{Header, HeaderRef, NodeRef, RatingNode};

/// Ascending `(movie, score)` walk of one reviewer's row.
#[derive(Debug, Clone)]
pub struct RowIter<'a> {
    nodes: &'a Arena<RatingNode>,
    cur: Option<NodeRef>,
}

impl<'a> RowIter<'a> {
    pub(crate) fn new(nodes: &'a Arena<RatingNode>, head: Option<NodeRef>) -> Self {
        Self { nodes, cur: head }
    }
}

impl Iterator for RowIter<'_> {
    type Item = (u64, f64);

    fn next(&mut self) -> Option<Self::Item> {
        let node = &self.nodes[self.cur?];
        self.cur = node.row_next;
        Some((node.movie, node.score))
    }
}

/// Ascending `(reviewer, score)` walk of one movie's column.
#[derive(Debug, Clone)]
pub struct ColumnIter<'a> {
    nodes: &'a Arena<RatingNode>,
    cur: Option<NodeRef>,
}

impl<'a> ColumnIter<'a> {
    pub(crate) fn new(nodes: &'a Arena<RatingNode>, head: Option<NodeRef>) -> Self {
        Self { nodes, cur: head }
    }
}

impl Iterator for ColumnIter<'_> {
    type Item = (u64, f64);

    fn next(&mut self) -> Option<Self::Item> {
        let node = &self.nodes[self.cur?];
        self.cur = node.col_next;
        Some((node.reviewer, node.score))
    }
}

/// Ascending walk of the IDs in one header list.
#[derive(Debug, Clone)]
pub struct HeaderIdIter<'a> {
    headers: &'a Arena<Header>,
    cur: Option<HeaderRef>,
}

impl<'a> HeaderIdIter<'a> {
    pub(crate) fn new(headers: &'a Arena<Header>, head: Option<HeaderRef>) -> Self {
        Self { headers, cur: head }
    }
}

impl Iterator for HeaderIdIter<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        let header = &self.headers[self.cur?];
        self.cur = header.next;
        Some(header.id)
    }
}
