//! Structural consistency checking.
//!
//! `check_consistency` re-derives every invariant the mutation paths are
//! supposed to preserve. The test suites call it after each mutation; it is
//! also usable as a debugging aid on a live matrix. A violation means a
//! defect in this crate, not a runtime condition to recover from.

use super::arena::Arena;
use super::node::{Header, HeaderRef, NodeRef, RatingNode};
use super::RatingMatrix;

impl RatingMatrix {
    /// Verify every structural invariant, returning the first violation.
    ///
    /// Checked per axis: the header list is strictly ascending with
    /// symmetric prev/next links, every header owns a non-empty chain, every
    /// chain is strictly ascending with symmetric back-links, and every node
    /// belongs to the header it is reachable from. Globally: both axes reach
    /// every node exactly once, and no orphan header or node slot exists.
    pub fn check_consistency(&self) -> Result<(), String> {
        let row_total = check_axis(
            "reviewer",
            &self.reviewer_headers,
            self.reviewer_head,
            &self.nodes,
            |node| node.reviewer,
            |node| node.movie,
            |node| node.row_prev,
            |node| node.row_next,
        )?;
        let col_total = check_axis(
            "movie",
            &self.movie_headers,
            self.movie_head,
            &self.nodes,
            |node| node.movie,
            |node| node.reviewer,
            |node| node.col_prev,
            |node| node.col_next,
        )?;

        if row_total != self.nodes.len() {
            return Err(format!(
                "rows reach {row_total} nodes but the arena holds {}",
                self.nodes.len()
            ));
        }
        if col_total != self.nodes.len() {
            return Err(format!(
                "columns reach {col_total} nodes but the arena holds {}",
                self.nodes.len()
            ));
        }
        Ok(())
    }
}

/// Walk one header list and all of its chains; returns the node count.
#[allow(clippy::too_many_arguments)]
fn check_axis(
    axis: &str,
    headers: &Arena<Header>,
    head: Option<HeaderRef>,
    nodes: &Arena<RatingNode>,
    owner_key: fn(&RatingNode) -> u64,
    chain_key: fn(&RatingNode) -> u64,
    link_prev: fn(&RatingNode) -> Option<NodeRef>,
    link_next: fn(&RatingNode) -> Option<NodeRef>,
) -> Result<usize, String> {
    let mut total = 0usize;
    let mut header_count = 0usize;
    let mut last_id: Option<u64> = None;
    let mut prev: Option<HeaderRef> = None;
    let mut cur = head;

    while let Some(h) = cur {
        let header = headers
            .get(h)
            .ok_or_else(|| format!("{axis} header list points at a vacant slot"))?;
        if header.prev != prev {
            return Err(format!(
                "{axis} header {} back-link does not match its predecessor",
                header.id
            ));
        }
        if let Some(last) = last_id {
            if header.id <= last {
                return Err(format!(
                    "{axis} header list not strictly ascending at {}",
                    header.id
                ));
            }
        }
        if header.head.is_none() {
            return Err(format!("{axis} header {} owns an empty chain", header.id));
        }

        let mut last_key: Option<u64> = None;
        let mut node_prev: Option<NodeRef> = None;
        let mut node_cur = header.head;
        while let Some(n) = node_cur {
            let node = nodes
                .get(n)
                .ok_or_else(|| format!("{axis} chain of {} points at a vacant slot", header.id))?;
            if owner_key(node) != header.id {
                return Err(format!(
                    "node ({}, {}) reached from {axis} header {}",
                    node.reviewer, node.movie, header.id
                ));
            }
            if link_prev(node) != node_prev {
                return Err(format!(
                    "node ({}, {}) {axis}-chain back-link does not match its predecessor",
                    node.reviewer, node.movie
                ));
            }
            if let Some(last) = last_key {
                if chain_key(node) <= last {
                    return Err(format!(
                        "{axis} chain of {} not strictly ascending at ({}, {})",
                        header.id, node.reviewer, node.movie
                    ));
                }
            }
            last_key = Some(chain_key(node));
            total += 1;
            node_prev = Some(n);
            node_cur = link_next(node);
        }

        header_count += 1;
        last_id = Some(header.id);
        prev = Some(h);
        cur = header.next;
    }

    if header_count != headers.len() {
        return Err(format!(
            "{axis} header list reaches {header_count} headers but the arena holds {}",
            headers.len()
        ));
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_matrix_is_consistent() {
        RatingMatrix::default().check_consistency().unwrap();
    }

    #[test]
    fn test_consistent_after_interleaved_mutations() {
        let mut matrix = RatingMatrix::default();
        matrix.add_rating(3, 10, 2.0).unwrap();
        matrix.add_rating(1, 10, 5.0).unwrap();
        matrix.add_rating(2, 10, 4.0).unwrap();
        matrix.add_rating(1, 12, 3.0).unwrap();
        matrix.check_consistency().unwrap();

        matrix.remove_rating(2, 10).unwrap();
        matrix.check_consistency().unwrap();
        matrix.remove_rating(1, 10).unwrap();
        matrix.check_consistency().unwrap();
        matrix.remove_rating(1, 12).unwrap();
        matrix.remove_rating(3, 10).unwrap();
        matrix.check_consistency().unwrap();
        assert!(matrix.is_empty());
    }

    #[test]
    fn test_detects_broken_back_link() {
        let mut matrix = RatingMatrix::default();
        matrix.add_rating(1, 10, 5.0).unwrap();
        matrix.add_rating(1, 12, 3.0).unwrap();

        // Corrupt one back-link directly.
        let head = {
            let h = match super::super::find_header(
                &matrix.reviewer_headers,
                matrix.reviewer_head,
                1,
            ) {
                super::super::HeaderSearch::Found(h) => h,
                _ => unreachable!(),
            };
            matrix.reviewer_headers[h].head.unwrap()
        };
        let second = matrix.nodes[head].row_next.unwrap();
        matrix.nodes[second].row_prev = None;

        let err = matrix.check_consistency().unwrap_err();
        assert!(err.contains("back-link"), "unexpected message: {err}");
    }
}
