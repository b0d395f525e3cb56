//! The orthogonal sparse rating structure.
//!
//! Ratings are stored once and threaded into two sorted chains at the same
//! time: the reviewer's row (ordered by movie ID) and the movie's column
//! (ordered by reviewer ID). Rows and columns hang off two independent
//! sorted header lists, and a header lives exactly as long as its chain is
//! non-empty. The intended usage is:
//! 1) `add_rating` / `remove_rating` to mutate the structure.
//! 2) `get_rating` and the row/column iterators to read it back.
//! 3) The `similarity` module for nearest-neighbor queries over the chains.
//!
//! There is deliberately no hash or tree index behind any of this: every
//! lookup is a linear walk of a sorted chain, and every mutation rewrites
//! the handful of links around the affected position.

mod arena;
mod check;
mod iter;
mod node;

pub use iter::{ColumnIter, HeaderIdIter, RowIter};

use tracing::{debug, trace};

use crate::config::MatrixConfig;
use crate::error::{Error, Result};
use arena::Arena;
use node::{Header, HeaderRef, NodeRef, RatingNode};

/// Reviewer identifier. Zero is reserved and rejected on input.
pub type ReviewerId = u64;
/// Movie identifier. Zero is reserved and rejected on input.
pub type MovieId = u64;

/// Sparse reviewer×movie rating storage.
///
/// Owns every header and rating node exclusively; all public mutation runs
/// to completion before the structure can be observed again. Failed
/// operations change nothing: validation and position lookup happen before
/// the first link is rewritten.
#[derive(Debug, Default)]
pub struct RatingMatrix {
    config: MatrixConfig,
    nodes: Arena<RatingNode>,
    reviewer_headers: Arena<Header>,
    movie_headers: Arena<Header>,
    reviewer_head: Option<HeaderRef>,
    movie_head: Option<HeaderRef>,
}

/// Outcome of a sorted header-list scan.
#[derive(Clone, Copy)]
enum HeaderSearch {
    Found(HeaderRef),
    /// Not present; a new header belongs after this one (or at the front).
    Missing { after: Option<HeaderRef> },
}

/// Outcome of a sorted chain scan.
#[derive(Clone, Copy)]
enum ChainSearch {
    Found(NodeRef),
    Between {
        prev: Option<NodeRef>,
        next: Option<NodeRef>,
    },
}

/// Splice position inside one chain.
#[derive(Clone, Copy)]
struct ChainPos {
    prev: Option<NodeRef>,
    next: Option<NodeRef>,
}

impl ChainPos {
    fn front() -> Self {
        Self {
            prev: None,
            next: None,
        }
    }
}

impl RatingMatrix {
    /// Create an empty matrix with the given validation config.
    pub fn new(config: MatrixConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The validation config this matrix was created with.
    pub fn config(&self) -> &MatrixConfig {
        &self.config
    }

    /// Number of stored ratings.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when no ratings are stored.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 0
    }

    /// Number of reviewers with at least one rating.
    pub fn reviewer_count(&self) -> usize {
        self.reviewer_headers.len()
    }

    /// Number of movies with at least one rating.
    pub fn movie_count(&self) -> usize {
        self.movie_headers.len()
    }

    /// Store a rating for a (reviewer, movie) pair.
    ///
    /// Creates the reviewer and movie headers at their sorted positions if
    /// they are absent, then splices the node into both chains. A pair that
    /// already holds a rating is rejected with [`Error::DuplicateRating`];
    /// remove it first to replace its score.
    pub fn add_rating(&mut self, reviewer: ReviewerId, movie: MovieId, score: f64) -> Result<()> {
        validate_id(reviewer, "reviewer")?;
        validate_id(movie, "movie")?;
        self.config.validate_score(score)?;

        let reviewer_pos = find_header(&self.reviewer_headers, self.reviewer_head, reviewer);
        let movie_pos = find_header(&self.movie_headers, self.movie_head, movie);

        // A missing header means an empty chain, which also rules out a
        // duplicate on that chain.
        let row_pos = match reviewer_pos {
            HeaderSearch::Found(h) => {
                match find_in_row(&self.nodes, self.reviewer_headers[h].head, movie) {
                    ChainSearch::Found(_) => {
                        debug!(reviewer, movie, "rejected duplicate rating");
                        return Err(Error::DuplicateRating { reviewer, movie });
                    }
                    ChainSearch::Between { prev, next } => ChainPos { prev, next },
                }
            }
            HeaderSearch::Missing { .. } => ChainPos::front(),
        };
        let col_pos = match movie_pos {
            HeaderSearch::Found(h) => {
                match find_in_column(&self.nodes, self.movie_headers[h].head, reviewer) {
                    ChainSearch::Found(_) => {
                        return Err(Error::DuplicateRating { reviewer, movie });
                    }
                    ChainSearch::Between { prev, next } => ChainPos { prev, next },
                }
            }
            HeaderSearch::Missing { .. } => ChainPos::front(),
        };

        // Validation is complete; everything below runs to completion.
        let reviewer_header = match reviewer_pos {
            HeaderSearch::Found(h) => h,
            HeaderSearch::Missing { after } => {
                debug!(reviewer, "creating reviewer header");
                insert_header(
                    &mut self.reviewer_headers,
                    &mut self.reviewer_head,
                    reviewer,
                    after,
                )
            }
        };
        let movie_header = match movie_pos {
            HeaderSearch::Found(h) => h,
            HeaderSearch::Missing { after } => {
                debug!(movie, "creating movie header");
                insert_header(&mut self.movie_headers, &mut self.movie_head, movie, after)
            }
        };

        let node = self.nodes.insert(RatingNode::detached(reviewer, movie, score));
        self.splice_row(reviewer_header, node, row_pos);
        self.splice_column(movie_header, node, col_pos);
        trace!(reviewer, movie, score, "rating linked into both chains");
        Ok(())
    }

    /// Remove the rating for a (reviewer, movie) pair and return its score.
    ///
    /// Unlinks the node from both chains and drops either header whose
    /// chain became empty.
    pub fn remove_rating(&mut self, reviewer: ReviewerId, movie: MovieId) -> Result<f64> {
        let reviewer_header = match find_header(&self.reviewer_headers, self.reviewer_head, reviewer)
        {
            HeaderSearch::Found(h) => h,
            HeaderSearch::Missing { .. } => return Err(Error::NotFound),
        };
        let movie_header = match find_header(&self.movie_headers, self.movie_head, movie) {
            HeaderSearch::Found(h) => h,
            HeaderSearch::Missing { .. } => return Err(Error::NotFound),
        };
        let node = match find_in_row(&self.nodes, self.reviewer_headers[reviewer_header].head, movie)
        {
            ChainSearch::Found(n) => n,
            ChainSearch::Between { .. } => return Err(Error::NotFound),
        };

        self.unlink_row(reviewer_header, node);
        self.unlink_column(movie_header, node);
        let RatingNode { score, .. } = self.nodes.remove(node);

        if self.reviewer_headers[reviewer_header].head.is_none() {
            unlink_header(
                &mut self.reviewer_headers,
                &mut self.reviewer_head,
                reviewer_header,
            );
            debug!(reviewer, "reviewer header dropped, row empty");
        }
        if self.movie_headers[movie_header].head.is_none() {
            unlink_header(&mut self.movie_headers, &mut self.movie_head, movie_header);
            debug!(movie, "movie header dropped, column empty");
        }
        trace!(reviewer, movie, score, "rating unlinked from both chains");
        Ok(score)
    }

    /// Look up the score for a (reviewer, movie) pair.
    pub fn get_rating(&self, reviewer: ReviewerId, movie: MovieId) -> Result<f64> {
        let header = match find_header(&self.reviewer_headers, self.reviewer_head, reviewer) {
            HeaderSearch::Found(h) => h,
            HeaderSearch::Missing { .. } => return Err(Error::NotFound),
        };
        match find_in_row(&self.nodes, self.reviewer_headers[header].head, movie) {
            ChainSearch::Found(n) => Ok(self.nodes[n].score),
            ChainSearch::Between { .. } => Err(Error::NotFound),
        }
    }

    /// True when the reviewer has at least one rating.
    pub fn reviewer_exists(&self, reviewer: ReviewerId) -> bool {
        matches!(
            find_header(&self.reviewer_headers, self.reviewer_head, reviewer),
            HeaderSearch::Found(_)
        )
    }

    /// True when the movie has at least one rating.
    pub fn movie_exists(&self, movie: MovieId) -> bool {
        matches!(
            find_header(&self.movie_headers, self.movie_head, movie),
            HeaderSearch::Found(_)
        )
    }

    /// Lazy ascending `(movie, score)` walk of one reviewer's row.
    pub fn reviewer_row(&self, reviewer: ReviewerId) -> Result<RowIter<'_>> {
        match find_header(&self.reviewer_headers, self.reviewer_head, reviewer) {
            HeaderSearch::Found(h) => Ok(RowIter::new(
                &self.nodes,
                self.reviewer_headers[h].head,
            )),
            HeaderSearch::Missing { .. } => Err(Error::NotFound),
        }
    }

    /// Lazy ascending `(reviewer, score)` walk of one movie's column.
    pub fn movie_column(&self, movie: MovieId) -> Result<ColumnIter<'_>> {
        match find_header(&self.movie_headers, self.movie_head, movie) {
            HeaderSearch::Found(h) => {
                Ok(ColumnIter::new(&self.nodes, self.movie_headers[h].head))
            }
            HeaderSearch::Missing { .. } => Err(Error::NotFound),
        }
    }

    /// Ascending IDs of every reviewer with at least one rating.
    pub fn reviewers(&self) -> HeaderIdIter<'_> {
        HeaderIdIter::new(&self.reviewer_headers, self.reviewer_head)
    }

    /// Ascending IDs of every movie with at least one rating.
    pub fn movies(&self) -> HeaderIdIter<'_> {
        HeaderIdIter::new(&self.movie_headers, self.movie_head)
    }

    fn splice_row(&mut self, header: HeaderRef, node: NodeRef, pos: ChainPos) {
        self.nodes[node].row_prev = pos.prev;
        self.nodes[node].row_next = pos.next;
        match pos.prev {
            Some(p) => self.nodes[p].row_next = Some(node),
            None => self.reviewer_headers[header].head = Some(node),
        }
        if let Some(n) = pos.next {
            self.nodes[n].row_prev = Some(node);
        }
    }

    fn splice_column(&mut self, header: HeaderRef, node: NodeRef, pos: ChainPos) {
        self.nodes[node].col_prev = pos.prev;
        self.nodes[node].col_next = pos.next;
        match pos.prev {
            Some(p) => self.nodes[p].col_next = Some(node),
            None => self.movie_headers[header].head = Some(node),
        }
        if let Some(n) = pos.next {
            self.nodes[n].col_prev = Some(node);
        }
    }

    fn unlink_row(&mut self, header: HeaderRef, node: NodeRef) {
        let (prev, next) = {
            let n = &self.nodes[node];
            (n.row_prev, n.row_next)
        };
        match prev {
            Some(p) => self.nodes[p].row_next = next,
            None => self.reviewer_headers[header].head = next,
        }
        if let Some(n) = next {
            self.nodes[n].row_prev = prev;
        }
    }

    fn unlink_column(&mut self, header: HeaderRef, node: NodeRef) {
        let (prev, next) = {
            let n = &self.nodes[node];
            (n.col_prev, n.col_next)
        };
        match prev {
            Some(p) => self.nodes[p].col_next = next,
            None => self.movie_headers[header].head = next,
        }
        if let Some(n) = next {
            self.nodes[n].col_prev = prev;
        }
    }
}

fn validate_id(id: u64, role: &str) -> Result<()> {
    if id == 0 {
        return Err(Error::invalid_input(format!("{role} id must be positive")));
    }
    Ok(())
}

/// Scan a sorted header list for `id`, stopping at the first header ≥ it.
fn find_header(headers: &Arena<Header>, head: Option<HeaderRef>, id: u64) -> HeaderSearch {
    let mut prev = None;
    let mut cur = head;
    while let Some(h) = cur {
        let header = &headers[h];
        if header.id == id {
            return HeaderSearch::Found(h);
        }
        if header.id > id {
            break;
        }
        prev = Some(h);
        cur = header.next;
    }
    HeaderSearch::Missing { after: prev }
}

/// Link a fresh header into the sorted list after `after` (front when `None`).
fn insert_header(
    headers: &mut Arena<Header>,
    head: &mut Option<HeaderRef>,
    id: u64,
    after: Option<HeaderRef>,
) -> HeaderRef {
    let next = match after {
        Some(p) => headers[p].next,
        None => *head,
    };
    let mut header = Header::detached(id);
    header.prev = after;
    header.next = next;
    let new = headers.insert(header);
    match after {
        Some(p) => headers[p].next = Some(new),
        None => *head = Some(new),
    }
    if let Some(n) = next {
        headers[n].prev = Some(new);
    }
    new
}

/// Unlink a header from the sorted list and discard it.
fn unlink_header(headers: &mut Arena<Header>, head: &mut Option<HeaderRef>, h: HeaderRef) {
    let Header { prev, next, .. } = headers.remove(h);
    match prev {
        Some(p) => headers[p].next = next,
        None => *head = next,
    }
    if let Some(n) = next {
        headers[n].prev = prev;
    }
}

/// Scan a row for `movie`, stopping at the first node ≥ it.
fn find_in_row(nodes: &Arena<RatingNode>, head: Option<NodeRef>, movie: u64) -> ChainSearch {
    let mut prev = None;
    let mut cur = head;
    while let Some(n) = cur {
        let node = &nodes[n];
        if node.movie == movie {
            return ChainSearch::Found(n);
        }
        if node.movie > movie {
            break;
        }
        prev = Some(n);
        cur = node.row_next;
    }
    ChainSearch::Between { prev, next: cur }
}

/// Scan a column for `reviewer`, stopping at the first node ≥ it.
fn find_in_column(nodes: &Arena<RatingNode>, head: Option<NodeRef>, reviewer: u64) -> ChainSearch {
    let mut prev = None;
    let mut cur = head;
    while let Some(n) = cur {
        let node = &nodes[n];
        if node.reviewer == reviewer {
            return ChainSearch::Found(n);
        }
        if node.reviewer > reviewer {
            break;
        }
        prev = Some(n);
        cur = node.col_next;
    }
    ChainSearch::Between { prev, next: cur }
}
