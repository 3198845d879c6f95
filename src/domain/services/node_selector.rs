//! Node Selection Service
//!
//! Pure per-run selection state for the dump failover loop. The list of
//! nodes is discovered fresh at the start of every pass; this service only
//! decides the order in which candidates are handed out.

use crate::domain::entities::Node;

/// Walks a freshly discovered node list in discovery order, each node at
/// most once, starting from the previous run's known-good index.
///
/// The "sticky cursor": a run that succeeds on index `k` reports `k` back to
/// the scheduler, which threads it into the next run's `start_hint`. Staying
/// on a known-good replica avoids re-walking the list from the front every
/// pass. The hint wraps modulo the freshly discovered list length, so a
/// shrunken cluster never panics the selector.
///
/// One selector lives for exactly one pass. It is not safe to share between
/// concurrent passes; the scheduler never runs more than one.
#[derive(Debug)]
pub struct NodeSelector {
    nodes: Vec<Node>,
    start: usize,
    attempts: usize,
}

impl NodeSelector {
    pub fn new(nodes: Vec<Node>, start_hint: usize) -> Self {
        let start = if nodes.is_empty() {
            0
        } else {
            start_hint % nodes.len()
        };
        Self {
            nodes,
            start,
            attempts: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of candidates handed out so far.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Next candidate and its discovery index, or `None` once every node has
    /// been tried.
    pub fn next_candidate(&mut self) -> Option<(usize, &Node)> {
        if self.attempts >= self.nodes.len() {
            return None;
        }
        let idx = (self.start + self.attempts) % self.nodes.len();
        self.attempts += 1;
        Some((idx, &self.nodes[idx]))
    }
}
