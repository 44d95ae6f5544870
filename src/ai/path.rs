//! Paths and their traversal
//!
//! A [`Path`] hands out checkpoints one at a time. How it behaves at the end
//! of its node list depends on the [`TraversalMode`]:
//!
//! - `Once`: the last node is handed out and the path is done.
//! - `PingPong`: the direction flips and the walk continues back toward the
//!   first node, forever. The turnaround node is handed out once.
//! - `Cyclic`: the last node is handed out and the walk restarts at the first.

use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::node::{NavNode, NodeKind};

/// Global counter for generating unique path IDs
static NEXT_PATH_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathId(u64);

impl PathId {
    fn next() -> Self {
        Self(NEXT_PATH_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// How a path continues once its last node has been handed out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TraversalMode {
    /// Traverse once, then report done
    #[default]
    Once,
    /// Walk back and forth between the ends
    PingPong,
    /// Restart from the first node
    Cyclic,
}

/// Per-mode cursor state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Traversal {
    Once { next: usize, done: bool },
    PingPong { next: usize, forward: bool },
    Cyclic { next: usize },
}

impl Traversal {
    fn start(mode: TraversalMode) -> Self {
        match mode {
            TraversalMode::Once => Self::Once {
                next: 0,
                done: false,
            },
            TraversalMode::PingPong => Self::PingPong {
                next: 0,
                forward: true,
            },
            TraversalMode::Cyclic => Self::Cyclic { next: 0 },
        }
    }
}

/// An ordered list of checkpoints with a traversal cursor
#[derive(Debug, Clone)]
pub struct Path {
    id: PathId,
    nodes: Vec<NavNode>,
    traversal: Traversal,
}

impl Path {
    /// Create a path over `nodes`
    #[must_use]
    pub fn new(nodes: Vec<NavNode>, mode: TraversalMode) -> Self {
        Self {
            id: PathId::next(),
            nodes,
            traversal: Traversal::start(mode),
        }
    }

    /// Create a path from bare positions
    #[must_use]
    pub fn from_waypoints<I>(waypoints: I, kind: NodeKind, mode: TraversalMode) -> Self
    where
        I: IntoIterator<Item = Vec3>,
    {
        let nodes = waypoints
            .into_iter()
            .map(|position| NavNode::new(position, kind))
            .collect();
        Self::new(nodes, mode)
    }

    /// Identity of this path
    #[must_use]
    pub fn id(&self) -> PathId {
        self.id
    }

    /// Traversal mode
    #[must_use]
    pub fn mode(&self) -> TraversalMode {
        match self.traversal {
            Traversal::Once { .. } => TraversalMode::Once,
            Traversal::PingPong { .. } => TraversalMode::PingPong,
            Traversal::Cyclic { .. } => TraversalMode::Cyclic,
        }
    }

    /// Number of nodes
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the path has no nodes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in stored (forward) order
    #[must_use]
    pub fn nodes(&self) -> &[NavNode] {
        &self.nodes
    }

    /// Index of the next unread node along the current walking direction
    #[must_use]
    pub fn cursor(&self) -> usize {
        match self.traversal {
            Traversal::Once { next, .. }
            | Traversal::PingPong { next, .. }
            | Traversal::Cyclic { next } => next,
        }
    }

    /// Whether a `Once` path has handed out its last node
    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self.traversal, Traversal::Once { done: true, .. })
    }

    /// Hand out the next checkpoint and advance the cursor.
    ///
    /// Returns `None` only for an empty path. A finished `Once` path keeps
    /// returning its last node.
    pub fn next_checkpoint(&mut self) -> Option<&NavNode> {
        let last = self.nodes.len().checked_sub(1)?;

        let slot = match &mut self.traversal {
            Traversal::Once { next, done } => {
                let slot = *next;
                if slot < last {
                    *next += 1;
                } else {
                    *done = true;
                }
                slot
            }
            Traversal::PingPong { next, forward } => {
                if *next < last {
                    let slot = oriented(*next, *forward, last);
                    *next += 1;
                    slot
                } else {
                    *forward = !*forward;
                    *next = 1.min(last);
                    oriented(0, *forward, last)
                }
            }
            Traversal::Cyclic { next } => {
                let slot = *next;
                *next = if slot < last { slot + 1 } else { 0 };
                slot
            }
        };

        self.nodes.get(slot)
    }

    /// The checkpoint [`next_checkpoint`](Self::next_checkpoint) would
    /// return, without moving the cursor
    #[must_use]
    pub fn current_checkpoint(&self) -> Option<&NavNode> {
        let last = self.nodes.len().checked_sub(1)?;

        let slot = match self.traversal {
            Traversal::Once { next, .. } | Traversal::Cyclic { next } => next,
            Traversal::PingPong { next, forward } if next < last => oriented(next, forward, last),
            Traversal::PingPong { forward, .. } => oriented(0, !forward, last),
        };

        self.nodes.get(slot)
    }
}

/// Map a walking-direction index to a storage index
fn oriented(index: usize, forward: bool, last: usize) -> usize {
    if forward { index } else { last - index }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(len: usize, mode: TraversalMode) -> Path {
        Path::from_waypoints(
            (0..len).map(|i| Vec3::new(i as f32, 0.0, 0.0)),
            NodeKind::PathWaypoint,
            mode,
        )
    }

    fn take(path: &mut Path, count: usize) -> Vec<f32> {
        (0..count)
            .map(|_| path.next_checkpoint().map(|n| n.position.x).unwrap())
            .collect()
    }

    #[test]
    fn test_once_finishes_on_last_node() {
        let mut p = path(4, TraversalMode::Once);

        for expected in 0..4 {
            assert!(!p.is_done());
            let x = p.next_checkpoint().map(|n| n.position.x);
            assert_eq!(x, Some(expected as f32));
        }
        assert!(p.is_done());

        // Stays parked on the last node
        assert_eq!(p.next_checkpoint().map(|n| n.position.x), Some(3.0));
        assert!(p.is_done());
    }

    #[test]
    fn test_ping_pong_reverses_without_repeating_turnaround() {
        let mut p = path(4, TraversalMode::PingPong);

        assert_eq!(take(&mut p, 7), vec![0.0, 1.0, 2.0, 3.0, 2.0, 1.0, 0.0]);
        assert!(!p.is_done());
        assert_eq!(take(&mut p, 3), vec![1.0, 2.0, 3.0]);
        assert!(!p.is_done());
    }

    #[test]
    fn test_ping_pong_single_node() {
        let mut p = path(1, TraversalMode::PingPong);
        assert_eq!(take(&mut p, 3), vec![0.0, 0.0, 0.0]);
        assert!(!p.is_done());
    }

    #[test]
    fn test_cyclic_restarts() {
        let mut p = path(3, TraversalMode::Cyclic);
        assert_eq!(take(&mut p, 7), vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0, 0.0]);
        assert!(!p.is_done());
    }

    #[test]
    fn test_current_checkpoint_peeks() {
        let mut p = path(3, TraversalMode::PingPong);

        for _ in 0..8 {
            let peeked = p.current_checkpoint().map(|n| n.position.x);
            let taken = p.next_checkpoint().map(|n| n.position.x);
            assert_eq!(peeked, taken);
        }

        let mut once = path(2, TraversalMode::Once);
        once.next_checkpoint();
        assert_eq!(once.current_checkpoint().map(|n| n.position.x), Some(1.0));
        assert!(!once.is_done());
    }

    #[test]
    fn test_empty_path() {
        let mut p = Path::new(Vec::new(), TraversalMode::Once);
        assert!(p.is_empty());
        assert!(p.next_checkpoint().is_none());
        assert!(p.current_checkpoint().is_none());
        assert!(!p.is_done());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = path(1, TraversalMode::Once);
        let b = a.clone();
        let c = path(1, TraversalMode::Once);

        assert_eq!(a.id(), b.id());
        assert_ne!(a.id(), c.id());
        assert_eq!(c.mode(), TraversalMode::Once);
    }
}
