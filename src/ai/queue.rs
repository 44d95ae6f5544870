//! Binary min-heap used as the A* open set
//!
//! Items are ordered by [`HeapItem::priority`] and indexed by
//! [`HeapItem::key`], so membership tests and in-place key updates are O(1)
//! lookups instead of scans of the backing vector.
//!
//! Ties are not broken by any secondary key: sift-up stops as soon as the
//! parent is not strictly greater, and sift-down only swaps with a child
//! that is strictly smaller. The pop order among equal priorities therefore
//! depends on insertion order alone, which keeps search results
//! reproducible for identical inputs.

use std::hash::Hash;

use rustc_hash::FxHashMap;

/// An entry that can live in a [`PriorityQueue`]
pub trait HeapItem {
    /// Identity used for membership tests
    type Key: Copy + Eq + Hash;

    /// Lookup key of this item
    fn key(&self) -> Self::Key;

    /// Ordering key, smaller pops first
    fn priority(&self) -> f64;
}

/// A binary min-heap with a key index
#[derive(Debug, Clone)]
pub struct PriorityQueue<T: HeapItem> {
    items: Vec<T>,
    index: FxHashMap<T::Key, usize>,
}

impl<T: HeapItem> PriorityQueue<T> {
    /// Create an empty queue
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Create an empty queue with room for `capacity` items
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Number of queued items
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the queue is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Insert an item, restoring heap order by sifting up from the new leaf.
    ///
    /// An item whose key is already queued replaces the queued one.
    pub fn insert(&mut self, item: T) {
        if let Some(&slot) = self.index.get(&item.key()) {
            self.items[slot] = item;
            let slot = self.sift_up(slot);
            self.sift_down(slot);
            return;
        }

        let slot = self.items.len();
        self.index.insert(item.key(), slot);
        self.items.push(item);
        self.sift_up(slot);
    }

    /// Look at the minimum item without removing it
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    /// Remove and return the minimum item.
    ///
    /// The last leaf replaces the root and sinks until no child is strictly
    /// smaller.
    pub fn extract_min(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }

        let min = self.items.swap_remove(0);
        self.index.remove(&min.key());

        if !self.items.is_empty() {
            let moved = self.items[0].key();
            self.index.insert(moved, 0);
            self.sift_down(0);
        }

        Some(min)
    }

    /// Check whether an item with `key` is queued
    #[must_use]
    pub fn contains(&self, key: &T::Key) -> bool {
        self.index.contains_key(key)
    }

    /// Get the queued item with `key`
    #[must_use]
    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.index.get(key).map(|&slot| &self.items[slot])
    }

    /// Mutate the queued item with `key` in place and re-sift it.
    ///
    /// Returns `false` if no such item is queued. The closure must not change
    /// the item's key.
    pub fn update<F>(&mut self, key: &T::Key, f: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        let Some(&slot) = self.index.get(key) else {
            return false;
        };

        f(&mut self.items[slot]);
        debug_assert!(self.items[slot].key() == *key, "update changed the item key");

        let slot = self.sift_up(slot);
        self.sift_down(slot);
        true
    }

    /// Backing storage in heap order (not sorted)
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Remove every item
    pub fn clear(&mut self) {
        self.items.clear();
        self.index.clear();
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.items.swap(a, b);
        self.index.insert(self.items[a].key(), a);
        self.index.insert(self.items[b].key(), b);
    }

    fn sift_up(&mut self, mut slot: usize) -> usize {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.items[slot].priority() >= self.items[parent].priority() {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
        slot
    }

    fn sift_down(&mut self, mut slot: usize) -> usize {
        let len = self.items.len();
        loop {
            let left = 2 * slot + 1;
            if left >= len {
                break;
            }

            let right = left + 1;
            let mut child = left;
            if right < len && self.items[right].priority() < self.items[left].priority() {
                child = right;
            }

            if self.items[child].priority() >= self.items[slot].priority() {
                break;
            }
            self.swap(slot, child);
            slot = child;
        }
        slot
    }
}

impl<T: HeapItem> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
