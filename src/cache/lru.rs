//! Recency Tracker Module
//!
//! Keeps cache keys ordered by last use so the store can pick eviction victims.

use std::collections::VecDeque;

// == Recency Tracker ==
/// Tracks access order for LRU eviction.
///
/// Keys are stored in a VecDeque where:
/// - Front = Least recently used (next eviction candidate)
/// - Back = Most recently used
#[derive(Debug, Default)]
pub struct RecencyTracker {
    order: VecDeque<String>,
}

impl RecencyTracker {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Touch ==
    /// Moves a key to the most-recent end, appending it if it is new.
    pub fn touch(&mut self, key: &str) {
        if let Some(pos) = self.position(key) {
            if pos + 1 == self.order.len() {
                return;
            }
            if let Some(existing) = self.order.remove(pos) {
                self.order.push_back(existing);
            }
        } else {
            self.order.push_back(key.to_string());
        }
    }

    // == Remove ==
    /// Removes a key from the tracker. Returns whether it was tracked.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.position(key) {
            Some(pos) => {
                self.order.remove(pos);
                true
            }
            None => false,
        }
    }

    // == Pop Oldest ==
    /// Returns and removes the least recently used key.
    pub fn pop_oldest(&mut self) -> Option<String> {
        self.order.pop_front()
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    pub fn peek_oldest(&self) -> Option<&str> {
        self.order.front().map(String::as_str)
    }

    /// Iterates keys from least to most recently used.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.order.iter().position(|k| k == key)
    }
}
