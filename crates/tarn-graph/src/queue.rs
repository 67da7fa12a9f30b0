//! FIFO queue with O(1) logical removal.
//!
//! [`InvalidatableQueue`] keeps the physical `VecDeque` untouched on
//! [`invalidate`](InvalidatableQueue::invalidate) and instead drops the
//! element from a live map; [`pop`](InvalidatableQueue::pop) skips entries
//! that are no longer live. Every push is stamped with a sequence number,
//! so a stale entry left behind by an invalidated element never stands in
//! for a later push of the same element.

use indexmap::IndexMap;
use std::collections::VecDeque;
use std::hash::Hash;

/// A FIFO queue whose pending elements can be invalidated in O(1).
///
/// Each element is queued at most once: pushing an element that is already
/// pending is a no-op.
///
/// # Examples
///
/// ```
/// use tarn_graph::InvalidatableQueue;
///
/// let mut q: InvalidatableQueue<u32> = [1, 2, 3].into_iter().collect();
/// q.invalidate(&2);
///
/// assert_eq!(q.pop(), Some(1));
/// assert_eq!(q.pop(), Some(3));
/// assert!(q.is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct InvalidatableQueue<T> {
    order: VecDeque<(T, u64)>,
    live: IndexMap<T, u64>,
    next_seq: u64,
}

impl<T: Clone + Eq + Hash> InvalidatableQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
            live: IndexMap::new(),
            next_seq: 0,
        }
    }

    /// Append an element. Returns `false` if it was already pending.
    pub fn push(&mut self, element: T) -> bool {
        if self.live.contains_key(&element) {
            return false;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.live.insert(element.clone(), seq);
        self.order.push_back((element, seq));
        true
    }

    /// Remove and return the oldest pending element.
    pub fn pop(&mut self) -> Option<T> {
        while let Some((element, seq)) = self.order.pop_front() {
            if self.live.get(&element) == Some(&seq) {
                self.live.swap_remove(&element);
                return Some(element);
            }
        }
        None
    }

    /// Logically remove a pending element.
    ///
    /// Returns `true` if the element was pending. Invalidating an element
    /// that was never queued, or was already popped, is a no-op.
    pub fn invalidate(&mut self, element: &T) -> bool {
        self.live.swap_remove(element).is_some()
    }

    /// Whether `element` is queued and not invalidated.
    pub fn contains(&self, element: &T) -> bool {
        self.live.contains_key(element)
    }

    /// Number of pending (live) elements.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Whether no live elements remain.
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

impl<T: Clone + Eq + Hash> Default for InvalidatableQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Eq + Hash> FromIterator<T> for InvalidatableQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut q = Self::new();
        for element in iter {
            q.push(element);
        }
        q
    }
}
