//! Priority queue keyed by `f32` priorities.
//!
//! Priorities are compared with [`f32::total_cmp`], so NaN never poisons
//! the ordering. Items with equal priority pop in insertion order, which
//! keeps priority-flood passes deterministic for a given input.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Which end of the priority range pops first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeapOrder {
    /// Lowest priority pops first.
    Min,
    /// Highest priority pops first.
    Max,
}

struct Entry<T> {
    priority: f32,
    seq: u64,
    order: HeapOrder,
    item: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // `BinaryHeap` pops the greatest entry.
    fn cmp(&self, other: &Self) -> Ordering {
        let by_priority = match self.order {
            HeapOrder::Min => other.priority.total_cmp(&self.priority),
            HeapOrder::Max => self.priority.total_cmp(&other.priority),
        };
        by_priority.then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A priority queue over arbitrary items.
///
/// The priority is captured when an item is pushed; later changes to
/// whatever the priority was derived from do not reorder the heap.
///
/// # Examples
///
/// ```
/// use tarn_graph::Heap;
///
/// let mut heap = Heap::min();
/// heap.push("b", 2.0);
/// heap.push("a", 1.0);
/// heap.push("c", 1.0);
///
/// assert_eq!(heap.pop(), Some("a"));
/// assert_eq!(heap.pop(), Some("c")); // same priority: insertion order
/// assert_eq!(heap.pop(), Some("b"));
/// assert_eq!(heap.pop(), None);
/// ```
pub struct Heap<T> {
    entries: BinaryHeap<Entry<T>>,
    order: HeapOrder,
    next_seq: u64,
}

impl<T> Heap<T> {
    /// Create an empty heap with the given ordering.
    pub fn new(order: HeapOrder) -> Self {
        Self {
            entries: BinaryHeap::new(),
            order,
            next_seq: 0,
        }
    }

    /// Create an empty heap that pops the lowest priority first.
    pub fn min() -> Self {
        Self::new(HeapOrder::Min)
    }

    /// Create an empty heap that pops the highest priority first.
    pub fn max() -> Self {
        Self::new(HeapOrder::Max)
    }

    /// The ordering this heap was created with.
    pub fn order(&self) -> HeapOrder {
        self.order
    }

    /// Push an item with the given priority.
    pub fn push(&mut self, item: T, priority: f32) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry {
            priority,
            seq,
            order: self.order,
            item,
        });
    }

    /// Remove and return the next item.
    pub fn pop(&mut self) -> Option<T> {
        self.entries.pop().map(|e| e.item)
    }

    /// Remove and return the next item together with its priority.
    pub fn pop_with_priority(&mut self) -> Option<(T, f32)> {
        self.entries.pop().map(|e| (e.item, e.priority))
    }

    /// The next item and its priority, without removing it.
    pub fn peek(&self) -> Option<(&T, f32)> {
        self.entries.peek().map(|e| (&e.item, e.priority))
    }

    /// Number of queued items.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the heap is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Discard every queued item.
    ///
    /// The insertion counter keeps running, so ties across a clear still
    /// resolve in push order.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T> Default for Heap<T> {
    fn default() -> Self {
        Self::min()
    }
}

impl<T> Extend<(T, f32)> for Heap<T> {
    fn extend<I: IntoIterator<Item = (T, f32)>>(&mut self, iter: I) {
        for (item, priority) in iter {
            self.push(item, priority);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn min_heap_pops_ascending() {
        let mut h = Heap::min();
        h.extend([(3u32, 3.0), (1, 1.0), (2, 2.0)]);
        assert_eq!(h.pop(), Some(1));
        assert_eq!(h.pop(), Some(2));
        assert_eq!(h.pop(), Some(3));
        assert!(h.is_empty());
    }

    #[test]
    fn max_heap_pops_descending() {
        let mut h = Heap::max();
        h.extend([(3u32, 3.0), (1, 1.0), (2, 2.0)]);
        assert_eq!(h.pop(), Some(3));
        assert_eq!(h.pop(), Some(2));
        assert_eq!(h.pop(), Some(1));
    }

    #[test]
    fn ties_pop_in_insertion_order_for_both_orders() {
        for order in [HeapOrder::Min, HeapOrder::Max] {
            let mut h = Heap::new(order);
            h.extend([('x', 0.5), ('y', 0.5), ('z', 0.5)]);
            assert_eq!(h.pop(), Some('x'));
            assert_eq!(h.pop(), Some('y'));
            assert_eq!(h.pop(), Some('z'));
        }
    }

    #[test]
    fn peek_does_not_remove() {
        let mut h = Heap::min();
        h.push("only", 4.0);
        assert_eq!(h.peek(), Some((&"only", 4.0)));
        assert_eq!(h.len(), 1);
        assert_eq!(h.pop_with_priority(), Some(("only", 4.0)));
        assert_eq!(h.peek(), None);
    }

    #[test]
    fn clear_empties_heap() {
        let mut h = Heap::max();
        h.push(1, 1.0);
        h.clear();
        assert!(h.is_empty());
        assert_eq!(h.pop(), None);
    }

    proptest! {
        #[test]
        fn min_heap_output_is_sorted(priorities in prop::collection::vec(-1000.0f32..1000.0, 0..64)) {
            let mut h = Heap::min();
            for (i, p) in priorities.iter().enumerate() {
                h.push(i, *p);
            }
            let mut last = f32::NEG_INFINITY;
            let mut popped = 0;
            while let Some((_, p)) = h.pop_with_priority() {
                prop_assert!(p >= last, "popped {p} after {last}");
                last = p;
                popped += 1;
            }
            prop_assert_eq!(popped, priorities.len());
        }
    }
}
