//! Array-backed binary min-heap ordered by an injected comparator.
//!
//! Unlike [std::collections::BinaryHeap] the heap supports [Heap::update_item], which locates an
//! entry by equality and restores the heap invariant after its key changed. Search entries
//! define equality by node identity, so this is how the informed searches decrease a key.
//! Locating the entry is a linear scan.
use std::cmp::Ordering;
use std::fmt;

#[derive(Clone)]
pub struct Heap<T, C = fn(&T, &T) -> Ordering> {
    nodes: Vec<T>,
    cmp: C,
}

impl<T: Ord> Heap<T> {
    /// Creates an empty heap ordered by [Ord].
    pub fn new() -> Self {
        Heap {
            nodes: Vec::new(),
            cmp: T::cmp,
        }
    }
}

impl<T: Ord> Default for Heap<T> {
    fn default() -> Self {
        Heap::new()
    }
}

impl<T, C> Heap<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    pub fn with_comparator(cmp: C) -> Self {
        Heap {
            nodes: Vec::new(),
            cmp,
        }
    }

    /// Builds a heap from arbitrary items in O(n).
    pub fn from_vec_with_comparator(nodes: Vec<T>, cmp: C) -> Self {
        let mut heap = Heap { nodes, cmp };
        heap.heapify();
        heap
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn peek(&self) -> Option<&T> {
        self.nodes.first()
    }

    pub fn push(&mut self, item: T) {
        self.nodes.push(item);
        let last = self.nodes.len() - 1;
        self.sift_up(0, last);
    }

    /// Removes and returns the smallest item.
    pub fn pop(&mut self) -> Option<T> {
        let last = self.nodes.pop()?;
        if self.nodes.is_empty() {
            return Some(last);
        }
        let top = std::mem::replace(&mut self.nodes[0], last);
        self.sift_down(0);
        Some(top)
    }

    /// Pops the smallest item and pushes `item` in one pass. The returned item may be larger
    /// than `item`. On an empty heap `item` is pushed and [None] returned.
    pub fn replace(&mut self, item: T) -> Option<T> {
        if self.nodes.is_empty() {
            self.nodes.push(item);
            return None;
        }
        let top = std::mem::replace(&mut self.nodes[0], item);
        self.sift_down(0);
        Some(top)
    }

    /// Pushes `item` and pops the smallest item in one pass.
    pub fn push_pop(&mut self, mut item: T) -> T {
        if let Some(top) = self.nodes.first_mut() {
            if (self.cmp)(top, &item) == Ordering::Less {
                std::mem::swap(top, &mut item);
                self.sift_down(0);
            }
        }
        item
    }

    /// Restores the heap invariant over the whole backing array.
    pub fn heapify(&mut self) {
        for pos in (0..self.nodes.len() / 2).rev() {
            self.sift_down(pos);
        }
    }

    pub fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.nodes.contains(item)
    }

    /// Replaces the entry equal to `item` with `item` and moves it to its new position. Returns
    /// `false`, leaving the heap untouched, if no such entry exists.
    pub fn update_item(&mut self, item: T) -> bool
    where
        T: PartialEq,
    {
        match self.nodes.iter().position(|x| *x == item) {
            Some(pos) => {
                self.nodes[pos] = item;
                let pos = self.sift_up(0, pos);
                self.sift_down(pos);
                true
            }
            None => false,
        }
    }

    /// The backing array in heap order.
    pub fn as_slice(&self) -> &[T] {
        &self.nodes
    }

    pub fn into_vec(self) -> Vec<T> {
        self.nodes
    }

    /// Consumes the heap, returning its items smallest first.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.nodes.len());
        while let Some(item) = self.pop() {
            sorted.push(item);
        }
        sorted
    }

    /// Moves the item at `pos` towards the root, stopping at `start`. Returns its final position.
    fn sift_up(&mut self, start: usize, mut pos: usize) -> usize {
        while pos > start {
            let parent = (pos - 1) / 2;
            if (self.cmp)(&self.nodes[pos], &self.nodes[parent]) == Ordering::Less {
                self.nodes.swap(pos, parent);
                pos = parent;
            } else {
                break;
            }
        }
        pos
    }

    /// Moves the item at `pos` down to a leaf along the smaller children, then back up to its
    /// place. Compares less on the way down than a classic sift-down.
    fn sift_down(&mut self, mut pos: usize) {
        let end = self.nodes.len();
        let start = pos;
        let mut child = 2 * pos + 1;
        while child < end {
            let right = child + 1;
            if right < end && (self.cmp)(&self.nodes[child], &self.nodes[right]) != Ordering::Less
            {
                child = right;
            }
            self.nodes.swap(pos, child);
            pos = child;
            child = 2 * pos + 1;
        }
        self.sift_up(start, pos);
    }
}

impl<T: fmt::Debug, C> fmt::Debug for Heap<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Heap").field("nodes", &self.nodes).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_heap_property<T, C: Fn(&T, &T) -> Ordering>(heap: &Heap<T, C>) {
        let nodes = heap.as_slice();
        for i in 1..nodes.len() {
            assert!((heap.cmp)(&nodes[(i - 1) / 2], &nodes[i]) != Ordering::Greater);
        }
    }

    #[test]
    fn pops_in_sorted_order() {
        let mut heap = Heap::new();
        for x in [5, 3, 8, 1] {
            heap.push(x);
        }
        assert_eq!(heap.peek(), Some(&1));
        let popped: Vec<i32> = std::iter::from_fn(|| heap.pop()).collect();
        assert_eq!(popped, vec![1, 3, 5, 8]);
        assert_eq!(heap.pop(), None);
        assert_eq!(heap.peek(), None);
    }

    #[test]
    fn custom_comparator_gives_max_heap() {
        let heap =
            Heap::from_vec_with_comparator(vec![4, 9, 2, 7, 7, 1], |a: &i32, b: &i32| b.cmp(a));
        assert_eq!(heap.into_sorted_vec(), vec![9, 7, 7, 4, 2, 1]);
    }

    #[test]
    fn heapify_matches_sort() {
        let items = vec![13, 2, 8, 21, 5, 3, 1, 34, 1, 0, 55];
        let heap = Heap::from_vec_with_comparator(items.clone(), i32::cmp);
        assert_heap_property(&heap);
        let mut sorted = items;
        sorted.sort();
        assert_eq!(heap.into_sorted_vec(), sorted);
    }

    #[test]
    fn clone_is_independent() {
        let mut heap = Heap::from_vec_with_comparator(vec![7, 3, 9], i32::cmp);
        let copy = heap.clone();
        assert_eq!(heap.pop(), Some(3));
        heap.push(1);
        assert_eq!(copy.len(), 3);
        assert_eq!(copy.peek(), Some(&3));
        assert_eq!(copy.into_sorted_vec(), vec![3, 7, 9]);
        assert_eq!(heap.into_sorted_vec(), vec![1, 7, 9]);
    }

    #[test]
    fn replace_and_push_pop() {
        let mut heap = Heap::new();
        assert_eq!(heap.replace(4), None);
        heap.push(6);
        heap.push(2);
        assert_eq!(heap.replace(5), Some(2));
        assert_eq!(heap.as_slice()[0], 4);
        // Smaller than the root: handed straight back.
        assert_eq!(heap.push_pop(1), 1);
        assert_eq!(heap.push_pop(7), 4);
        assert_eq!(heap.into_sorted_vec(), vec![5, 6, 7]);
    }

    #[derive(Debug, Clone, Copy)]
    struct Entry {
        id: usize,
        key: i32,
    }

    impl PartialEq for Entry {
        fn eq(&self, other: &Self) -> bool {
            self.id == other.id
        }
    }

    fn by_key(a: &Entry, b: &Entry) -> Ordering {
        a.key.cmp(&b.key)
    }

    #[test]
    fn update_item_moves_entry_both_ways() {
        let mut heap = Heap::with_comparator(by_key);
        for (id, key) in [(0, 10), (1, 20), (2, 30), (3, 40), (4, 50)] {
            heap.push(Entry { id, key });
        }
        assert!(heap.update_item(Entry { id: 4, key: 5 }));
        assert_heap_property(&heap);
        assert_eq!(heap.peek().map(|e| e.id), Some(4));

        assert!(heap.update_item(Entry { id: 4, key: 60 }));
        assert_heap_property(&heap);
        let order: Vec<usize> = heap.into_sorted_vec().iter().map(|e| e.id).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn update_missing_item_is_noop() {
        let mut heap = Heap::with_comparator(by_key);
        heap.push(Entry { id: 0, key: 1 });
        assert!(!heap.update_item(Entry { id: 7, key: 0 }));
        assert!(!heap.contains(&Entry { id: 7, key: 0 }));
        assert_eq!(heap.len(), 1);
    }

    #[test]
    fn interleaved_operations_keep_root_minimal() {
        let mut heap = Heap::with_comparator(by_key);
        let keys = [17, 3, 44, 8, 23, 1, 39, 12];
        for (id, &key) in keys.iter().enumerate() {
            heap.push(Entry { id, key });
        }
        heap.pop();
        heap.update_item(Entry { id: 6, key: 0 });
        heap.push(Entry { id: 8, key: 2 });
        assert_heap_property(&heap);
        assert_eq!(heap.pop().map(|e| e.key), Some(0));
        assert_eq!(heap.pop().map(|e| e.key), Some(2));
        assert_eq!(heap.pop().map(|e| e.key), Some(3));
    }
}
