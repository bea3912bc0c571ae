use bitvec::prelude::*;
use fxhash::FxHashMap;
use std::cmp::Ordering;
use std::fmt;
use std::fmt::{Debug, Formatter};
use std::ops::Index;

#[derive(Clone, Default, PartialEq, Eq)]
pub struct BitSet {
    cardinality: usize,
    bit_vec: BitVec,
}

impl Debug for BitSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let values: Vec<_> = self.iter().map(|i| i.to_string()).collect();
        write!(
            f,
            "BitSet {{ cardinality: {}, bit_vec: [{}]}}",
            self.cardinality,
            values.join(", "),
        )
    }
}

impl BitSet {
    #[inline]
    pub fn new(size: usize) -> Self {
        Self {
            cardinality: 0,
            bit_vec: bitvec![0; size],
        }
    }

    #[inline]
    pub fn empty(&self) -> bool {
        self.cardinality == 0
    }

    #[inline]
    pub fn cardinality(&self) -> usize {
        self.cardinality
    }

    /// Sets the bit at `idx`, growing the set if needed. Returns the previous value.
    #[inline]
    pub fn set_bit(&mut self, idx: usize) -> bool {
        if idx >= self.bit_vec.len() {
            self.bit_vec.resize(idx + 1, false);
        }
        if !self.bit_vec[idx] {
            self.bit_vec.set(idx, true);
            self.cardinality += 1;
            false
        } else {
            true
        }
    }

    #[inline]
    pub fn unset_bit(&mut self, idx: usize) -> bool {
        if idx < self.bit_vec.len() && self.bit_vec[idx] {
            self.bit_vec.set(idx, false);
            self.cardinality -= 1;
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn contains(&self, idx: usize) -> bool {
        idx < self.bit_vec.len() && self.bit_vec[idx]
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bit_vec
            .iter()
            .enumerate()
            .filter(|(_, b)| **b)
            .map(|(i, _)| i)
    }
}

impl Index<usize> for BitSet {
    type Output = bool;

    fn index(&self, index: usize) -> &Self::Output {
        if self.contains(index) {
            &true
        } else {
            &false
        }
    }
}

/// Indexed binary min-heap over `usize` elements.
///
/// Elements with equal priority are popped in ascending element order, which
/// makes every greedy heuristic built on top of it deterministic.
#[derive(Debug, Default)]
pub struct BinaryQueue {
    heap: Vec<usize>,
    values: FxHashMap<usize, i64>,
    indices: FxHashMap<usize, usize>,
}

impl BinaryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, element: usize) -> bool {
        self.indices.contains_key(&element)
    }

    pub fn priority(&self, element: usize) -> Option<i64> {
        self.values.get(&element).copied()
    }

    /// Inserts `element` or updates its priority if it is already queued.
    pub fn insert(&mut self, element: usize, priority: i64) {
        if let Some(old) = self.values.insert(element, priority) {
            if old == priority {
                return;
            }
            let idx = self.indices[&element];
            self.up(idx);
            let idx = self.indices[&element];
            self.down(idx);
        } else {
            self.indices.insert(element, self.heap.len());
            self.heap.push(element);
            self.up(self.heap.len() - 1);
        }
    }

    pub fn pop_min(&mut self) -> Option<(usize, i64)> {
        let k = *self.heap.first()?;
        let v = self.values[&k];
        self.remove(k);
        Some((k, v))
    }

    pub fn remove(&mut self, element: usize) -> bool {
        let idx = match self.indices.remove(&element) {
            Some(idx) => idx,
            None => return false,
        };
        self.values.remove(&element);
        let last = self.heap.len() - 1;
        self.heap.swap(idx, last);
        self.heap.pop();
        if idx < self.heap.len() {
            let moved = self.heap[idx];
            self.indices.insert(moved, idx);
            self.up(idx);
            let idx = self.indices[&moved];
            self.down(idx);
        }
        true
    }

    #[inline]
    fn less(&self, a: usize, b: usize) -> bool {
        match self.values[&a].cmp(&self.values[&b]) {
            Ordering::Less => true,
            Ordering::Equal => a < b,
            Ordering::Greater => false,
        }
    }

    fn up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if self.less(self.heap[idx], self.heap[parent]) {
                self.swap_nodes(idx, parent);
                idx = parent;
            } else {
                break;
            }
        }
    }

    fn down(&mut self, mut idx: usize) {
        loop {
            let first = 2 * idx + 1;
            let second = first + 1;
            let mut smallest = idx;
            if first < self.heap.len() && self.less(self.heap[first], self.heap[smallest]) {
                smallest = first;
            }
            if second < self.heap.len() && self.less(self.heap[second], self.heap[smallest]) {
                smallest = second;
            }
            if smallest == idx {
                break;
            }
            self.swap_nodes(idx, smallest);
            idx = smallest;
        }
    }

    fn swap_nodes(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.indices.insert(self.heap[a], a);
        self.indices.insert(self.heap[b], b);
    }
}

#[cfg(test)]
mod tests {
    use crate::datastructures::{BinaryQueue, BitSet};

    #[test]
    fn iter() {
        let mut bs = BitSet::new(256);

        let a: Vec<usize> = (0..256).filter(|i| i % 2 == 0).collect();
        for i in &a {
            bs.set_bit(*i);
        }

        let b: Vec<usize> = bs.iter().collect();
        assert_eq!(a, b);
        assert_eq!(bs.cardinality(), 128);
    }

    #[test]
    fn grows_on_demand() {
        let mut bs = BitSet::new(2);
        assert!(!bs.set_bit(10));
        assert!(bs.set_bit(10));
        assert!(bs[10]);
        assert!(!bs[11]);
        assert!(bs.unset_bit(10));
        assert!(bs.empty());
    }

    #[test]
    fn pq_pop_min() {
        let mut pq = BinaryQueue::new();

        pq.insert(0, 10);
        pq.insert(16, 1);
        pq.insert(1, 15);

        assert_eq!(pq.pop_min(), Some((16, 1)));
        assert_eq!(pq.pop_min(), Some((0, 10)));
        assert_eq!(pq.pop_min(), Some((1, 15)));
        assert_eq!(pq.pop_min(), None);
    }

    #[test]
    fn pq_update() {
        let mut pq = BinaryQueue::new();

        pq.insert(0, 10);
        pq.insert(16, 1);
        pq.insert(1, 15);
        pq.insert(16, 11);

        assert_eq!(pq.pop_min(), Some((0, 10)));
        assert_eq!(pq.pop_min(), Some((16, 11)));
        assert_eq!(pq.pop_min(), Some((1, 15)));
        assert_eq!(pq.pop_min(), None);
    }

    #[test]
    fn pq_ties_break_by_lowest_element() {
        let mut pq = BinaryQueue::new();
        for v in [7, 3, 9, 1, 5].iter().copied() {
            pq.insert(v, 0);
        }
        pq.remove(3);
        let popped: Vec<_> = std::iter::from_fn(|| pq.pop_min().map(|(v, _)| v)).collect();
        assert_eq!(popped, vec![1, 5, 7, 9]);
        assert!(pq.is_empty());
    }
}
