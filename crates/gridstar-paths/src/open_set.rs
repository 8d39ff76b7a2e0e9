//! The A* open set: a min-heap keyed by `(f, insertion order)`.
//!
//! Lower `f` pops first; ties go to the entry inserted earliest. Lowering
//! the key of an entry already in the set keeps its original insertion
//! number, so an updated entry never jumps ahead of an older equal-`f`
//! entry. Outdated heap entries are skipped lazily on pop.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Key {
    f: i32,
    /// Monotonically increasing counter used to break ties.
    seq: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Entry {
    key: Key,
    idx: usize,
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Wrapped in Reverse for the BinaryHeap: smaller f first, then
        // smaller seq.
        self.key
            .f
            .cmp(&other.key.f)
            .then_with(|| self.key.seq.cmp(&other.key.seq))
            .then_with(|| self.idx.cmp(&other.idx))
    }
}

/// Open set over flat cell indices `0..capacity`.
#[derive(Debug, Clone, Default)]
pub struct OpenSet {
    heap: BinaryHeap<Reverse<Entry>>,
    /// Live key per index; `None` when the index is not in the set.
    keys: Vec<Option<Key>>,
    len: usize,
    seq: u64,
}

impl OpenSet {
    /// Create an empty open set for indices `0..capacity`.
    pub fn new(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::new(),
            keys: vec![None; capacity],
            len: 0,
            seq: 0,
        }
    }

    /// Empty the set and resize it for indices `0..capacity`.
    pub fn clear(&mut self, capacity: usize) {
        self.heap.clear();
        self.keys.clear();
        self.keys.resize(capacity, None);
        self.len = 0;
        self.seq = 0;
    }

    /// Insert `idx` with priority `f`, or lower its priority if it is
    /// already present. A key that is not lower is ignored.
    ///
    /// Returns `true` if `idx` was newly inserted.
    pub fn push(&mut self, idx: usize, f: i32) -> bool {
        match self.keys[idx] {
            Some(key) => {
                if f < key.f {
                    let key = Key { f, seq: key.seq };
                    self.keys[idx] = Some(key);
                    self.heap.push(Reverse(Entry { key, idx }));
                }
                false
            }
            None => {
                let key = Key { f, seq: self.seq };
                self.seq += 1;
                self.keys[idx] = Some(key);
                self.len += 1;
                self.heap.push(Reverse(Entry { key, idx }));
                true
            }
        }
    }

    /// Remove and return the index with the lowest `(f, insertion order)`,
    /// together with its `f`.
    pub fn pop(&mut self) -> Option<(usize, i32)> {
        while let Some(Reverse(entry)) = self.heap.pop() {
            if self.keys[entry.idx] == Some(entry.key) {
                self.keys[entry.idx] = None;
                self.len -= 1;
                return Some((entry.idx, entry.key.f));
            }
        }
        None
    }

    /// Whether `idx` is currently in the set.
    #[inline]
    pub fn contains(&self, idx: usize) -> bool {
        self.keys.get(idx).is_some_and(Option::is_some)
    }

    /// Number of indices in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Live indices in the order they would be popped.
    pub fn indices(&self) -> Vec<usize> {
        let mut live: Vec<(Key, usize)> = self
            .keys
            .iter()
            .enumerate()
            .filter_map(|(i, k)| k.map(|k| (k, i)))
            .collect();
        live.sort_by(|a, b| a.0.f.cmp(&b.0.f).then(a.0.seq.cmp(&b.0.seq)));
        live.into_iter().map(|(_, i)| i).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_lowest_f_first() {
        let mut s = OpenSet::new(8);
        s.push(0, 3);
        s.push(1, 1);
        s.push(2, 2);
        assert_eq!(s.pop(), Some((1, 1)));
        assert_eq!(s.pop(), Some((2, 2)));
        assert_eq!(s.pop(), Some((0, 3)));
        assert_eq!(s.pop(), None);
    }

    #[test]
    fn equal_f_pops_in_insertion_order() {
        let mut s = OpenSet::new(8);
        s.push(5, 4);
        s.push(2, 4);
        s.push(7, 4);
        assert_eq!(s.pop(), Some((5, 4)));
        assert_eq!(s.pop(), Some((2, 4)));
        assert_eq!(s.pop(), Some((7, 4)));
    }

    #[test]
    fn lowered_key_keeps_insertion_order() {
        let mut s = OpenSet::new(8);
        assert!(s.push(0, 6));
        assert!(s.push(1, 4));
        assert!(!s.push(0, 4));
        assert_eq!(s.len(), 2);
        assert_eq!(s.indices(), vec![0, 1]);
        assert_eq!(s.pop(), Some((0, 4)));
        assert_eq!(s.pop(), Some((1, 4)));
        assert!(s.is_empty());
    }

    #[test]
    fn higher_key_is_ignored() {
        let mut s = OpenSet::new(4);
        s.push(3, 2);
        assert!(!s.push(3, 9));
        assert_eq!(s.len(), 1);
        assert_eq!(s.pop(), Some((3, 2)));
    }

    #[test]
    fn contains_tracks_membership() {
        let mut s = OpenSet::new(4);
        assert!(!s.contains(1));
        s.push(1, 0);
        assert!(s.contains(1));
        s.pop();
        assert!(!s.contains(1));
        assert!(!s.contains(99));
    }

    #[test]
    fn clear_resets_sequence() {
        let mut s = OpenSet::new(2);
        s.push(0, 1);
        s.push(1, 1);
        s.clear(3);
        assert!(s.is_empty());
        s.push(2, 1);
        s.push(0, 1);
        assert_eq!(s.pop(), Some((2, 1)));
    }
}
