use std::collections::{HashSet, VecDeque};
use std::hash::Hash;

/// Set with atomic check-and-insert and optional FIFO eviction
///
/// Not synchronized on its own; callers wrap it in a lock so that
/// `insert` is the single check-and-insert step.
#[derive(Debug)]
pub struct BoundedSet<T: Clone + Eq + Hash> {
    items: HashSet<T>,
    order: VecDeque<T>,
    /// 0 = unbounded
    capacity: usize,
    evictions: u64,
}

impl<T: Clone + Eq + Hash> BoundedSet<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: HashSet::new(),
            order: VecDeque::new(),
            capacity,
            evictions: 0,
        }
    }

    /// Returns false if the item was already present
    pub fn insert(&mut self, item: T) -> bool {
        if self.items.contains(&item) {
            return false;
        }

        if self.capacity > 0 {
            while self.items.len() >= self.capacity {
                match self.order.pop_front() {
                    Some(oldest) => {
                        self.items.remove(&oldest);
                        self.evictions += 1;
                    }
                    None => break,
                }
            }
            self.order.push_back(item.clone());
        }

        self.items.insert(item)
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn evictions(&self) -> u64 {
        self.evictions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_check_and_insert() {
        let mut set = BoundedSet::new(0);
        assert!(set.insert("SIG1"));
        assert!(!set.insert("SIG1"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_oldest_entries_are_evicted_first() {
        let mut set = BoundedSet::new(3);
        for sig in ["a", "b", "c", "d"] {
            assert!(set.insert(sig));
        }

        assert_eq!(set.len(), 3);
        assert_eq!(set.evictions(), 1);
        assert!(!set.contains(&"a"));
        assert!(set.contains(&"d"));

        // Re-inserting a present item does not refresh or evict
        assert!(!set.insert("b"));
        assert!(set.insert("e"));
        assert!(!set.contains(&"b"));
        assert!(set.contains(&"c"));
    }

    #[test]
    fn test_unbounded_never_evicts() {
        let mut set = BoundedSet::new(0);
        for i in 0..10_000u32 {
            set.insert(i);
        }
        assert_eq!(set.len(), 10_000);
        assert_eq!(set.evictions(), 0);
    }
}
