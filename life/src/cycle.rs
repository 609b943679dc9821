use std::collections::VecDeque;

/// Remembers the last `capacity` fingerprints and reports when one comes back.
///
/// A repeat means the world is either still or oscillating with a period no
/// longer than `capacity`. Longer periods go unnoticed.
#[derive(Debug, Clone)]
pub struct CycleDetector {
    history: VecDeque<u64>,
    capacity: usize,
}

impl CycleDetector {
    pub fn new(capacity: usize) -> Self {
        CycleDetector {
            history: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.history.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }

    /// Returns `true` if `fingerprint` was seen within the window. Otherwise records it.
    pub fn observe(&mut self, fingerprint: u64) -> bool {
        if self.history.contains(&fingerprint) {
            return true;
        }
        self.history.push_back(fingerprint);
        if self.history.len() > self.capacity {
            self.history.pop_front();
        }
        false
    }
}
