use std::collections::HashMap;

/// Remembers which item counts an edge loader has already been triggered for.
///
/// Keyed on item count rather than a single latch, so growing or shrinking
/// the list re-arms the edge without explicit resets.
#[derive(Debug, Clone, Default)]
pub struct ReachTracker {
    triggered: HashMap<usize, bool>,
}

impl ReachTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `item_count` as triggered. Returns false if it already was.
    pub fn mark(&mut self, item_count: usize) -> bool {
        let seen = self.triggered.entry(item_count).or_insert(false);
        if *seen {
            return false;
        }
        *seen = true;
        true
    }

    pub fn is_marked(&self, item_count: usize) -> bool {
        self.triggered.get(&item_count).copied().unwrap_or(false)
    }

    pub fn clear(&mut self) {
        self.triggered.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_once_per_count() {
        let mut tracker = ReachTracker::new();
        assert!(tracker.mark(15));
        assert!(!tracker.mark(15));
        assert!(tracker.is_marked(15));
        assert!(!tracker.is_marked(20));
        assert!(tracker.mark(20));
    }

    #[test]
    fn test_returning_to_an_old_count_stays_marked() {
        let mut tracker = ReachTracker::new();
        tracker.mark(15);
        tracker.mark(20);
        assert!(!tracker.mark(15));
    }

    #[test]
    fn test_clear_rearms() {
        let mut tracker = ReachTracker::new();
        tracker.mark(0);
        tracker.clear();
        assert!(tracker.mark(0));
    }
}
