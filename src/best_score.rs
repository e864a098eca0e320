//! Best score tracking
//!
//! A single value, read once at startup and written only when beaten.

use crate::persistence::KeyValueStore;

/// Storage key for the best score
pub const STORAGE_KEY: &str = "bestScore";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BestScore {
    value: u64,
}

impl BestScore {
    pub fn new(value: u64) -> Self {
        Self { value }
    }

    /// Load from storage (0 when missing or unreadable)
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let value = store.get_int(STORAGE_KEY);
        log::info!("Best score: {}", value);
        Self { value }
    }

    pub fn get(&self) -> u64 {
        self.value
    }

    /// Whether `score` would replace the current best
    pub fn beaten_by(&self, score: u64) -> bool {
        score > self.value
    }

    /// Record a finished run's score. Returns true on a new best.
    ///
    /// The in-memory value is updated even if the write fails, so the rest of
    /// the session still shows the right number.
    pub fn submit(&mut self, score: u64, store: &mut dyn KeyValueStore) -> bool {
        if !self.beaten_by(score) {
            return false;
        }

        log::info!("New best score: {} (was {})", score, self.value);
        self.value = score;
        if let Err(e) = store.set_int(STORAGE_KEY, score) {
            log::warn!("Failed to save best score: {}", e);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use proptest::prelude::*;

    #[test]
    fn test_load_missing_is_zero() {
        let store = MemoryStore::new();
        assert_eq!(BestScore::load(&store).get(), 0);
    }

    #[test]
    fn test_load_existing() {
        let store = MemoryStore::new().with_entry(STORAGE_KEY, "23");
        assert_eq!(BestScore::load(&store).get(), 23);
    }

    #[test]
    fn test_only_strictly_greater_scores_update() {
        let mut store = MemoryStore::new();
        let mut best = BestScore::new(10);

        assert!(!best.submit(10, &mut store));
        assert_eq!(store.get_int(STORAGE_KEY), 0, "equal score must not write");

        assert!(!best.submit(3, &mut store));
        assert_eq!(best.get(), 10);

        assert!(best.submit(11, &mut store));
        assert_eq!(best.get(), 11);
        assert_eq!(store.get_int(STORAGE_KEY), 11);
    }

    #[test]
    fn test_write_failure_keeps_session_value() {
        let mut store = MemoryStore::read_only();
        let mut best = BestScore::new(0);
        assert!(best.submit(5, &mut store));
        assert_eq!(best.get(), 5);
    }

    proptest! {
        #[test]
        fn prop_best_is_running_max(scores in prop::collection::vec(0u64..1000, 0..50)) {
            let mut store = MemoryStore::new();
            let mut best = BestScore::load(&store);
            let mut max = 0;
            for score in scores {
                let before = best.get();
                let improved = best.submit(score, &mut store);
                prop_assert_eq!(improved, score > before);
                prop_assert!(best.get() >= before);
                max = max.max(score);
            }
            prop_assert_eq!(best.get(), max);
            prop_assert_eq!(store.get_int(STORAGE_KEY), max);
        }
    }
}
