//! High score bookkeeping
//!
//! A single best score, persisted as JSON under one key. Storage is best
//! effort: anything unreadable counts as 0 and failed writes are only logged.

use crate::persistence::KeyValueStore;

/// Read/write contract the session uses at the end of a run
pub trait HighScoreStore {
    /// Stored best score, 0 if missing or unreadable
    fn read_high_score(&self) -> u32;
    /// Persist a new best score. Failures are swallowed.
    fn write_high_score(&mut self, score: u32);
}

/// High score slot on top of a key-value store
#[derive(Debug, Clone, Default)]
pub struct HighScores<S> {
    store: S,
}

impl<S: KeyValueStore> HighScores<S> {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "flappy3d_high_score";

    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Forget the stored best score
    pub fn clear(&mut self) {
        if let Err(e) = self.store.remove(Self::STORAGE_KEY) {
            log::warn!("Could not clear high score: {e:#}");
        }
    }
}

impl<S: KeyValueStore> HighScoreStore for HighScores<S> {
    fn read_high_score(&self) -> u32 {
        match self.store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<u32>(json.trim()) {
                Ok(score) => {
                    log::info!("Loaded high score {}", score);
                    score
                }
                Err(e) => {
                    log::warn!("Stored high score unreadable ({e}), starting from 0");
                    0
                }
            },
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                0
            }
            Err(e) => {
                log::warn!("High score store unavailable: {e:#}");
                0
            }
        }
    }

    fn write_high_score(&mut self, score: u32) {
        let json = match serde_json::to_string(&score) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not encode high score: {e}");
                return;
            }
        };
        match self.store.set(Self::STORAGE_KEY, &json) {
            Ok(()) => log::info!("High score {} saved", score),
            Err(e) => log::warn!("High score not saved: {e:#}"),
        }
    }
}

/// Store that never persists anything (storage disabled)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHighScores;

impl HighScoreStore for NoHighScores {
    fn read_high_score(&self) -> u32 {
        0
    }

    fn write_high_score(&mut self, _score: u32) {}
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use anyhow::bail;

    /// Store whose every operation fails
    pub(crate) struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
            bail!("quota exceeded")
        }
        fn set(&mut self, _key: &str, _value: &str) -> anyhow::Result<()> {
            bail!("quota exceeded")
        }
        fn remove(&mut self, _key: &str) -> anyhow::Result<()> {
            bail!("quota exceeded")
        }
    }

    #[test]
    fn test_missing_score_reads_zero() {
        let scores = HighScores::new(MemoryStore::new());
        assert_eq!(scores.read_high_score(), 0);
    }

    #[test]
    fn test_write_then_read() {
        let mut scores = HighScores::new(MemoryStore::new());
        scores.write_high_score(42);
        assert_eq!(scores.read_high_score(), 42);
        assert_eq!(
            scores
                .store()
                .get(HighScores::<MemoryStore>::STORAGE_KEY)
                .unwrap()
                .as_deref(),
            Some("42")
        );

        scores.clear();
        assert_eq!(scores.read_high_score(), 0);
    }

    #[test]
    fn test_garbage_reads_zero() {
        let mut store = MemoryStore::new();
        store
            .set(HighScores::<MemoryStore>::STORAGE_KEY, "lots")
            .unwrap();
        assert_eq!(HighScores::new(store).read_high_score(), 0);
    }

    #[test]
    fn test_broken_store_is_silent() {
        let mut scores = HighScores::new(BrokenStore);
        assert_eq!(scores.read_high_score(), 0);
        // Must not panic
        scores.write_high_score(7);
        scores.clear();
    }

    #[test]
    fn test_no_high_scores() {
        let mut store = NoHighScores;
        store.write_high_score(10);
        assert_eq!(store.read_high_score(), 0);
    }
}
