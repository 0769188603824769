//! Learner progress persistence.
//!
//! Progress for every unit lives under a single key of a small key-value
//! store, serialized as a JSON object from unit id to [`UnitProgress`].
//! Writes are best effort: failures are logged and the session carries on.

use anyhow::{Context, Result};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

use crate::models::{ProgressUpdate, ScoreSummary, UnitProgress};
use crate::quiz;

/// Key under which all unit progress is stored.
pub const STORAGE_KEY: &str = "word-game-progress";

/// Minimal string key-value persistence.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory store, lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Store backed by one JSON file holding every key.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory: {:?}", parent))?;
        }
        Ok(Self { path })
    }

    /// Get default storage location.
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wordgame")
            .join("progress.json")
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read store file: {:?}", self.path))?;
        let entries = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse store file: {:?}", self.path))?;
        Ok(entries)
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let json = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write store file: {:?}", self.path))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        // A corrupt file is replaced rather than blocking every later write.
        let mut entries = self.read_all().unwrap_or_default();
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

/// Per-unit progress on top of a [`KeyValueStore`].
pub struct ProgressStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> ProgressStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Progress for every unit that has any. Unreadable data yields an empty map.
    pub fn all_progress(&self) -> BTreeMap<String, UnitProgress> {
        let raw = match self.store.get(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return BTreeMap::new(),
            Err(e) => {
                error!(error = %e, "Failed to load progress");
                return BTreeMap::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            error!(error = %e, "Stored progress is corrupt, starting fresh");
            BTreeMap::new()
        })
    }

    fn save_all(&self, progress: &BTreeMap<String, UnitProgress>) {
        let result = serde_json::to_string(progress)
            .map_err(anyhow::Error::from)
            .and_then(|json| self.store.set(STORAGE_KEY, &json));
        if let Err(e) = result {
            warn!(error = %e, "Failed to save progress");
        }
    }

    /// Stored progress for `unit_id`, or a zeroed record.
    pub fn unit_progress(&self, unit_id: &str) -> UnitProgress {
        self.all_progress()
            .remove(unit_id)
            .unwrap_or_else(|| UnitProgress::new(unit_id))
    }

    /// Merge `update` into a unit's progress and refresh its study time.
    pub fn update_unit_progress(&self, unit_id: &str, update: ProgressUpdate) -> UnitProgress {
        let mut all = self.all_progress();
        let mut progress = all
            .remove(unit_id)
            .unwrap_or_else(|| UnitProgress::new(unit_id));
        update.apply(&mut progress);
        all.insert(unit_id.to_string(), progress.clone());
        self.save_all(&all);
        progress
    }

    /// Record a word as learned. Returns false if it was already recorded.
    pub fn mark_learned(&self, unit_id: &str, english: &str) -> bool {
        let progress = self.unit_progress(unit_id);
        if progress.has_learned(english) {
            return false;
        }

        let mut learned = progress.learned_words;
        learned.push(english.to_string());
        self.update_unit_progress(
            unit_id,
            ProgressUpdate {
                learned_words: Some(learned),
                ..Default::default()
            },
        );
        debug!(unit_id, word = english, "Marked word as learned");
        true
    }

    /// Add stars to a unit's running total.
    pub fn add_stars(&self, unit_id: &str, stars: u32) -> u32 {
        let progress = self.unit_progress(unit_id);
        let total = progress.stars.saturating_add(stars);
        self.update_unit_progress(
            unit_id,
            ProgressUpdate {
                stars: Some(total),
                ..Default::default()
            },
        );
        total
    }

    /// Fold a finished quiz into the unit's progress. Returns the stars earned.
    pub fn apply_quiz_result(&self, unit_id: &str, attempt_id: &str, summary: &ScoreSummary) -> u32 {
        let earned = quiz::stars_for(summary.percentage);

        let mut completed = self.unit_progress(unit_id).completed_tests;
        if !completed.iter().any(|t| t == attempt_id) {
            completed.push(attempt_id.to_string());
            self.update_unit_progress(
                unit_id,
                ProgressUpdate {
                    completed_tests: Some(completed),
                    ..Default::default()
                },
            );
        }
        let total = self.add_stars(unit_id, earned);

        info!(
            unit_id,
            attempt_id,
            correct = summary.correct,
            total = summary.total,
            percentage = summary.percentage,
            earned,
            stars = total,
            "Recorded quiz result"
        );
        earned
    }

    /// Share of a unit's words that have been learned, as a rounded percent.
    pub fn learned_percentage(&self, unit_id: &str, total_words: usize) -> u32 {
        if total_words == 0 {
            return 0;
        }
        let learned = self.unit_progress(unit_id).learned_words.len();
        (100.0 * learned as f64 / total_words as f64).round() as u32
    }

    /// Total stars and learned words over all units.
    pub fn totals(&self) -> (u32, usize) {
        self.all_progress()
            .values()
            .fold((0, 0), |(stars, words), p| {
                (stars + p.stars, words + p.learned_words.len())
            })
    }

    /// Forget all progress.
    pub fn reset_all(&self) -> Result<()> {
        self.store.remove(STORAGE_KEY)?;
        info!("Reset all progress");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Word;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn store() -> ProgressStore<MemoryStore> {
        ProgressStore::new(MemoryStore::default())
    }

    fn summary(correct: usize, total: usize) -> ScoreSummary {
        ScoreSummary {
            correct,
            total,
            percentage: (100 * correct / total) as u32,
            wrong_words: (correct..total).map(|i| Word::new(format!("w{}", i), "zh")).collect(),
        }
    }

    #[test]
    fn test_missing_unit_is_zeroed() {
        let progress = store().unit_progress("module-1-unit-1");
        assert_eq!(progress.unit_id, "module-1-unit-1");
        assert!(progress.learned_words.is_empty());
        assert!(progress.completed_tests.is_empty());
        assert_eq!(progress.stars, 0);
    }

    #[test]
    fn test_mark_learned_is_idempotent() {
        let progress = store();
        assert!(progress.mark_learned("u1", "cat"));
        assert!(!progress.mark_learned("u1", "cat"));
        assert_eq!(progress.unit_progress("u1").learned_words, vec!["cat".to_string()]);
    }

    #[test]
    fn test_stars_accumulate() {
        let progress = store();
        assert_eq!(progress.apply_quiz_result("u1", "a1", &summary(7, 10)), 2);
        assert_eq!(progress.unit_progress("u1").stars, 2);
        assert_eq!(progress.apply_quiz_result("u1", "a2", &summary(10, 10)), 3);
        assert_eq!(progress.unit_progress("u1").stars, 5);
        assert_eq!(
            progress.unit_progress("u1").completed_tests,
            vec!["a1".to_string(), "a2".to_string()]
        );
    }

    #[test]
    fn test_zero_star_result_is_recorded() {
        let progress = store();
        assert_eq!(progress.apply_quiz_result("u1", "a1", &summary(1, 10)), 0);
        let unit = progress.unit_progress("u1");
        assert_eq!(unit.stars, 0);
        assert_eq!(unit.completed_tests, vec!["a1".to_string()]);
    }

    #[test]
    fn test_update_keeps_other_units() {
        let progress = store();
        progress.mark_learned("u1", "cat");
        progress.add_stars("u2", 3);
        assert_eq!(progress.unit_progress("u1").learned_words.len(), 1);
        assert_eq!(progress.unit_progress("u2").stars, 3);
        assert_eq!(progress.totals(), (3, 1));
    }

    #[test]
    fn test_learned_percentage() {
        let progress = store();
        assert_eq!(progress.learned_percentage("u1", 0), 0);
        progress.mark_learned("u1", "cat");
        assert_eq!(progress.learned_percentage("u1", 3), 33);
        progress.mark_learned("u1", "dog");
        assert_eq!(progress.learned_percentage("u1", 3), 67);
    }

    #[test]
    fn test_corrupt_data_starts_fresh() {
        let kv = MemoryStore::default();
        kv.set(STORAGE_KEY, "{ broken").unwrap();
        let progress = ProgressStore::new(kv);
        assert!(progress.all_progress().is_empty());
        assert!(progress.mark_learned("u1", "cat"));
        assert_eq!(progress.all_progress().len(), 1);
    }

    #[test]
    fn test_reset_all() {
        let progress = store();
        progress.add_stars("u1", 2);
        progress.reset_all().unwrap();
        assert!(progress.all_progress().is_empty());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = std::env::temp_dir().join(format!("wordgame-test-{}", Uuid::new_v4()));
        let path = dir.join("progress.json");

        {
            let progress = ProgressStore::new(FileStore::new(path.clone()).unwrap());
            progress.mark_learned("module-1-unit-1", "met");
            progress.apply_quiz_result("module-1-unit-1", "abc12345", &summary(9, 10));
        }

        let progress = ProgressStore::new(FileStore::new(path).unwrap());
        let unit = progress.unit_progress("module-1-unit-1");
        assert_eq!(unit.learned_words, vec!["met".to_string()]);
        assert_eq!(unit.stars, 3);

        fs::remove_dir_all(dir).unwrap();
    }
}
