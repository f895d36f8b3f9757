//! Level catalog and per-level records
//!
//! Records are persisted in the key-value store: best score, best combo and a
//! completed flag per level, plus the highest unlocked level index.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::FALLBACK_SHAPES_REQUIRED;
use crate::persistence::{KeyValueStore, keys, save_or_warn};

/// Seed for the shipped level requirements
pub const LEVEL_SEED: u64 = 0x5747_4C4B;

/// Shapes required per level are drawn from this range
pub const MIN_LEVEL_SHAPES: u32 = 5;
pub const MAX_LEVEL_SHAPES: u32 = 15;

const LEVEL_NAMES: [&str; 30] = [
    "First Steps",
    "Warm Up",
    "Getting Started",
    "Easy Breeze",
    "Smooth Sailing",
    "Rising Sun",
    "Quick Feet",
    "Steady Rhythm",
    "Building Momentum",
    "Finding Flow",
    "Sharp Focus",
    "Swift Motion",
    "Growing Strong",
    "Gaining Speed",
    "Half Way",
    "Breaking Through",
    "Rising Challenge",
    "Pushing Limits",
    "High Gear",
    "Full Throttle",
    "No Mercy",
    "Razor Edge",
    "Lightning Fast",
    "Storm Chaser",
    "Fire Dance",
    "Shadow Strike",
    "Final Push",
    "Ultimate Test",
    "Grand Finale",
    "Perfect Master",
];

/// One level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub name: String,
    pub shapes_to_complete: u32,
}

/// Ordered list of levels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCatalog {
    pub levels: Vec<LevelInfo>,
}

impl LevelCatalog {
    pub fn new(levels: Vec<LevelInfo>) -> Self {
        Self { levels }
    }

    /// The 30 shipped levels with seeded requirements
    pub fn default_catalog() -> Self {
        Self::generate(LEVEL_SEED)
    }

    /// Shipped level names with requirements drawn from `seed`
    pub fn generate(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let levels = LEVEL_NAMES
            .iter()
            .map(|name| LevelInfo {
                name: name.to_string(),
                shapes_to_complete: rng.random_range(MIN_LEVEL_SHAPES..=MAX_LEVEL_SHAPES),
            })
            .collect();
        Self { levels }
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Level at `index`, clamped into range. `None` only for an empty catalog.
    pub fn get(&self, index: usize) -> Option<&LevelInfo> {
        let last = self.levels.len().checked_sub(1)?;
        self.levels.get(index.min(last))
    }

    /// Shapes needed to clear level `index`
    pub fn shapes_required(&self, index: usize) -> u32 {
        self.get(index)
            .map(|level| level.shapes_to_complete.max(1))
            .unwrap_or(FALLBACK_SHAPES_REQUIRED)
    }

    /// Display name, "Level N" when the catalog is empty
    pub fn name(&self, index: usize) -> String {
        self.get(index)
            .map(|level| level.name.clone())
            .unwrap_or_else(|| format!("Level {}", index + 1))
    }
}

/// Stored result for a single level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRecord {
    pub best_score: u32,
    pub best_combo: u32,
    pub completed: bool,
}

/// Per-level bests and unlock progress
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelRecords {
    records: Vec<LevelRecord>,
    /// Highest level index the player may start
    unlocked_level: u32,
}

impl LevelRecords {
    pub fn new(level_count: usize) -> Self {
        Self {
            records: vec![LevelRecord::default(); level_count],
            unlocked_level: 0,
        }
    }

    /// Read records for `level_count` levels from `store`
    pub fn load<S: KeyValueStore + ?Sized>(store: &S, level_count: usize) -> Self {
        let records = (0..level_count)
            .map(|i| LevelRecord {
                best_score: store.get_count(&keys::level_best_score(i), 0),
                best_combo: store.get_count(&keys::level_best_combo(i), 0),
                completed: store.get_int(&keys::level_completed(i), 0) != 0,
            })
            .collect::<Vec<_>>();
        let unlocked_level = store.get_count(keys::UNLOCKED_LEVEL, 0);
        let completed = records.iter().filter(|r| r.completed).count();
        log::info!(
            "Loaded level records ({} completed, {} unlocked)",
            completed,
            unlocked_level + 1
        );
        Self {
            records,
            unlocked_level,
        }
    }

    /// Save a finished level. Bests only move upward; level `index + 1`
    /// becomes playable. Returns true if either best improved.
    pub fn record_completion<S: KeyValueStore + ?Sized>(
        &mut self,
        index: usize,
        score: u32,
        max_combo: u32,
        store: &mut S,
    ) -> bool {
        if index >= self.records.len() {
            self.records.resize(index + 1, LevelRecord::default());
        }
        let record = &mut self.records[index];
        let mut improved = false;

        if score > record.best_score {
            record.best_score = score;
            store.set_int(&keys::level_best_score(index), i64::from(score));
            improved = true;
        }
        if max_combo > record.best_combo {
            record.best_combo = max_combo;
            store.set_int(&keys::level_best_combo(index), i64::from(max_combo));
            improved = true;
        }
        record.completed = true;
        store.set_int(&keys::level_completed(index), 1);

        let next = u32::try_from(index + 1).unwrap_or(u32::MAX);
        if next > self.unlocked_level {
            self.unlocked_level = next;
            store.set_int(keys::UNLOCKED_LEVEL, i64::from(next));
            log::info!("Unlocked level {}", next + 1);
        }

        save_or_warn(store, "level records");
        improved
    }

    pub fn record(&self, index: usize) -> LevelRecord {
        self.records.get(index).copied().unwrap_or_default()
    }

    pub fn best_score(&self, index: usize) -> u32 {
        self.record(index).best_score
    }

    pub fn best_combo(&self, index: usize) -> u32 {
        self.record(index).best_combo
    }

    pub fn is_completed(&self, index: usize) -> bool {
        self.record(index).completed
    }

    pub fn is_unlocked(&self, index: usize) -> bool {
        index as u64 <= u64::from(self.unlocked_level)
    }

    /// Number of playable levels (at least 1)
    pub fn unlocked_level_count(&self) -> u32 {
        self.unlocked_level.saturating_add(1)
    }

    pub fn completed_count(&self) -> usize {
        self.records.iter().filter(|r| r.completed).count()
    }

    /// Erase every level record from `store`
    pub fn reset<S: KeyValueStore + ?Sized>(&mut self, store: &mut S) {
        for i in 0..self.records.len() {
            store.delete_key(&keys::level_best_score(i));
            store.delete_key(&keys::level_best_combo(i));
            store.delete_key(&keys::level_completed(i));
        }
        store.delete_key(keys::UNLOCKED_LEVEL);
        save_or_warn(store, "level reset");
        *self = Self::new(self.records.len());
        log::info!("Level records reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_default_catalog() {
        let catalog = LevelCatalog::default_catalog();
        assert_eq!(catalog.len(), 30);
        assert_eq!(catalog.name(0), "First Steps");
        assert_eq!(catalog.name(29), "Perfect Master");
        assert!(catalog.levels.iter().all(|l| {
            (MIN_LEVEL_SHAPES..=MAX_LEVEL_SHAPES).contains(&l.shapes_to_complete)
        }));

        // Deterministic for a given seed
        assert_eq!(catalog, LevelCatalog::default_catalog());
    }

    #[test]
    fn test_get_clamps_index() {
        let catalog = LevelCatalog::default_catalog();
        assert_eq!(catalog.get(500), catalog.get(29));
        assert_eq!(catalog.shapes_required(500), catalog.shapes_required(29));
    }

    #[test]
    fn test_empty_catalog_fallback() {
        let catalog = LevelCatalog::default();
        assert!(catalog.get(0).is_none());
        assert_eq!(catalog.shapes_required(3), FALLBACK_SHAPES_REQUIRED);
        assert_eq!(catalog.name(3), "Level 4");
    }

    #[test]
    fn test_record_completion() {
        let mut store = MemoryStore::new();
        let mut records = LevelRecords::new(30);
        assert_eq!(records.unlocked_level_count(), 1);
        assert!(records.is_unlocked(0));
        assert!(!records.is_unlocked(1));

        assert!(records.record_completion(0, 500, 8, &mut store));
        assert_eq!(records.unlocked_level_count(), 2);
        assert_eq!(store.get_int("Level_0_BestScore", 0), 500);
        assert_eq!(store.get_int("Level_0_Completed", 0), 1);
        assert_eq!(store.get_int("UnlockedLevel", 0), 1);

        // Worse run keeps the bests
        assert!(!records.record_completion(0, 200, 3, &mut store));
        assert_eq!(records.best_score(0), 500);
        assert_eq!(records.best_combo(0), 8);

        // Replaying an early level never lowers the unlock
        records.record_completion(4, 100, 1, &mut store);
        records.record_completion(1, 100, 1, &mut store);
        assert_eq!(records.unlocked_level_count(), 6);
        assert_eq!(records.completed_count(), 3);
    }

    #[test]
    fn test_load_and_reset() {
        let mut store = MemoryStore::new();
        LevelRecords::new(30).record_completion(2, 750, 12, &mut store);

        let mut records = LevelRecords::load(&store, 30);
        assert!(records.is_completed(2));
        assert!(!records.is_completed(1));
        assert_eq!(records.best_combo(2), 12);
        assert_eq!(records.unlocked_level_count(), 4);

        records.reset(&mut store);
        assert_eq!(records.unlocked_level_count(), 1);
        assert!(!store.has_key("Level_2_BestScore"));
        assert!(!store.has_key("UnlockedLevel"));
        assert_eq!(LevelRecords::load(&store, 30), LevelRecords::new(30));
    }
}
