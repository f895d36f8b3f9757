//! Achievement condition evaluation and unlock bookkeeping

use std::collections::BTreeSet;

use super::catalog::{AchievementCategory, AchievementCondition, AchievementDefinition};
use crate::judge::LockResult;
use crate::persistence::{KeyValueStore, keys, save_or_warn};
use crate::stats::{StatEvent, StatName};

/// Level progress snapshot for `AllLevelsCompleted`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelProgress {
    pub unlocked_levels: u32,
    pub total_levels: u32,
}

/// Does `event` satisfy `achievement`'s condition?
pub fn condition_met(
    achievement: &AchievementDefinition,
    event: StatEvent,
    progress: LevelProgress,
) -> bool {
    use AchievementCondition as C;

    let target = achievement.target_value;
    let StatEvent { name, value } = event;
    match achievement.condition {
        C::FirstPerfect => name == StatName::FirstPerfect,
        C::FirstLevelComplete => name == StatName::LevelsCompleted && value >= 1,
        C::PerfectsInRow => name == StatName::PerfectsInRow && value >= target,
        C::ComboReached => name == StatName::ComboReached && value >= target,
        C::TotalShapesCompleted => name == StatName::TotalShapesCompleted && value >= target,
        C::TotalScoreReached => name == StatName::TotalScore && value >= target,
        C::TotalPerfects => name == StatName::TotalPerfects && value >= target,
        C::LevelsCompleted => name == StatName::LevelsCompleted && value >= target,
        C::AllLevelsCompleted => {
            name == StatName::LevelsCompleted
                && progress.total_levels > 0
                && progress.unlocked_levels >= progress.total_levels
        }
        C::PerfectAccuracyOnLevel => name == StatName::PerfectAccuracyOnLevel,
        C::NoMissesOnLevel => name == StatName::NoMissesOnLevel,
        C::PlayTimeMinutes => name == StatName::PlayTimeMinutes && value >= target,
    }
}

/// Holds the catalog and the unlocked set
#[derive(Debug, Clone, Default)]
pub struct AchievementEngine {
    catalog: Vec<AchievementDefinition>,
    unlocked: BTreeSet<String>,
    unlocked_count: u32,
    total_stars: u32,
    /// Latched on the first Perfect until `reset_all`
    first_perfect_fired: bool,
}

impl AchievementEngine {
    pub fn new(catalog: Vec<AchievementDefinition>) -> Self {
        Self {
            catalog,
            ..Default::default()
        }
    }

    /// Replace the unlocked set with the one saved in `store`
    pub fn load<S: KeyValueStore + ?Sized>(&mut self, store: &S) {
        self.unlocked.clear();
        self.unlocked_count = 0;
        self.total_stars = 0;

        let data = store.get_string(keys::UNLOCKED_ACHIEVEMENTS, "");
        for id in data.split(',').map(str::trim).filter(|id| !id.is_empty()) {
            if !self.unlocked.insert(id.to_string()) {
                continue;
            }
            self.unlocked_count += 1;
            if let Some(def) = self.get(id) {
                self.total_stars += def.star_reward;
            } else {
                log::warn!("Saved achievement '{}' is not in the catalog", id);
            }
        }
        log::info!(
            "Loaded {} unlocked achievements ({} stars)",
            self.unlocked_count,
            self.total_stars
        );
    }

    /// Write the unlocked set (catalog order, then unknown ids) and flush
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        let known = self
            .catalog
            .iter()
            .filter(|a| self.unlocked.contains(&a.id))
            .map(|a| a.id.as_str());
        let unknown = self
            .unlocked
            .iter()
            .filter(|id| self.get(id).is_none())
            .map(String::as_str);
        let data = known.chain(unknown).collect::<Vec<_>>().join(",");

        store.set_string(keys::UNLOCKED_ACHIEVEMENTS, &data);
        save_or_warn(store, "achievements");
    }

    /// Feed a lock result; only the first-ever Perfect matters here
    pub fn on_lock(&mut self, result: LockResult, progress: LevelProgress) -> Vec<AchievementDefinition> {
        if result != LockResult::Perfect || self.first_perfect_fired {
            return Vec::new();
        }
        self.first_perfect_fired = true;
        self.on_stat(StatEvent::new(StatName::FirstPerfect, 1), progress)
    }

    /// Evaluate every locked achievement against `event`; returns new unlocks
    pub fn on_stat(&mut self, event: StatEvent, progress: LevelProgress) -> Vec<AchievementDefinition> {
        let newly: Vec<AchievementDefinition> = self
            .catalog
            .iter()
            .filter(|a| !self.unlocked.contains(&a.id))
            .filter(|a| condition_met(a, event, progress))
            .cloned()
            .collect();

        for achievement in &newly {
            self.unlock(achievement);
        }
        newly
    }

    fn unlock(&mut self, achievement: &AchievementDefinition) {
        if !self.unlocked.insert(achievement.id.clone()) {
            return;
        }
        self.unlocked_count += 1;
        self.total_stars += achievement.star_reward;
        log::info!(
            "Achievement unlocked: {} (+{} stars)",
            achievement.title,
            achievement.star_reward
        );
    }

    /// Forget every unlock, the counters and the FirstPerfect latch
    pub fn reset_all<S: KeyValueStore + ?Sized>(&mut self, store: &mut S) {
        store.delete_key(keys::UNLOCKED_ACHIEVEMENTS);
        save_or_warn(store, "achievement reset");
        self.load(store);
        self.first_perfect_fired = false;
    }

    pub fn get(&self, id: &str) -> Option<&AchievementDefinition> {
        self.catalog.iter().find(|a| a.id == id)
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains(id)
    }

    pub fn all(&self) -> &[AchievementDefinition] {
        &self.catalog
    }

    pub fn unlocked(&self) -> Vec<&AchievementDefinition> {
        self.catalog.iter().filter(|a| self.is_unlocked(&a.id)).collect()
    }

    pub fn locked(&self) -> Vec<&AchievementDefinition> {
        self.catalog.iter().filter(|a| !self.is_unlocked(&a.id)).collect()
    }

    pub fn by_category(&self, category: AchievementCategory) -> Vec<&AchievementDefinition> {
        self.catalog.iter().filter(|a| a.category == category).collect()
    }

    pub fn unlocked_count(&self) -> u32 {
        self.unlocked_count
    }

    pub fn total_stars(&self) -> u32 {
        self.total_stars
    }

    pub fn total_achievements(&self) -> usize {
        self.catalog.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievements::default_catalog;
    use crate::persistence::MemoryStore;
    use proptest::prelude::*;

    fn engine() -> AchievementEngine {
        AchievementEngine::new(default_catalog())
    }

    fn ids(list: &[AchievementDefinition]) -> Vec<&str> {
        list.iter().map(|a| a.id.as_str()).collect()
    }

    const NO_PROGRESS: LevelProgress = LevelProgress {
        unlocked_levels: 1,
        total_levels: 30,
    };

    #[test]
    fn test_perfects_in_row_unlocks_once() {
        let mut engine = engine();
        let event = StatEvent::new(StatName::PerfectsInRow, 5);

        let unlocked = engine.on_stat(event, NO_PROGRESS);
        assert_eq!(ids(&unlocked), vec!["perfect_5_row"]);
        assert_eq!(engine.total_stars(), 2);
        assert_eq!(engine.unlocked_count(), 1);

        assert!(engine.on_stat(event, NO_PROGRESS).is_empty());
        assert_eq!(engine.total_stars(), 2);
        assert_eq!(engine.unlocked_count(), 1);
    }

    #[test]
    fn test_threshold_unlocks_every_lower_tier() {
        let mut engine = engine();
        let unlocked = engine.on_stat(StatEvent::new(StatName::ComboReached, 30), NO_PROGRESS);
        assert_eq!(ids(&unlocked), vec!["combo_10", "combo_25"]);
        assert!(!engine.is_unlocked("combo_50"));
    }

    #[test]
    fn test_first_perfect_latch() {
        let mut engine = engine();
        assert!(engine.on_lock(LockResult::Good, NO_PROGRESS).is_empty());
        let unlocked = engine.on_lock(LockResult::Perfect, NO_PROGRESS);
        assert_eq!(ids(&unlocked), vec!["first_perfect"]);
        assert!(engine.on_lock(LockResult::Perfect, NO_PROGRESS).is_empty());
    }

    #[test]
    fn test_reset_clears_latch_and_counters() {
        let mut store = MemoryStore::new();
        let mut engine = engine();
        engine.on_lock(LockResult::Perfect, NO_PROGRESS);
        engine.save(&mut store);

        engine.reset_all(&mut store);
        assert_eq!(engine.unlocked_count(), 0);
        assert_eq!(engine.total_stars(), 0);
        assert!(!store.has_key(keys::UNLOCKED_ACHIEVEMENTS));

        let unlocked = engine.on_lock(LockResult::Perfect, NO_PROGRESS);
        assert_eq!(ids(&unlocked), vec!["first_perfect"]);
    }

    #[test]
    fn test_level_conditions() {
        let mut engine = engine();
        let unlocked = engine.on_stat(StatEvent::new(StatName::LevelsCompleted, 1), NO_PROGRESS);
        assert_eq!(ids(&unlocked), vec!["first_level"]);

        let all_done = LevelProgress {
            unlocked_levels: 30,
            total_levels: 30,
        };
        let unlocked = engine.on_stat(StatEvent::new(StatName::LevelsCompleted, 2), all_done);
        assert_eq!(ids(&unlocked), vec!["levels_all"]);

        // Other stat names never satisfy AllLevelsCompleted
        let mut fresh = self::engine();
        assert!(!ids(&fresh.on_stat(StatEvent::new(StatName::TotalScore, 1), all_done)).contains(&"levels_all"));
    }

    #[test]
    fn test_flag_conditions_ignore_value() {
        let mut engine = engine();
        let unlocked = engine.on_stat(StatEvent::new(StatName::NoMissesOnLevel, 0), NO_PROGRESS);
        assert_eq!(ids(&unlocked), vec!["no_miss_level"]);
        let unlocked = engine.on_stat(StatEvent::new(StatName::PerfectAccuracyOnLevel, 1), NO_PROGRESS);
        assert_eq!(ids(&unlocked), vec!["perfect_accuracy"]);
    }

    #[test]
    fn test_empty_catalog_unlocks_nothing() {
        let mut engine = AchievementEngine::new(Vec::new());
        assert!(engine.on_stat(StatEvent::new(StatName::TotalScore, 99999), NO_PROGRESS).is_empty());
        assert!(engine.on_lock(LockResult::Perfect, NO_PROGRESS).is_empty());
        assert_eq!(engine.total_achievements(), 0);
    }

    #[test]
    fn test_save_and_load() {
        let mut store = MemoryStore::new();
        store.set_string(keys::UNLOCKED_ACHIEVEMENTS, "combo_10,legacy_id,,combo_10");

        let mut engine = engine();
        engine.load(&store);
        assert_eq!(engine.unlocked_count(), 2);
        assert_eq!(engine.total_stars(), 1);
        assert!(engine.is_unlocked("legacy_id"));

        engine.on_stat(StatEvent::new(StatName::PerfectsInRow, 5), NO_PROGRESS);
        engine.save(&mut store);
        assert_eq!(
            store.get_string(keys::UNLOCKED_ACHIEVEMENTS, ""),
            "combo_10,perfect_5_row,legacy_id"
        );
    }

    #[test]
    fn test_queries() {
        let mut engine = engine();
        engine.on_stat(StatEvent::new(StatName::TotalShapesCompleted, 10), NO_PROGRESS);
        assert_eq!(engine.unlocked().len(), 1);
        assert_eq!(engine.locked().len(), 19);
        assert_eq!(engine.by_category(AchievementCategory::Mastery).len(), 4);
        assert_eq!(engine.get("shapes_10").map(|a| a.target_value), Some(10));
    }

    fn stat_event() -> impl Strategy<Value = StatEvent> {
        (0..StatName::ALL.len(), 0u32..200)
            .prop_map(|(i, value)| StatEvent::new(StatName::ALL[i], value))
    }

    proptest! {
        #[test]
        fn repeated_events_never_double_count(events in prop::collection::vec(stat_event(), 0..60)) {
            let mut engine = engine();
            for event in events {
                let stars_before = engine.total_stars();
                let count_before = engine.unlocked_count();
                let first = engine.on_stat(event, NO_PROGRESS);
                let gained: u32 = first.iter().map(|a| a.star_reward).sum();
                prop_assert_eq!(engine.total_stars(), stars_before + gained);
                prop_assert_eq!(engine.unlocked_count(), count_before + first.len() as u32);

                // Same event again unlocks nothing new
                prop_assert!(engine.on_stat(event, NO_PROGRESS).is_empty());
            }
            prop_assert_eq!(engine.unlocked_count() as usize, engine.unlocked().len());
        }
    }
}
