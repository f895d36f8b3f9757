//! Session and lifetime statistics
//!
//! Reacts to lock results, score/combo changes and level completion, and
//! reports every counter change as a named `StatEvent` for the achievement
//! engine. Lifetime counters only grow; they are loaded at startup and flushed
//! on pause/quit.

use serde::{Deserialize, Serialize};

use crate::judge::LockResult;
use crate::persistence::{KeyValueStore, keys, save_or_warn};

/// Names of stat events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatName {
    FirstPerfect,
    PerfectsInRow,
    TotalPerfects,
    TotalShapesCompleted,
    TotalScore,
    ComboReached,
    BestComboEver,
    LevelsCompleted,
    NoMissesOnLevel,
    PerfectAccuracyOnLevel,
    PlayTimeMinutes,
}

impl StatName {
    pub const ALL: [StatName; 11] = [
        StatName::FirstPerfect,
        StatName::PerfectsInRow,
        StatName::TotalPerfects,
        StatName::TotalShapesCompleted,
        StatName::TotalScore,
        StatName::ComboReached,
        StatName::BestComboEver,
        StatName::LevelsCompleted,
        StatName::NoMissesOnLevel,
        StatName::PerfectAccuracyOnLevel,
        StatName::PlayTimeMinutes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatName::FirstPerfect => "FirstPerfect",
            StatName::PerfectsInRow => "PerfectsInRow",
            StatName::TotalPerfects => "TotalPerfects",
            StatName::TotalShapesCompleted => "TotalShapesCompleted",
            StatName::TotalScore => "TotalScore",
            StatName::ComboReached => "ComboReached",
            StatName::BestComboEver => "BestComboEver",
            StatName::LevelsCompleted => "LevelsCompleted",
            StatName::NoMissesOnLevel => "NoMissesOnLevel",
            StatName::PerfectAccuracyOnLevel => "PerfectAccuracyOnLevel",
            StatName::PlayTimeMinutes => "PlayTimeMinutes",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|name| name.as_str() == s)
    }
}

/// A named counter change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatEvent {
    pub name: StatName,
    pub value: u32,
}

impl StatEvent {
    pub fn new(name: StatName, value: u32) -> Self {
        Self { name, value }
    }
}

/// Counters kept for the life of the installation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LifetimeStats {
    pub total_perfects: u32,
    pub total_goods: u32,
    pub total_misses: u32,
    pub total_shapes_completed: u32,
    pub total_score: u32,
    pub best_combo_ever: u32,
    pub levels_completed: u32,
    pub total_play_time_minutes: f32,
}

impl LifetimeStats {
    /// Read from `store`; missing keys are zero
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        Self {
            total_perfects: store.get_count(keys::TOTAL_PERFECTS, 0),
            total_goods: store.get_count(keys::TOTAL_GOODS, 0),
            total_misses: store.get_count(keys::TOTAL_MISSES, 0),
            total_shapes_completed: store.get_count(keys::TOTAL_SHAPES_COMPLETED, 0),
            total_score: store.get_count(keys::TOTAL_SCORE, 0),
            best_combo_ever: store.get_count(keys::BEST_COMBO_EVER, 0),
            levels_completed: store.get_count(keys::LEVELS_COMPLETED, 0),
            total_play_time_minutes: store.get_float(keys::TOTAL_PLAY_TIME, 0.0).max(0.0),
        }
    }

    /// Write to `store` (no flush)
    pub fn write<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        store.set_int(keys::TOTAL_PERFECTS, self.total_perfects.into());
        store.set_int(keys::TOTAL_GOODS, self.total_goods.into());
        store.set_int(keys::TOTAL_MISSES, self.total_misses.into());
        store.set_int(keys::TOTAL_SHAPES_COMPLETED, self.total_shapes_completed.into());
        store.set_int(keys::TOTAL_SCORE, self.total_score.into());
        store.set_int(keys::BEST_COMBO_EVER, self.best_combo_ever.into());
        store.set_int(keys::LEVELS_COMPLETED, self.levels_completed.into());
        store.set_float(keys::TOTAL_PLAY_TIME, self.total_play_time_minutes);
    }
}

/// Counters reset at every session start
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub perfects: u32,
    pub goods: u32,
    pub misses: u32,
    pub max_combo: u32,
    pub score: u32,
    /// Longest Perfect streak this session
    pub perfects_in_row: u32,
}

/// Stat tracker
#[derive(Debug, Clone)]
pub struct StatsTracker {
    session: SessionStats,
    lifetime: LifetimeStats,
    current_perfects_in_row: u32,
    /// Clock reading play time is measured from
    play_started_at: f64,
}

impl StatsTracker {
    /// Tracker over existing lifetime stats, play time counted from `now`
    pub fn new(lifetime: LifetimeStats, now: f64) -> Self {
        Self {
            session: SessionStats::default(),
            lifetime,
            current_perfects_in_row: 0,
            play_started_at: now,
        }
    }

    /// Tracker over lifetime stats read from `store`
    pub fn load<S: KeyValueStore + ?Sized>(store: &S, now: f64) -> Self {
        let lifetime = LifetimeStats::load(store);
        log::info!(
            "Loaded lifetime stats ({} shapes, {:.1} min played)",
            lifetime.total_shapes_completed,
            lifetime.total_play_time_minutes
        );
        Self::new(lifetime, now)
    }

    pub fn session(&self) -> &SessionStats {
        &self.session
    }

    pub fn lifetime(&self) -> &LifetimeStats {
        &self.lifetime
    }

    pub fn current_perfects_in_row(&self) -> u32 {
        self.current_perfects_in_row
    }

    /// Reset session counters (lifetime counters untouched)
    pub fn start_session(&mut self) {
        self.session = SessionStats::default();
        self.current_perfects_in_row = 0;
    }

    pub fn on_lock(&mut self, result: LockResult) -> Vec<StatEvent> {
        let mut events = Vec::new();
        let life = &mut self.lifetime;

        match result {
            LockResult::Perfect => {
                self.session.perfects += 1;
                life.total_perfects += 1;
                life.total_shapes_completed += 1;
                self.current_perfects_in_row += 1;
                if self.current_perfects_in_row > self.session.perfects_in_row {
                    self.session.perfects_in_row = self.current_perfects_in_row;
                    events.push(StatEvent::new(StatName::PerfectsInRow, self.session.perfects_in_row));
                }
                events.push(StatEvent::new(StatName::TotalPerfects, life.total_perfects));
                events.push(StatEvent::new(StatName::TotalShapesCompleted, life.total_shapes_completed));
            }
            LockResult::Good => {
                self.session.goods += 1;
                life.total_goods += 1;
                life.total_shapes_completed += 1;
                self.current_perfects_in_row = 0;
                events.push(StatEvent::new(StatName::TotalShapesCompleted, life.total_shapes_completed));
            }
            LockResult::Miss => {
                self.session.misses += 1;
                life.total_misses += 1;
                self.current_perfects_in_row = 0;
            }
        }

        events
    }

    /// Score moved to `total` by `added` points
    pub fn on_score_changed(&mut self, total: u32, added: u32) -> Vec<StatEvent> {
        self.session.score = total;
        if added == 0 {
            return Vec::new();
        }
        self.lifetime.total_score = self.lifetime.total_score.saturating_add(added);
        vec![StatEvent::new(StatName::TotalScore, self.lifetime.total_score)]
    }

    pub fn on_combo_changed(&mut self, combo: u32) -> Vec<StatEvent> {
        let mut events = Vec::new();
        if combo > self.session.max_combo {
            self.session.max_combo = combo;
            events.push(StatEvent::new(StatName::ComboReached, combo));
        }
        if combo > self.lifetime.best_combo_ever {
            self.lifetime.best_combo_ever = combo;
            events.push(StatEvent::new(StatName::BestComboEver, combo));
        }
        events
    }

    /// Level finished. The no-miss and perfect-accuracy checks are independent.
    pub fn on_level_complete(&mut self) -> Vec<StatEvent> {
        self.lifetime.levels_completed += 1;
        let mut events = vec![StatEvent::new(StatName::LevelsCompleted, self.lifetime.levels_completed)];

        let s = &self.session;
        if s.misses == 0 {
            events.push(StatEvent::new(StatName::NoMissesOnLevel, 1));
        }
        if s.misses == 0 && s.goods == 0 && s.perfects > 0 {
            events.push(StatEvent::new(StatName::PerfectAccuracyOnLevel, 1));
        }
        events
    }

    /// Fold elapsed real time into the lifetime total and rebase to `now`
    fn update_play_time(&mut self, now: f64) -> StatEvent {
        let minutes = ((now - self.play_started_at) / 60.0).max(0.0);
        self.lifetime.total_play_time_minutes += minutes as f32;
        self.play_started_at = now;
        StatEvent::new(
            StatName::PlayTimeMinutes,
            self.lifetime.total_play_time_minutes.floor() as u32,
        )
    }

    /// App paused: bank play time and flush
    pub fn pause<S: KeyValueStore + ?Sized>(&mut self, now: f64, store: &mut S) -> Vec<StatEvent> {
        let event = self.update_play_time(now);
        self.flush(store);
        vec![event]
    }

    /// App resumed: time spent paused is not counted
    pub fn resume(&mut self, now: f64) {
        self.play_started_at = now;
    }

    /// App quitting: same bookkeeping as pause
    pub fn quit<S: KeyValueStore + ?Sized>(&mut self, now: f64, store: &mut S) -> Vec<StatEvent> {
        self.pause(now, store)
    }

    /// Write lifetime stats and flush the store
    pub fn flush<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        self.lifetime.write(store);
        save_or_warn(store, "lifetime stats");
    }

    /// Erase lifetime stats everywhere
    pub fn reset_all<S: KeyValueStore + ?Sized>(&mut self, store: &mut S) {
        for key in keys::LIFETIME_STATS {
            store.delete_key(key);
        }
        save_or_warn(store, "lifetime stats reset");
        self.lifetime = LifetimeStats::load(store);
        log::info!("Lifetime stats reset");
    }
}
