//! Game wiring
//!
//! `Game` owns every component plus the store and clock, and drives them in a
//! fixed order for each lock attempt:
//!
//! 1. `LockJudge` judges the player shape against the target
//! 2. `ScoreEngine` updates score and combo
//! 3. `StatsTracker` turns the result, score and combo into stat events
//! 4. `AchievementEngine` evaluates the FirstPerfect latch and each stat event
//! 5. `ModeController` updates run progress (level complete / game over). A
//!    completed level is recorded before its stats and achievements run.
//! 6. The round retries (Miss) or moves on (hit)
//!
//! Events are collected along the way and handed to listeners only after all
//! state for the attempt is committed.

use crate::achievements::{AchievementDefinition, AchievementEngine, LevelProgress, default_catalog};
use crate::clock::Clock;
use crate::events::{EventBus, GameEvent, Listener, ListenerId};
use crate::judge::{LockJudge, LockResult};
use crate::levels::{LevelCatalog, LevelRecords};
use crate::mode::{GameMode, ModeController, ModeOutcome};
use crate::persistence::KeyValueStore;
use crate::rotation::{BandLevels, Rotor};
use crate::round::{Round, RoundGenerator, RoundTransition};
use crate::score::ScoreEngine;
use crate::settings::Settings;
use crate::stats::{StatEvent, StatsTracker};

/// A running game over one key-value store
pub struct Game<S: KeyValueStore, C: Clock> {
    settings: Settings,
    store: S,
    clock: C,
    judge: LockJudge,
    score: ScoreEngine,
    stats: StatsTracker,
    achievements: AchievementEngine,
    mode: ModeController,
    levels: LevelCatalog,
    records: LevelRecords,
    rounds: RoundGenerator,
    rotor: Rotor,
    round: Option<Round>,
    bus: EventBus,
    paused: bool,
    /// Unlocks not yet written to the store
    achievements_dirty: bool,
}

impl<S: KeyValueStore, C: Clock> Game<S, C> {
    /// Game with settings read from `store`
    pub fn new(store: S, clock: C, seed: u64) -> Self {
        let settings = Settings::load(&store);
        Self::with_settings(settings, store, clock, seed)
    }

    pub fn with_settings(settings: Settings, store: S, clock: C, seed: u64) -> Self {
        let settings = settings.sanitized();
        let levels = LevelCatalog::default_catalog();
        let records = LevelRecords::load(&store, levels.len());
        let stats = StatsTracker::load(&store, clock.now_secs());
        let mut achievements = AchievementEngine::new(default_catalog());
        achievements.load(&store);

        // No attempts until a run starts
        let mut judge = settings.lock_judge();
        judge.disarm();

        Self {
            score: ScoreEngine::new(settings.score_config()),
            mode: ModeController::new(settings.max_misses, settings.time_attack_duration),
            rotor: Rotor::new(settings.rotation_speed, settings.clockwise),
            settings,
            store,
            clock,
            judge,
            stats,
            achievements,
            levels,
            records,
            rounds: RoundGenerator::new(seed),
            round: None,
            bus: EventBus::new(),
            paused: false,
            achievements_dirty: false,
        }
    }

    /// Replace the level catalog (records are reloaded for the new size)
    pub fn with_levels(mut self, levels: LevelCatalog) -> Self {
        self.records = LevelRecords::load(&self.store, levels.len());
        self.levels = levels;
        self
    }

    /// Apply and persist new settings. Takes effect for judging and scoring
    /// immediately; rotation and mode limits apply from the next `start`.
    pub fn set_settings(&mut self, settings: Settings) {
        let settings = settings.sanitized();
        self.judge.tolerances = settings.tolerances();
        self.judge.matcher = settings.matcher();
        self.judge.require_color_match = settings.require_color_match;
        self.score.config = settings.score_config();
        settings.save(&mut self.store);
        self.settings = settings;
    }

    pub fn subscribe(&mut self, listener: impl Listener + 'static) -> ListenerId {
        self.bus.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Begin a run. `level_index` is clamped to the catalog and only used in
    /// Levels mode.
    pub fn start(&mut self, mode: GameMode, level_index: usize) {
        let level_index = level_index.min(self.levels.len().saturating_sub(1));
        if mode == GameMode::Levels && !self.records.is_unlocked(level_index) {
            log::warn!("Starting level {} before it is unlocked", level_index + 1);
        }

        self.score.reset_stats();
        self.stats.start_session();
        // Play time keeps running across runs; only a pause or quit stops it
        if self.paused {
            self.stats.resume(self.clock.now_secs());
            self.paused = false;
        }

        self.mode.max_misses = self.settings.max_misses;
        self.mode.time_attack_duration = self.settings.time_attack_duration;
        self.rotor = Rotor::new(self.settings.rotation_speed, self.settings.clockwise);
        self.rounds.reset_counter();

        let mut events = vec![GameEvent::GameStart(mode)];
        let required = self.levels.shapes_required(level_index);
        self.mode.start(mode, level_index, required, &mut events);
        self.next_round(&mut events);

        self.bus.dispatch_all(&events);
    }

    /// Per-frame update: spin the player shape and run the Time Attack timer
    pub fn advance(&mut self, dt: f32, bands: Option<BandLevels>) {
        if self.paused || !self.mode.is_active() {
            return;
        }
        self.rotor.advance(dt, bands);

        let mut events = Vec::new();
        if self.mode.tick(dt, &mut events) == ModeOutcome::GameOver {
            self.end_run();
        }
        self.commit(events);
    }

    /// The player pressed lock. Returns the result, or `None` if the input
    /// was ignored (no round, paused, or the judge is not armed).
    pub fn lock(&mut self) -> Option<LockResult> {
        if self.paused {
            return None;
        }
        let round = self.round.as_ref()?;
        let player = round.player_shape(self.rotor.rotation());
        let judgment = self.judge.attempt_lock(&player, &round.target)?;
        let result = judgment.result;
        self.rotor.stop();

        let mut events = vec![GameEvent::Lock(judgment)];

        let update = self.score.on_lock(result);
        if update.added > 0 {
            events.push(GameEvent::ScoreChanged {
                score: update.score,
                added: update.added,
            });
        }
        if update.combo_reset {
            events.push(GameEvent::ComboReset);
        }
        events.push(GameEvent::ComboChanged(update.combo));

        let mut stat_events = self.stats.on_lock(result);
        stat_events.extend(self.stats.on_score_changed(update.score, update.added));
        stat_events.extend(self.stats.on_combo_changed(update.combo));

        let progress = self.level_progress();
        let first_perfect = self.achievements.on_lock(result, progress);
        self.push_unlocks(first_perfect, &mut events);
        self.feed_stats(stat_events, &mut events);

        match self.mode.on_lock(result, &mut events) {
            ModeOutcome::LevelComplete => self.complete_level(&mut events),
            ModeOutcome::GameOver => self.end_run(),
            ModeOutcome::Continue => match RoundTransition::after(result) {
                RoundTransition::Retry => self.retry_round(),
                RoundTransition::Next => self.next_round(&mut events),
            },
        }

        self.commit(events);
        Some(result)
    }

    /// App lost focus / pause menu
    pub fn pause(&mut self) {
        if self.paused {
            return;
        }
        self.paused = true;
        let now = self.clock.now_secs();
        let stat_events = self.stats.pause(now, &mut self.store);
        let mut events = Vec::new();
        self.feed_stats(stat_events, &mut events);
        self.commit(events);
    }

    pub fn resume(&mut self) {
        if !self.paused {
            return;
        }
        self.paused = false;
        self.stats.resume(self.clock.now_secs());
    }

    /// App shutting down: bank play time and flush everything
    pub fn quit(&mut self) {
        let now = self.clock.now_secs();
        let stat_events = if self.paused {
            // Already banked by pause
            Vec::new()
        } else {
            self.stats.quit(now, &mut self.store)
        };
        let mut events = Vec::new();
        self.feed_stats(stat_events, &mut events);
        self.achievements_dirty = true;
        self.commit(events);
        self.paused = true;
    }

    /// Erase lifetime stats, achievements and level progress
    pub fn reset_progress(&mut self) {
        self.stats.reset_all(&mut self.store);
        self.achievements.reset_all(&mut self.store);
        self.records.reset(&mut self.store);
        self.achievements_dirty = false;
        log::info!("All progress reset");
    }

    /// Cleared levels count toward `AllLevelsCompleted`, so replaying an
    /// earlier level never qualifies while a later one is still open
    fn level_progress(&self) -> LevelProgress {
        LevelProgress {
            unlocked_levels: u32::try_from(self.records.completed_count()).unwrap_or(u32::MAX),
            total_levels: self.levels.len() as u32,
        }
    }

    /// Report stat events and evaluate achievements for each, in order
    fn feed_stats(&mut self, stat_events: Vec<StatEvent>, events: &mut Vec<GameEvent>) {
        let progress = self.level_progress();
        for stat in stat_events {
            events.push(GameEvent::StatChanged(stat));
            let unlocked = self.achievements.on_stat(stat, progress);
            self.push_unlocks(unlocked, events);
        }
    }

    fn push_unlocks(&mut self, unlocked: Vec<AchievementDefinition>, events: &mut Vec<GameEvent>) {
        if unlocked.is_empty() {
            return;
        }
        self.achievements_dirty = true;
        events.extend(unlocked.into_iter().map(GameEvent::AchievementUnlocked));
    }

    /// Level finished: record it, then stats and achievements, then flush
    fn complete_level(&mut self, events: &mut Vec<GameEvent>) {
        self.records.record_completion(
            self.mode.level_index(),
            self.score.score(),
            self.score.max_combo(),
            &mut self.store,
        );
        let stat_events = self.stats.on_level_complete();
        self.feed_stats(stat_events, events);
        self.end_run();
    }

    /// Stop accepting input and flush lifetime stats
    fn end_run(&mut self) {
        self.judge.disarm();
        self.rotor.stop();
        self.stats.flush(&mut self.store);
    }

    fn retry_round(&mut self) {
        self.rotor.reset();
        self.rotor.resume();
        self.judge.arm();
    }

    fn next_round(&mut self, events: &mut Vec<GameEvent>) {
        let round = self.rounds.next_round();
        events.push(GameEvent::RoundStart(round.number));
        self.round = Some(round);
        self.retry_round();
    }

    /// Persist pending unlocks, then hand events to listeners
    fn commit(&mut self, events: Vec<GameEvent>) {
        if self.achievements_dirty {
            self.achievements.save(&mut self.store);
            self.achievements_dirty = false;
        }
        self.bus.dispatch_all(&events);
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn judge(&self) -> &LockJudge {
        &self.judge
    }

    pub fn score(&self) -> &ScoreEngine {
        &self.score
    }

    pub fn stats(&self) -> &StatsTracker {
        &self.stats
    }

    pub fn achievements(&self) -> &AchievementEngine {
        &self.achievements
    }

    pub fn mode(&self) -> &ModeController {
        &self.mode
    }

    pub fn levels(&self) -> &LevelCatalog {
        &self.levels
    }

    pub fn records(&self) -> &LevelRecords {
        &self.records
    }

    pub fn rotor(&self) -> &Rotor {
        &self.rotor
    }

    pub fn rotor_mut(&mut self) -> &mut Rotor {
        &mut self.rotor
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

impl<S: KeyValueStore, C: Clock> std::fmt::Debug for Game<S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("mode", &self.mode.mode())
            .field("score", &self.score.score())
            .field("combo", &self.score.combo())
            .field("round", &self.round.as_ref().map(|r| r.number))
            .field("paused", &self.paused)
            .finish()
    }
}
