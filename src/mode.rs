//! Game modes and run progress
//!
//! Levels: complete N shapes. Infinite: play until too many misses.
//! Time Attack: score as much as possible before the timer runs out.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_MISSES, TIME_ATTACK_DURATION};
use crate::events::GameEvent;
use crate::judge::LockResult;

/// Run type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameMode {
    Levels,
    #[default]
    Infinite,
    TimeAttack,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Levels => "Levels",
            GameMode::Infinite => "Infinite",
            GameMode::TimeAttack => "TimeAttack",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "levels" | "level" => Some(GameMode::Levels),
            "infinite" | "endless" => Some(GameMode::Infinite),
            "timeattack" | "time_attack" | "time" => Some(GameMode::TimeAttack),
            _ => None,
        }
    }
}

/// What the run should do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeOutcome {
    Continue,
    LevelComplete,
    GameOver,
}

/// Tracks run progress for the active mode
#[derive(Debug, Clone)]
pub struct ModeController {
    pub max_misses: u32,
    pub time_attack_duration: f32,
    mode: GameMode,
    level_index: usize,
    shapes_completed: u32,
    /// Only meaningful in Levels mode
    shapes_required: u32,
    misses: u32,
    time_remaining: f32,
    active: bool,
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new(MAX_MISSES, TIME_ATTACK_DURATION)
    }
}

impl ModeController {
    pub fn new(max_misses: u32, time_attack_duration: f32) -> Self {
        Self {
            max_misses: max_misses.max(1),
            time_attack_duration,
            mode: GameMode::Infinite,
            level_index: 0,
            shapes_completed: 0,
            shapes_required: 0,
            misses: 0,
            time_remaining: 0.0,
            active: false,
        }
    }

    /// Begin a run. `shapes_required` is used in Levels mode only.
    pub fn start(
        &mut self,
        mode: GameMode,
        level_index: usize,
        shapes_required: u32,
        out: &mut Vec<GameEvent>,
    ) {
        self.mode = mode;
        self.level_index = level_index;
        self.shapes_completed = 0;
        self.misses = 0;
        self.active = true;
        self.shapes_required = 0;
        self.time_remaining = 0.0;

        match mode {
            GameMode::Levels => {
                self.shapes_required = shapes_required.max(1);
                log::info!(
                    "Starting level {} ({} shapes)",
                    level_index + 1,
                    self.shapes_required
                );
                out.push(GameEvent::ShapeProgress {
                    completed: 0,
                    required: self.shapes_required,
                });
            }
            GameMode::Infinite => {
                log::info!("Starting Infinite mode (max {} misses)", self.max_misses);
            }
            GameMode::TimeAttack => {
                self.time_remaining = self.time_attack_duration;
                log::info!("Starting Time Attack ({:.0} sec)", self.time_attack_duration);
                out.push(GameEvent::TimerTick(self.time_remaining));
            }
        }
    }

    /// Apply a lock result to run progress
    pub fn on_lock(&mut self, result: LockResult, out: &mut Vec<GameEvent>) -> ModeOutcome {
        if !self.active {
            return ModeOutcome::Continue;
        }

        if result.is_hit() {
            self.shapes_completed += 1;
            if self.mode == GameMode::Levels {
                out.push(GameEvent::ShapeProgress {
                    completed: self.shapes_completed,
                    required: self.shapes_required,
                });
                if self.shapes_completed >= self.shapes_required {
                    self.active = false;
                    log::info!("Level {} complete", self.level_index + 1);
                    out.push(GameEvent::LevelComplete {
                        level: self.level_index,
                    });
                    return ModeOutcome::LevelComplete;
                }
            }
        } else if self.mode == GameMode::Infinite {
            self.misses += 1;
            out.push(GameEvent::MissesChanged {
                misses: self.misses,
                max: self.max_misses,
            });
            if self.misses >= self.max_misses {
                return self.end(out);
            }
        }

        ModeOutcome::Continue
    }

    /// Advance the Time Attack timer by `dt` seconds
    pub fn tick(&mut self, dt: f32, out: &mut Vec<GameEvent>) -> ModeOutcome {
        if !self.active || self.mode != GameMode::TimeAttack {
            return ModeOutcome::Continue;
        }

        self.time_remaining -= dt;
        if self.time_remaining <= 0.0 {
            self.time_remaining = 0.0;
            out.push(GameEvent::TimerTick(0.0));
            return self.end(out);
        }
        out.push(GameEvent::TimerTick(self.time_remaining));
        ModeOutcome::Continue
    }

    fn end(&mut self, out: &mut Vec<GameEvent>) -> ModeOutcome {
        self.active = false;
        log::info!("Game over ({} mode)", self.mode.as_str());
        out.push(GameEvent::GameOver);
        ModeOutcome::GameOver
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn shapes_completed(&self) -> u32 {
        self.shapes_completed
    }

    /// Required shapes, `None` outside Levels mode
    pub fn shapes_required(&self) -> Option<u32> {
        (self.mode == GameMode::Levels).then_some(self.shapes_required)
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }

    pub fn time_remaining(&self) -> f32 {
        self.time_remaining
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_str() {
        assert_eq!(GameMode::from_str("Levels"), Some(GameMode::Levels));
        assert_eq!(GameMode::from_str("time"), Some(GameMode::TimeAttack));
        assert_eq!(GameMode::from_str("endless"), Some(GameMode::Infinite));
        assert_eq!(GameMode::from_str("zen"), None);
    }

    #[test]
    fn test_level_completes_after_required_hits() {
        let mut mode = ModeController::default();
        let mut out = Vec::new();
        mode.start(GameMode::Levels, 2, 3, &mut out);
        assert_eq!(out, vec![GameEvent::ShapeProgress { completed: 0, required: 3 }]);

        out.clear();
        assert_eq!(mode.on_lock(LockResult::Perfect, &mut out), ModeOutcome::Continue);
        // Misses don't count against a level
        assert_eq!(mode.on_lock(LockResult::Miss, &mut out), ModeOutcome::Continue);
        assert_eq!(mode.on_lock(LockResult::Good, &mut out), ModeOutcome::Continue);
        assert_eq!(mode.on_lock(LockResult::Perfect, &mut out), ModeOutcome::LevelComplete);
        assert_eq!(out.last(), Some(&GameEvent::LevelComplete { level: 2 }));
        assert!(!mode.is_active());

        // Inactive controller ignores input
        assert_eq!(mode.on_lock(LockResult::Perfect, &mut out), ModeOutcome::Continue);
        assert_eq!(mode.shapes_completed(), 3);
    }

    #[test]
    fn test_infinite_ends_at_max_misses() {
        let mut mode = ModeController::new(2, 60.0);
        let mut out = Vec::new();
        mode.start(GameMode::Infinite, 0, 0, &mut out);
        assert!(out.is_empty());
        assert_eq!(mode.shapes_required(), None);

        assert_eq!(mode.on_lock(LockResult::Miss, &mut out), ModeOutcome::Continue);
        assert_eq!(mode.on_lock(LockResult::Perfect, &mut out), ModeOutcome::Continue);
        assert_eq!(mode.on_lock(LockResult::Miss, &mut out), ModeOutcome::GameOver);
        assert_eq!(
            out,
            vec![
                GameEvent::MissesChanged { misses: 1, max: 2 },
                GameEvent::MissesChanged { misses: 2, max: 2 },
                GameEvent::GameOver,
            ]
        );
    }

    #[test]
    fn test_time_attack_timer() {
        let mut mode = ModeController::new(5, 1.0);
        let mut out = Vec::new();
        mode.start(GameMode::TimeAttack, 0, 0, &mut out);
        assert_eq!(mode.time_remaining(), 1.0);

        // Misses never end a Time Attack run
        for _ in 0..10 {
            assert_eq!(mode.on_lock(LockResult::Miss, &mut out), ModeOutcome::Continue);
        }
        assert_eq!(mode.tick(0.5, &mut out), ModeOutcome::Continue);
        assert_eq!(mode.tick(0.6, &mut out), ModeOutcome::GameOver);
        assert_eq!(mode.time_remaining(), 0.0);
        assert_eq!(mode.tick(0.6, &mut out), ModeOutcome::Continue);
        assert_eq!(out.last(), Some(&GameEvent::GameOver));
    }

    #[test]
    fn test_tick_is_noop_outside_time_attack() {
        let mut mode = ModeController::default();
        let mut out = Vec::new();
        mode.start(GameMode::Levels, 0, 5, &mut out);
        out.clear();
        assert_eq!(mode.tick(100.0, &mut out), ModeOutcome::Continue);
        assert!(out.is_empty());
    }
}
