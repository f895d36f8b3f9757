//! Starlock - lock-judgment and scoring core for a shape-matching rhythm game
//!
//! Core modules:
//! - `judge`: Lock judgment (angle tolerance, blade color alignment)
//! - `score`: Combo/score accumulation
//! - `stats`: Session and lifetime counters, named stat events
//! - `achievements`: Condition table and unlock bookkeeping
//! - `mode`, `levels`, `round`, `rotation`: Run rules, level data, round
//!   generation and player shape spin
//! - `game`: Wiring of all components around one key-value store
//! - `persistence`: Key-value storage (memory, JSON file, LocalStorage)
//!
//! Everything runs on one thread with synchronous, ordered event delivery.

pub mod achievements;
pub mod clock;
pub mod events;
pub mod game;
pub mod judge;
pub mod levels;
pub mod mode;
pub mod persistence;
pub mod rotation;
pub mod round;
pub mod score;
pub mod settings;
pub mod stats;

pub use achievements::{AchievementDefinition, AchievementEngine};
pub use events::{EventBus, GameEvent, Listener, ListenerId};
pub use game::Game;
pub use judge::{Color, LockJudge, LockResult, ShapeState, Tolerances};
pub use mode::GameMode;
pub use score::ScoreEngine;
pub use settings::Settings;
pub use stats::{StatEvent, StatName, StatsTracker};

/// Default tuning values
pub mod consts {
    /// Angle window (degrees) for a Perfect lock
    pub const PERFECT_TOLERANCE: f32 = 5.0;
    /// Angle window (degrees) for a Good lock
    pub const GOOD_TOLERANCE: f32 = 15.0;
    /// Per-channel RGB tolerance for blade colors (0-1 scale)
    pub const COLOR_THRESHOLD: f32 = 0.1;

    /// Base points for a Perfect lock
    pub const PERFECT_SCORE: u32 = 100;
    /// Base points for a Good lock
    pub const GOOD_SCORE: u32 = 50;
    /// Multiplier growth per combo step
    pub const COMBO_STEP: f32 = 0.1;

    /// Misses allowed in Infinite mode
    pub const MAX_MISSES: u32 = 5;
    /// Time Attack run length (seconds)
    pub const TIME_ATTACK_DURATION: f32 = 60.0;
    /// Shapes required when no level data is available
    pub const FALLBACK_SHAPES_REQUIRED: u32 = 5;

    /// Blade count range for generated shapes
    pub const MIN_BLADES: usize = 3;
    pub const MAX_BLADES: usize = 7;

    /// Player shape rotation speed (degrees/s)
    pub const ROTATION_SPEED: f32 = 90.0;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Shortest signed angular difference from `from` to `to`, in (-180, 180]
#[inline]
pub fn delta_angle(from: f32, to: f32) -> f32 {
    let delta = normalize_angle(to - from);
    if delta > 180.0 { delta - 360.0 } else { delta }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_angle_basic() {
        assert_eq!(normalize_angle(0.0), 0.0);
        assert_eq!(normalize_angle(360.0), 0.0);
        assert_eq!(normalize_angle(-90.0), 270.0);
        assert_eq!(normalize_angle(725.0), 5.0);
        assert!(normalize_angle(-1e-7) < 360.0);
    }

    #[test]
    fn test_delta_angle_wraparound() {
        assert_eq!(delta_angle(350.0, 10.0), 20.0);
        assert_eq!(delta_angle(10.0, 350.0), -20.0);
        assert_eq!(delta_angle(0.0, 180.0), 180.0);
        assert_eq!(delta_angle(180.0, 0.0), 180.0);
        assert_eq!(delta_angle(-45.0, 45.0), 90.0);
        assert_eq!(delta_angle(90.0, 90.0), 0.0);
    }

    proptest! {
        #[test]
        fn normalize_angle_in_range(x in -1.0e5f32..1.0e5) {
            let n = normalize_angle(x);
            prop_assert!((0.0..360.0).contains(&n));
        }

        #[test]
        fn normalize_angle_is_periodic(x in -720.0f32..720.0, k in -10i32..10) {
            let a = normalize_angle(x);
            let b = normalize_angle(x + 360.0 * k as f32);
            // Compare on the circle, float error can put one side just below 360
            prop_assert!(delta_angle(a, b).abs() < 1e-2);
        }

        #[test]
        fn delta_angle_in_half_open_range(a in -1000.0f32..1000.0, b in -1000.0f32..1000.0) {
            let d = delta_angle(a, b);
            prop_assert!(d > -180.0 && d <= 180.0);
        }
    }
}
