//! Game settings and preferences
//!
//! Stored as one JSON string in the key-value store. Missing fields fall back
//! to their defaults, so older saves keep loading.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::judge::{ColorMatcher, LockJudge, Tolerances};
use crate::persistence::{KeyValueStore, keys, save_or_warn};
use crate::score::ScoreConfig;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Judging ===
    /// Perfect window, degrees
    pub perfect_tolerance: f32,
    /// Good window, degrees
    pub good_tolerance: f32,
    /// Blade colors must line up for a hit
    pub require_color_match: bool,
    /// Per-channel RGB threshold for "same color"
    pub color_threshold: f32,

    // === Scoring ===
    pub perfect_score: u32,
    pub good_score: u32,
    /// Multiplier gained per combo step
    pub combo_step: f32,

    // === Modes ===
    /// Infinite mode ends at this many misses
    pub max_misses: u32,
    /// Time Attack length in seconds
    pub time_attack_duration: f32,

    // === Rotation ===
    /// Degrees per second
    pub rotation_speed: f32,
    pub clockwise: bool,

    // === Audio ===
    // Host-facing preferences, stored for the audio layer of the embedding app
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            perfect_tolerance: PERFECT_TOLERANCE,
            good_tolerance: GOOD_TOLERANCE,
            require_color_match: true,
            color_threshold: COLOR_THRESHOLD,

            perfect_score: PERFECT_SCORE,
            good_score: GOOD_SCORE,
            combo_step: COMBO_STEP,

            max_misses: MAX_MISSES,
            time_attack_duration: TIME_ATTACK_DURATION,

            rotation_speed: ROTATION_SPEED,
            clockwise: true,

            music_volume: 1.0,
            sfx_volume: 1.0,
        }
    }
}

impl Settings {
    /// Clamp values into usable ranges
    pub fn sanitized(mut self) -> Self {
        let finite_or = |v: f32, default: f32| if v.is_finite() { v } else { default };

        self.perfect_tolerance = finite_or(self.perfect_tolerance, PERFECT_TOLERANCE).max(0.0);
        self.good_tolerance = finite_or(self.good_tolerance, GOOD_TOLERANCE).max(self.perfect_tolerance);
        self.color_threshold = finite_or(self.color_threshold, COLOR_THRESHOLD).max(0.0);
        self.combo_step = finite_or(self.combo_step, COMBO_STEP).max(0.0);
        self.max_misses = self.max_misses.max(1);
        self.time_attack_duration = finite_or(self.time_attack_duration, TIME_ATTACK_DURATION).max(1.0);
        self.rotation_speed = finite_or(self.rotation_speed, ROTATION_SPEED).max(0.0);
        self.music_volume = finite_or(self.music_volume, 1.0).clamp(0.0, 1.0);
        self.sfx_volume = finite_or(self.sfx_volume, 1.0).clamp(0.0, 1.0);
        self
    }

    pub fn tolerances(&self) -> Tolerances {
        Tolerances {
            perfect: self.perfect_tolerance,
            good: self.good_tolerance,
        }
    }

    pub fn score_config(&self) -> ScoreConfig {
        ScoreConfig {
            perfect_score: self.perfect_score,
            good_score: self.good_score,
            combo_step: self.combo_step,
        }
    }

    pub fn matcher(&self) -> ColorMatcher {
        ColorMatcher::new(self.color_threshold)
    }

    /// A judge configured from these settings
    pub fn lock_judge(&self) -> LockJudge {
        LockJudge::new(self.tolerances(), self.matcher(), self.require_color_match)
    }

    /// Load settings from the store, defaults if absent or unreadable
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let json = store.get_string(keys::SETTINGS, "");
        if json.is_empty() {
            log::info!("Using default settings");
            return Self::default();
        }

        match serde_json::from_str::<Settings>(&json) {
            Ok(settings) => {
                log::info!("Loaded settings");
                settings.sanitized()
            }
            Err(e) => {
                log::warn!("Ignoring unreadable settings: {}", e);
                Self::default()
            }
        }
    }

    /// Save settings to the store
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        match serde_json::to_string(self) {
            Ok(json) => {
                store.set_string(keys::SETTINGS, &json);
                save_or_warn(store, "settings");
                log::info!("Settings saved");
            }
            Err(e) => log::warn!("Failed to encode settings: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.tolerances(), Tolerances::default());
        assert_eq!(s.score_config(), ScoreConfig::default());
        assert_eq!(s.max_misses, 5);
        assert_eq!(s.time_attack_duration, 60.0);
        assert!(s.require_color_match);
    }

    #[test]
    fn test_save_and_load() {
        let mut store = MemoryStore::new();
        let mut s = Settings::default();
        s.good_tolerance = 20.0;
        s.clockwise = false;
        s.save(&mut store);

        assert_eq!(Settings::load(&store), s);
    }

    #[test]
    fn test_load_fills_missing_fields() {
        let mut store = MemoryStore::new();
        store.set_string(keys::SETTINGS, r#"{"max_misses": 3}"#);
        let s = Settings::load(&store);
        assert_eq!(s.max_misses, 3);
        assert_eq!(s.perfect_tolerance, PERFECT_TOLERANCE);
    }

    #[test]
    fn test_load_garbage_gives_defaults() {
        let mut store = MemoryStore::new();
        store.set_string(keys::SETTINGS, "not json");
        assert_eq!(Settings::load(&store), Settings::default());

        // Wrong value type for the key
        store.set_int(keys::SETTINGS, 4);
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_sanitized() {
        let s = Settings {
            perfect_tolerance: 10.0,
            good_tolerance: 4.0,
            max_misses: 0,
            music_volume: 3.0,
            color_threshold: f32::NAN,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(s.good_tolerance, 10.0);
        assert_eq!(s.max_misses, 1);
        assert_eq!(s.music_volume, 1.0);
        assert_eq!(s.color_threshold, COLOR_THRESHOLD);
    }
}
