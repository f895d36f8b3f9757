//! Combo and score accumulation
//!
//! Driven by one `LockResult` per attempt. Hits grow the combo before the
//! multiplier is computed, so the first hit of a combo already scores 1.1x.

use serde::{Deserialize, Serialize};

use crate::consts::{COMBO_STEP, GOOD_SCORE, PERFECT_SCORE};
use crate::judge::LockResult;

/// Scoring constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreConfig {
    pub perfect_score: u32,
    pub good_score: u32,
    pub combo_step: f32,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            perfect_score: PERFECT_SCORE,
            good_score: GOOD_SCORE,
            combo_step: COMBO_STEP,
        }
    }
}

impl ScoreConfig {
    /// Base points before the combo multiplier
    pub fn base_score(&self, result: LockResult) -> u32 {
        match result {
            LockResult::Perfect => self.perfect_score,
            LockResult::Good => self.good_score,
            LockResult::Miss => 0,
        }
    }
}

/// What a single attempt did to the score state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreUpdate {
    /// Points added by this attempt (0 on Miss)
    pub added: u32,
    /// Running score after the attempt
    pub score: u32,
    /// Combo after the attempt
    pub combo: u32,
    /// A live combo was broken by this attempt
    pub combo_reset: bool,
}

/// Per-session score state
#[derive(Debug, Clone, Default)]
pub struct ScoreEngine {
    pub config: ScoreConfig,
    score: u32,
    combo: u32,
    max_combo: u32,
    perfect_count: u32,
    good_count: u32,
    miss_count: u32,
}

impl ScoreEngine {
    pub fn new(config: ScoreConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Apply one lock result
    pub fn on_lock(&mut self, result: LockResult) -> ScoreUpdate {
        let mut added = 0;
        let mut combo_reset = false;

        match result {
            LockResult::Perfect | LockResult::Good => {
                if result == LockResult::Perfect {
                    self.perfect_count += 1;
                } else {
                    self.good_count += 1;
                }
                self.combo += 1;
                added = self.points_for(self.config.base_score(result));
            }
            LockResult::Miss => {
                self.miss_count += 1;
                if self.combo > 0 {
                    self.combo = 0;
                    combo_reset = true;
                }
            }
        }

        self.max_combo = self.max_combo.max(self.combo);
        self.score = self.score.saturating_add(added);

        ScoreUpdate {
            added,
            score: self.score,
            combo: self.combo,
            combo_reset,
        }
    }

    /// Points for `base` at the current combo, halves rounded to even
    fn points_for(&self, base: u32) -> u32 {
        (base as f32 * self.multiplier()).round_ties_even() as u32
    }

    /// Zero all counters (session start)
    pub fn reset_stats(&mut self) {
        *self = Self::new(self.config);
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub fn perfect_count(&self) -> u32 {
        self.perfect_count
    }

    pub fn good_count(&self) -> u32 {
        self.good_count
    }

    pub fn miss_count(&self) -> u32 {
        self.miss_count
    }

    /// Current combo multiplier
    pub fn multiplier(&self) -> f32 {
        1.0 + self.combo as f32 * self.config.combo_step
    }

    pub fn total_attempts(&self) -> u32 {
        self.perfect_count + self.good_count + self.miss_count
    }

    /// Hit percentage (0-100), 0 with no attempts
    pub fn accuracy(&self) -> f32 {
        let total = self.total_attempts();
        if total == 0 {
            return 0.0;
        }
        (self.perfect_count + self.good_count) as f32 / total as f32 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_perfect_scores_with_combo_one() {
        let mut engine = ScoreEngine::default();
        let update = engine.on_lock(LockResult::Perfect);
        assert_eq!(update.added, 110);
        assert_eq!(engine.score(), 110);
        assert_eq!(engine.combo(), 1);
        assert!(!update.combo_reset);
    }

    #[test]
    fn test_combo_grows_multiplier() {
        let mut engine = ScoreEngine::default();
        engine.on_lock(LockResult::Perfect); // 110
        engine.on_lock(LockResult::Good); // 50 * 1.2 = 60
        let update = engine.on_lock(LockResult::Perfect); // 100 * 1.3 = 130
        assert_eq!(update.added, 130);
        assert_eq!(engine.score(), 300);
        assert_eq!(engine.perfect_count(), 2);
        assert_eq!(engine.good_count(), 1);
        assert!((engine.multiplier() - 1.3).abs() < 1e-6);
    }

    #[test]
    fn test_miss_after_combo_of_ten() {
        let mut engine = ScoreEngine::default();
        for _ in 0..10 {
            engine.on_lock(LockResult::Perfect);
        }
        let before = engine.score();
        let update = engine.on_lock(LockResult::Miss);
        assert!(update.combo_reset);
        assert_eq!(update.added, 0);
        assert_eq!(engine.combo(), 0);
        assert_eq!(engine.max_combo(), 10);
        assert_eq!(engine.score(), before);

        // A second miss does not report another reset
        assert!(!engine.on_lock(LockResult::Miss).combo_reset);
        assert_eq!(engine.miss_count(), 2);
    }

    #[test]
    fn test_half_points_round_to_even() {
        let mut engine = ScoreEngine::new(ScoreConfig {
            perfect_score: 3,
            good_score: 5,
            combo_step: 0.5,
        });
        // 3 * 1.5 = 4.5
        assert_eq!(engine.on_lock(LockResult::Perfect).added, 4);
        // 5 * 2.0 = 10, 3 * 2.5 = 7.5
        assert_eq!(engine.on_lock(LockResult::Good).added, 10);
        assert_eq!(engine.on_lock(LockResult::Perfect).added, 8);
    }

    #[test]
    fn test_accuracy_and_reset() {
        let mut engine = ScoreEngine::default();
        assert_eq!(engine.accuracy(), 0.0);
        engine.on_lock(LockResult::Perfect);
        engine.on_lock(LockResult::Good);
        engine.on_lock(LockResult::Miss);
        engine.on_lock(LockResult::Miss);
        assert_eq!(engine.total_attempts(), 4);
        assert!((engine.accuracy() - 50.0).abs() < 1e-4);

        engine.reset_stats();
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.max_combo(), 0);
        assert_eq!(engine.total_attempts(), 0);
    }

    fn results() -> impl Strategy<Value = Vec<LockResult>> {
        prop::collection::vec(
            prop_oneof![
                Just(LockResult::Perfect),
                Just(LockResult::Good),
                Just(LockResult::Miss)
            ],
            0..200,
        )
    }

    proptest! {
        #[test]
        fn max_combo_never_decreases(seq in results()) {
            let mut engine = ScoreEngine::default();
            let mut last_max = 0;
            for result in seq {
                let before = engine.max_combo();
                engine.on_lock(result);
                prop_assert!(engine.max_combo() >= last_max);
                if result == LockResult::Miss {
                    prop_assert_eq!(engine.max_combo(), before);
                }
                last_max = engine.max_combo();
            }
        }

        #[test]
        fn score_never_decreases(seq in results()) {
            let mut engine = ScoreEngine::default();
            let mut last = 0;
            for result in seq {
                let update = engine.on_lock(result);
                prop_assert!(update.score >= last);
                prop_assert_eq!(update.score, last + update.added);
                last = update.score;
            }
        }
    }
}
