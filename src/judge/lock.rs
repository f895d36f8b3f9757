//! Lock attempt state machine
//!
//! The judge accepts exactly one attempt while Armed, then stays Locked until
//! the round logic re-arms it. Re-arming is never automatic.

use serde::{Deserialize, Serialize};

use super::color::ColorMatcher;
use super::shape::ShapeState;
use crate::consts::{GOOD_TOLERANCE, PERFECT_TOLERANCE};
use crate::delta_angle;

/// Tiered outcome of a lock attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LockResult {
    Perfect,
    Good,
    Miss,
}

impl LockResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockResult::Perfect => "Perfect",
            LockResult::Good => "Good",
            LockResult::Miss => "Miss",
        }
    }

    /// Perfect or Good
    pub fn is_hit(&self) -> bool {
        !matches!(self, LockResult::Miss)
    }
}

/// Angular windows in degrees. `good` is expected to be >= `perfect`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerances {
    pub perfect: f32,
    pub good: f32,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            perfect: PERFECT_TOLERANCE,
            good: GOOD_TOLERANCE,
        }
    }
}

/// Classify an absolute angle difference.
///
/// A color match anywhere inside the Good window is upgraded to Perfect; only
/// a color mismatch inside the Good window yields Good.
pub fn classify(angle_difference: f32, colors_match: bool, tolerances: Tolerances) -> LockResult {
    if angle_difference <= tolerances.perfect && colors_match {
        LockResult::Perfect
    } else if angle_difference <= tolerances.good {
        if colors_match {
            LockResult::Perfect
        } else {
            LockResult::Good
        }
    } else {
        LockResult::Miss
    }
}

/// A completed judgment. Only `result` is contractual; the rest is debug read-out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Judgment {
    pub result: LockResult,
    /// Absolute shortest angle between player and target (degrees)
    pub angle_difference: f32,
    pub colors_matched: bool,
}

/// Judge state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JudgeState {
    /// Waiting for one input
    Armed,
    /// Attempt consumed, waiting for re-arm
    Locked,
}

/// Evaluates lock attempts against a target shape
#[derive(Debug, Clone)]
pub struct LockJudge {
    pub tolerances: Tolerances,
    pub matcher: ColorMatcher,
    pub require_color_match: bool,
    state: JudgeState,
    last: Option<Judgment>,
}

impl Default for LockJudge {
    fn default() -> Self {
        Self::new(Tolerances::default(), ColorMatcher::default(), true)
    }
}

impl LockJudge {
    /// New judge, Armed
    pub fn new(tolerances: Tolerances, matcher: ColorMatcher, require_color_match: bool) -> Self {
        Self {
            tolerances,
            matcher,
            require_color_match,
            state: JudgeState::Armed,
            last: None,
        }
    }

    pub fn state(&self) -> JudgeState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        self.state == JudgeState::Armed
    }

    /// Accept the next attempt
    pub fn arm(&mut self) {
        self.state = JudgeState::Armed;
    }

    /// Refuse attempts without judging (level complete, game over)
    pub fn disarm(&mut self) {
        self.state = JudgeState::Locked;
    }

    /// Most recent judgment, if any
    pub fn last_judgment(&self) -> Option<Judgment> {
        self.last
    }

    /// Judge `player` against `target`.
    ///
    /// Returns `None` while Locked; the input is ignored, not queued.
    pub fn attempt_lock(&mut self, player: &ShapeState, target: &ShapeState) -> Option<Judgment> {
        if self.state != JudgeState::Armed {
            return None;
        }
        self.state = JudgeState::Locked;

        let delta = delta_angle(player.normalized_rotation(), target.normalized_rotation());
        let angle_difference = delta.abs();

        let colors_matched = !self.require_color_match
            || self
                .matcher
                .matches(&player.blade_colors, &target.blade_colors, delta);

        let result = classify(angle_difference, colors_matched, self.tolerances);
        log::debug!(
            "Lock: {} (angle diff {:.2}, colors {})",
            result.as_str(),
            angle_difference,
            if colors_matched { "match" } else { "differ" }
        );

        let judgment = Judgment {
            result,
            angle_difference,
            colors_matched,
        };
        self.last = Some(judgment);
        Some(judgment)
    }
}
