//! Blade color pattern matching
//!
//! Two shapes "match" when their blade colors line up after the player shape
//! is rotated by the nearest whole number of blade slots. Small rotational
//! error is absorbed by the rounding; the pattern itself must be exact.

use glam::Vec4;

use crate::consts::COLOR_THRESHOLD;

/// RGBA color, components on a 0-1 scale. Alpha never takes part in matching.
pub type Color = Vec4;

/// Colors blades are drawn from when generating a round
pub const PALETTE: [Color; 7] = [
    Vec4::new(1.0, 0.3, 0.3, 1.0), // red
    Vec4::new(0.3, 1.0, 0.3, 1.0), // green
    Vec4::new(0.3, 0.5, 1.0, 1.0), // blue
    Vec4::new(1.0, 1.0, 0.3, 1.0), // yellow
    Vec4::new(1.0, 0.5, 0.0, 1.0), // orange
    Vec4::new(0.8, 0.3, 1.0, 1.0), // purple
    Vec4::new(0.0, 1.0, 1.0, 1.0), // cyan
];

/// Component-wise RGB comparison, each channel strictly under `threshold`
#[inline]
pub fn colors_approx_equal(a: Color, b: Color, threshold: f32) -> bool {
    let diff = (a.truncate() - b.truncate()).abs();
    diff.x < threshold && diff.y < threshold && diff.z < threshold
}

/// Rotational blade-pattern matcher
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatcher {
    /// Per-channel tolerance
    pub threshold: f32,
}

impl Default for ColorMatcher {
    fn default() -> Self {
        Self {
            threshold: COLOR_THRESHOLD,
        }
    }
}

impl ColorMatcher {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    /// Blade slot offset in [0, n) for a signed angle delta (player -> target).
    ///
    /// Half-slot deltas round to the even slot. Returns `None` for a shape
    /// without blades.
    pub fn slot_offset(angle_delta: f32, blade_count: usize) -> Option<usize> {
        if blade_count == 0 {
            return None;
        }
        let angle_per_blade = 360.0 / blade_count as f32;
        let slots = (angle_delta / angle_per_blade).round_ties_even() as i64;
        Some(slots.rem_euclid(blade_count as i64) as usize)
    }

    /// Check whether `player` lines up with `target` at the slot nearest to
    /// `angle_delta`. Empty or length-mismatched patterns never match.
    pub fn matches(&self, player: &[Color], target: &[Color], angle_delta: f32) -> bool {
        let n = player.len();
        if n != target.len() {
            return false;
        }
        let Some(offset) = Self::slot_offset(angle_delta, n) else {
            return false;
        };

        player
            .iter()
            .enumerate()
            .all(|(i, &color)| colors_approx_equal(color, target[(i + offset) % n], self.threshold))
    }
}
