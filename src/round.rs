//! Round generation
//!
//! A round is a target shape (random blade count, blade colors and angle) and
//! a player shape with the same colors starting at rotation 0. Seeded, so a
//! run can be replayed.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_BLADES, MIN_BLADES};
use crate::judge::{Color, LockResult, PALETTE, ShapeState};

/// One generated round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// 1-based round counter
    pub number: u32,
    pub target: ShapeState,
    /// Player blade colors (rotation comes from the rotor)
    pub player_colors: Vec<Color>,
}

impl Round {
    /// Player shape at the given rotation
    pub fn player_shape(&self, rotation: f32) -> ShapeState {
        ShapeState::new(rotation, self.player_colors.clone())
    }

    pub fn blade_count(&self) -> usize {
        self.target.blade_count()
    }
}

/// What follows a judged lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundTransition {
    /// Miss: same round again from rotation 0
    Retry,
    /// Hit: a fresh round
    Next,
}

impl RoundTransition {
    pub fn after(result: LockResult) -> Self {
        if result.is_hit() {
            RoundTransition::Next
        } else {
            RoundTransition::Retry
        }
    }
}

/// Seeded round source
#[derive(Debug, Clone)]
pub struct RoundGenerator {
    seed: u64,
    rng: Pcg32,
    round: u32,
}

impl RoundGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            round: 0,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Rounds generated so far
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Restart the counter; the random stream keeps going
    pub fn reset_counter(&mut self) {
        self.round = 0;
    }

    /// Generate the next round
    pub fn next_round(&mut self) -> Round {
        self.round += 1;

        let blades = self.rng.random_range(MIN_BLADES..=MAX_BLADES);
        let colors: Vec<Color> = (0..blades)
            .map(|_| PALETTE[self.rng.random_range(0..PALETTE.len())])
            .collect();
        let angle = self.rng.random_range(0.0f32..360.0);

        log::debug!(
            "Round {}: {} blades, target at {:.1} deg",
            self.round,
            blades,
            angle
        );

        Round {
            number: self.round,
            target: ShapeState::new(angle, colors.clone()),
            player_colors: colors,
        }
    }
}
