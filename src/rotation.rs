//! Player shape rotation
//!
//! Constant-speed spin, optionally driven by music band levels:
//! - mid band speeds the spin up
//! - low band pulses the scale
//! - high band peaks flip the direction (with a cooldown)

use serde::{Deserialize, Serialize};

use crate::consts::ROTATION_SPEED;

/// Speed gain applied to the mid band
pub const SPEED_MULTIPLIER: f32 = 2.0;
/// Scale gain applied to the low band
pub const SCALE_AMOUNT: f32 = 0.2;
/// High band level that flips direction
pub const HIGH_THRESHOLD: f32 = 0.7;
/// Minimum seconds between direction flips
pub const DIRECTION_COOLDOWN: f32 = 1.0;

/// Smoothed frequency band levels, each in [0, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BandLevels {
    pub low: f32,
    pub mid: f32,
    pub high: f32,
}

impl BandLevels {
    pub fn new(low: f32, mid: f32, high: f32) -> Self {
        Self {
            low: low.clamp(0.0, 1.0),
            mid: mid.clamp(0.0, 1.0),
            high: high.clamp(0.0, 1.0),
        }
    }
}

/// Drives the player shape's angle
#[derive(Debug, Clone)]
pub struct Rotor {
    /// Degrees per second with no music input
    pub base_speed: f32,
    pub clockwise: bool,
    rotation: f32,
    speed: f32,
    /// -1 clockwise, +1 counter-clockwise
    direction: f32,
    scale: f32,
    running: bool,
    /// Seconds of rotor time, for the flip cooldown
    elapsed: f32,
    last_flip: f32,
}

impl Default for Rotor {
    fn default() -> Self {
        Self::new(ROTATION_SPEED, true)
    }
}

impl Rotor {
    pub fn new(base_speed: f32, clockwise: bool) -> Self {
        Self {
            base_speed,
            clockwise,
            rotation: 0.0,
            speed: base_speed,
            direction: Self::base_direction(clockwise),
            scale: 1.0,
            running: true,
            elapsed: 0.0,
            last_flip: -DIRECTION_COOLDOWN,
        }
    }

    fn base_direction(clockwise: bool) -> f32 {
        if clockwise { -1.0 } else { 1.0 }
    }

    /// Step by `dt` seconds. Without band levels the rotor spins at base
    /// speed in its base direction.
    pub fn advance(&mut self, dt: f32, bands: Option<BandLevels>) {
        if !self.running {
            return;
        }
        self.elapsed += dt;

        match bands {
            Some(bands) => {
                self.speed = self.base_speed + self.base_speed * bands.mid * SPEED_MULTIPLIER;
                self.scale = 1.0 + bands.low * SCALE_AMOUNT;
                if bands.high >= HIGH_THRESHOLD
                    && self.elapsed - self.last_flip >= DIRECTION_COOLDOWN
                {
                    self.direction = -self.direction;
                    self.last_flip = self.elapsed;
                    log::trace!("Rotation flipped at {:.2}s", self.elapsed);
                }
            }
            None => {
                self.speed = self.base_speed;
                self.scale = 1.0;
                self.direction = Self::base_direction(self.clockwise);
            }
        }

        self.rotation = (self.rotation + self.speed * self.direction * dt) % 360.0;
    }

    pub fn set_clockwise(&mut self, clockwise: bool) {
        self.clockwise = clockwise;
        self.direction = Self::base_direction(clockwise);
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn resume(&mut self) {
        self.running = true;
    }

    /// Back to rotation 0
    pub fn reset(&mut self) {
        self.rotation = 0.0;
    }

    /// Jump to an absolute angle (degrees)
    pub fn set_rotation(&mut self, degrees: f32) {
        self.rotation = degrees % 360.0;
    }

    /// Current angle in degrees, in (-360, 360)
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn direction(&self) -> f32 {
        self.direction
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clockwise_spins_negative() {
        let mut rotor = Rotor::default();
        rotor.advance(1.0, None);
        assert_eq!(rotor.rotation(), -90.0);

        let mut ccw = Rotor::new(90.0, false);
        ccw.advance(0.5, None);
        assert_eq!(ccw.rotation(), 45.0);
    }

    #[test]
    fn test_rotation_wraps() {
        let mut rotor = Rotor::new(100.0, false);
        rotor.advance(4.0, None);
        assert!((rotor.rotation() - 40.0).abs() < 1e-3);
    }

    #[test]
    fn test_mid_band_speeds_up() {
        let mut rotor = Rotor::new(90.0, false);
        rotor.advance(0.1, Some(BandLevels::new(0.5, 0.5, 0.0)));
        assert_eq!(rotor.speed(), 180.0);
        assert!((rotor.scale() - 1.1).abs() < 1e-6);
    }

    #[test]
    fn test_high_band_flip_has_cooldown() {
        let mut rotor = Rotor::new(90.0, true);
        let loud = Some(BandLevels::new(0.0, 0.0, 0.9));

        rotor.advance(0.1, loud);
        assert_eq!(rotor.direction(), 1.0);
        // Inside the cooldown
        rotor.advance(0.5, loud);
        assert_eq!(rotor.direction(), 1.0);
        rotor.advance(0.6, loud);
        assert_eq!(rotor.direction(), -1.0);
    }

    #[test]
    fn test_stop_and_reset() {
        let mut rotor = Rotor::default();
        rotor.advance(0.5, None);
        rotor.stop();
        rotor.advance(1.0, None);
        assert_eq!(rotor.rotation(), -45.0);

        rotor.reset();
        rotor.resume();
        assert_eq!(rotor.rotation(), 0.0);
        assert!(rotor.is_running());
    }
}
