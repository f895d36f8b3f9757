//! Sampled shape state

use serde::{Deserialize, Serialize};

use super::color::Color;
use crate::normalize_angle;

/// A shape as seen by the judge: orientation plus one color per blade.
///
/// Blade index is the angular slot, so order matters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeState {
    /// Orientation in degrees, any real value
    pub rotation: f32,
    /// Blade colors, index = angular slot
    pub blade_colors: Vec<Color>,
}

impl ShapeState {
    pub fn new(rotation: f32, blade_colors: Vec<Color>) -> Self {
        Self {
            rotation,
            blade_colors,
        }
    }

    /// Orientation wrapped to [0, 360)
    #[inline]
    pub fn normalized_rotation(&self) -> f32 {
        normalize_angle(self.rotation)
    }

    #[inline]
    pub fn blade_count(&self) -> usize {
        self.blade_colors.len()
    }
}
