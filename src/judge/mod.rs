//! Lock judgment
//!
//! Samples the player and target shapes at the moment of input and classifies
//! the attempt. Pure functions of the sampled state; no engine dependencies.

pub mod color;
pub mod lock;
pub mod shape;

pub use color::{Color, ColorMatcher, PALETTE, colors_approx_equal};
pub use lock::{JudgeState, Judgment, LockJudge, LockResult, Tolerances, classify};
pub use shape::ShapeState;
