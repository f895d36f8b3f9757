//! Achievements
//!
//! A static catalog of rules evaluated against the stat event stream. Each id
//! unlocks at most once until an explicit reset.

pub mod catalog;
pub mod engine;

pub use catalog::{AchievementCategory, AchievementCondition, AchievementDefinition, default_catalog};
pub use engine::{AchievementEngine, LevelProgress, condition_met};
