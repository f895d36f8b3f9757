//! Storage key names

pub const SETTINGS: &str = "Settings";

pub const TOTAL_PERFECTS: &str = "Stats_TotalPerfects";
pub const TOTAL_GOODS: &str = "Stats_TotalGoods";
pub const TOTAL_MISSES: &str = "Stats_TotalMisses";
pub const TOTAL_SHAPES_COMPLETED: &str = "Stats_TotalShapesCompleted";
pub const TOTAL_SCORE: &str = "Stats_TotalScore";
pub const BEST_COMBO_EVER: &str = "Stats_BestComboEver";
pub const LEVELS_COMPLETED: &str = "Stats_LevelsCompleted";
/// Float, minutes
pub const TOTAL_PLAY_TIME: &str = "Stats_TotalPlayTime";

/// Every lifetime stat key, for reset
pub const LIFETIME_STATS: [&str; 8] = [
    TOTAL_PERFECTS,
    TOTAL_GOODS,
    TOTAL_MISSES,
    TOTAL_SHAPES_COMPLETED,
    TOTAL_SCORE,
    BEST_COMBO_EVER,
    LEVELS_COMPLETED,
    TOTAL_PLAY_TIME,
];

/// Comma-joined achievement ids
pub const UNLOCKED_ACHIEVEMENTS: &str = "UnlockedAchievements";

/// Highest unlocked level index
pub const UNLOCKED_LEVEL: &str = "UnlockedLevel";

pub fn level_best_score(index: usize) -> String {
    format!("Level_{}_BestScore", index)
}

pub fn level_best_combo(index: usize) -> String {
    format!("Level_{}_BestCombo", index)
}

pub fn level_completed(index: usize) -> String {
    format!("Level_{}_Completed", index)
}
