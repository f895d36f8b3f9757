//! Achievement definitions and the built-in catalog

use serde::{Deserialize, Serialize};

/// Grouping used by achievement screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AchievementCategory {
    Beginner,
    Skill,
    Endurance,
    Mastery,
}

impl AchievementCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AchievementCategory::Beginner => "Beginner",
            AchievementCategory::Skill => "Skill",
            AchievementCategory::Endurance => "Endurance",
            AchievementCategory::Mastery => "Mastery",
        }
    }
}

/// Rule kinds an achievement can unlock on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AchievementCondition {
    FirstPerfect,
    FirstLevelComplete,
    PerfectsInRow,
    ComboReached,
    TotalShapesCompleted,
    TotalScoreReached,
    TotalPerfects,
    LevelsCompleted,
    AllLevelsCompleted,
    PerfectAccuracyOnLevel,
    NoMissesOnLevel,
    PlayTimeMinutes,
}

/// Static catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementDefinition {
    /// Unique, stable id (persisted)
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: AchievementCategory,
    pub condition: AchievementCondition,
    pub target_value: u32,
    /// Stars granted on unlock (>= 1)
    pub star_reward: u32,
}

impl AchievementDefinition {
    pub fn new(
        id: &str,
        title: &str,
        description: &str,
        category: AchievementCategory,
        condition: AchievementCondition,
        target_value: u32,
        star_reward: u32,
    ) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            category,
            condition,
            target_value,
            star_reward: star_reward.max(1),
        }
    }
}

/// The shipped achievement set
pub fn default_catalog() -> Vec<AchievementDefinition> {
    use AchievementCategory::*;
    use AchievementCondition as C;

    let def = AchievementDefinition::new;
    vec![
        def("first_perfect", "First Blood", "Get your first Perfect hit", Beginner, C::FirstPerfect, 1, 1),
        def("first_level", "Baby Steps", "Complete your first level", Beginner, C::FirstLevelComplete, 1, 1),
        def("shapes_10", "Getting Started", "Complete 10 shapes total", Beginner, C::TotalShapesCompleted, 10, 1),
        def("combo_10", "Combo Starter", "Reach a combo of 10", Beginner, C::ComboReached, 10, 1),
        def("perfect_5_row", "On Fire", "Get 5 Perfects in a row", Skill, C::PerfectsInRow, 5, 2),
        def("perfect_10_row", "Unstoppable", "Get 10 Perfects in a row", Skill, C::PerfectsInRow, 10, 3),
        def("combo_25", "Combo Master", "Reach a combo of 25", Skill, C::ComboReached, 25, 2),
        def("combo_50", "Combo Legend", "Reach a combo of 50", Skill, C::ComboReached, 50, 3),
        def("no_miss_level", "Flawless Run", "Complete a level without missing", Skill, C::NoMissesOnLevel, 1, 3),
        def("perfect_accuracy", "Perfectionist", "Get 100% Perfect accuracy on a level", Skill, C::PerfectAccuracyOnLevel, 1, 5),
        def("shapes_50", "Shape Shifter", "Complete 50 shapes total", Endurance, C::TotalShapesCompleted, 50, 2),
        def("shapes_100", "Century", "Complete 100 shapes total", Endurance, C::TotalShapesCompleted, 100, 3),
        def("shapes_500", "Shape Veteran", "Complete 500 shapes total", Endurance, C::TotalShapesCompleted, 500, 5),
        def("score_1000", "Point Collector", "Earn 1,000 total points", Endurance, C::TotalScoreReached, 1000, 1),
        def("score_10000", "Score Hunter", "Earn 10,000 total points", Endurance, C::TotalScoreReached, 10000, 3),
        def("playtime_30", "Dedicated", "Play for 30 minutes total", Endurance, C::PlayTimeMinutes, 30, 2),
        def("levels_5", "Rising Star", "Complete 5 levels", Mastery, C::LevelsCompleted, 5, 2),
        def("levels_15", "Halfway There", "Complete 15 levels", Mastery, C::LevelsCompleted, 15, 3),
        def("levels_all", "Champion", "Complete all levels", Mastery, C::AllLevelsCompleted, 1, 10),
        def("combo_100", "Rhythm God", "Reach a combo of 100", Mastery, C::ComboReached, 100, 10),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_catalog_ids_are_unique() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), 20);
        let ids: HashSet<_> = catalog.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids.len(), catalog.len());
        assert!(catalog.iter().all(|a| a.star_reward >= 1));
    }

    #[test]
    fn test_star_reward_floor() {
        let a = AchievementDefinition::new(
            "x",
            "X",
            "",
            AchievementCategory::Skill,
            AchievementCondition::ComboReached,
            3,
            0,
        );
        assert_eq!(a.star_reward, 1);
    }
}
