use crate::session::mode::GameMode;

/// Facts about a finished session, evaluated after progress totals are updated.
#[derive(Clone, Copy, Debug)]
pub struct AchievementContext {
    pub best_streak: u32,
    pub learned_words: usize,
    pub mode: GameMode,
    pub won: bool,
}

pub struct AchievementDefinition {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    condition: fn(&AchievementContext) -> bool,
}

impl AchievementDefinition {
    pub fn is_met(&self, ctx: &AchievementContext) -> bool {
        (self.condition)(ctx)
    }
}

pub const ALL_ACHIEVEMENTS: &[AchievementDefinition] = &[
    AchievementDefinition {
        id: "first-word",
        title: "First Contact",
        description: "Learn your first word",
        condition: |c| c.learned_words >= 1,
    },
    AchievementDefinition {
        id: "streak-5",
        title: "Warp Speed",
        description: "Reach a streak of 5",
        condition: |c| c.best_streak >= 5,
    },
    AchievementDefinition {
        id: "streak-10",
        title: "Supernova",
        description: "Reach a streak of 10",
        condition: |c| c.best_streak >= 10,
    },
    AchievementDefinition {
        id: "words-25",
        title: "Star Charter",
        description: "Learn 25 words",
        condition: |c| c.learned_words >= 25,
    },
    AchievementDefinition {
        id: "words-50",
        title: "Constellation",
        description: "Learn 50 words",
        condition: |c| c.learned_words >= 50,
    },
    AchievementDefinition {
        id: "words-100",
        title: "Galaxy Brain",
        description: "Learn 100 words",
        condition: |c| c.learned_words >= 100,
    },
    AchievementDefinition {
        id: "boss-slayer",
        title: "Boss Slayer",
        description: "Defeat the boss",
        condition: |c| c.mode == GameMode::BossBattle && c.won,
    },
    AchievementDefinition {
        id: "survivor",
        title: "Survivor",
        description: "Finish survival with lives to spare",
        condition: |c| c.mode == GameMode::Survival && c.won,
    },
    AchievementDefinition {
        id: "speed-demon",
        title: "Speed Demon",
        description: "Finish a speed run before the clock runs out",
        condition: |c| c.mode == GameMode::SpeedRun && c.won,
    },
];

pub fn evaluate(ctx: &AchievementContext) -> impl Iterator<Item = &'static AchievementDefinition> + '_ {
    ALL_ACHIEVEMENTS.iter().filter(move |a| a.is_met(ctx))
}

pub fn find(id: &str) -> Option<&'static AchievementDefinition> {
    ALL_ACHIEVEMENTS.iter().find(|a| a.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(best_streak: u32, learned_words: usize, mode: GameMode, won: bool) -> AchievementContext {
        AchievementContext {
            best_streak,
            learned_words,
            mode,
            won,
        }
    }

    fn ids(ctx: &AchievementContext) -> Vec<&'static str> {
        evaluate(ctx).map(|a| a.id).collect()
    }

    #[test]
    fn nothing_unlocks_for_an_empty_session() {
        assert!(ids(&ctx(0, 0, GameMode::TranslateForward, true)).is_empty());
    }

    #[test]
    fn thresholds_are_inclusive() {
        let unlocked = ids(&ctx(10, 25, GameMode::ChoiceForward, true));
        assert_eq!(unlocked, vec!["first-word", "streak-5", "streak-10", "words-25"]);
    }

    #[test]
    fn mode_wins_require_matching_mode() {
        assert!(ids(&ctx(0, 0, GameMode::BossBattle, true)).contains(&"boss-slayer"));
        assert!(!ids(&ctx(0, 0, GameMode::BossBattle, false)).contains(&"boss-slayer"));
        assert!(!ids(&ctx(0, 0, GameMode::Survival, true)).contains(&"boss-slayer"));
        assert!(ids(&ctx(0, 0, GameMode::Survival, true)).contains(&"survivor"));
        assert!(ids(&ctx(0, 0, GameMode::SpeedRun, true)).contains(&"speed-demon"));
    }

    #[test]
    fn ids_are_unique_and_findable() {
        for a in ALL_ACHIEVEMENTS {
            assert_eq!(find(a.id).map(|f| f.title), Some(a.title));
        }
        assert!(find("unknown").is_none());
    }
}
