use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::words::Direction;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    TranslateForward,
    TranslateReverse,
    ChoiceForward,
    ChoiceReverse,
    SpeedRun,
    Survival,
    BossBattle,
    Matching,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    FreeText,
    MultipleChoice,
    Cards,
}

pub const SURVIVAL_LIVES: u32 = 3;
pub const BOSS_MAX_HEALTH: u32 = 100;
pub const BOSS_HIT_DAMAGE: u32 = 20;

impl GameMode {
    pub fn all() -> &'static [GameMode] {
        &[
            GameMode::TranslateForward,
            GameMode::TranslateReverse,
            GameMode::ChoiceForward,
            GameMode::ChoiceReverse,
            GameMode::SpeedRun,
            GameMode::Survival,
            GameMode::BossBattle,
            GameMode::Matching,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GameMode::TranslateForward => "translate-forward",
            GameMode::TranslateReverse => "translate-reverse",
            GameMode::ChoiceForward => "choice-forward",
            GameMode::ChoiceReverse => "choice-reverse",
            GameMode::SpeedRun => "speed-run",
            GameMode::Survival => "survival",
            GameMode::BossBattle => "boss-battle",
            GameMode::Matching => "matching",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|m| m.as_str() == key)
    }

    pub fn label(self) -> &'static str {
        match self {
            GameMode::TranslateForward => "Translate",
            GameMode::TranslateReverse => "Reverse Translate",
            GameMode::ChoiceForward => "Quick Choice",
            GameMode::ChoiceReverse => "Reverse Choice",
            GameMode::SpeedRun => "Speed Run",
            GameMode::Survival => "Survival",
            GameMode::BossBattle => "Boss Battle",
            GameMode::Matching => "Memory Match",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            GameMode::TranslateForward => "Type the translation of each word",
            GameMode::TranslateReverse => "Type the original word for each translation",
            GameMode::ChoiceForward => "Pick the translation from four options",
            GameMode::ChoiceReverse => "Pick the original word from four options",
            GameMode::SpeedRun => "60 seconds for each word. Run out and the run ends",
            GameMode::Survival => "Three lives. Every miss costs one",
            GameMode::BossBattle => "Hard words only. Five hits defeat the boss",
            GameMode::Matching => "Flip cards to find translation pairs",
        }
    }

    /// `None` for matching, which has no prompt/answer direction.
    pub fn direction(self) -> Option<Direction> {
        match self {
            GameMode::TranslateReverse | GameMode::ChoiceReverse => Some(Direction::Reverse),
            GameMode::Matching => None,
            _ => Some(Direction::Forward),
        }
    }

    pub fn input(self) -> InputKind {
        match self {
            GameMode::ChoiceForward | GameMode::ChoiceReverse | GameMode::SpeedRun => {
                InputKind::MultipleChoice
            }
            GameMode::Matching => InputKind::Cards,
            _ => InputKind::FreeText,
        }
    }

    /// Round countdown in seconds; `None` disables the timer.
    pub fn time_limit_secs(self) -> Option<u32> {
        match self {
            GameMode::Matching => None,
            GameMode::SpeedRun => Some(60),
            GameMode::BossBattle => Some(20),
            _ => Some(30),
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| {
            let known: Vec<&str> = Self::all().iter().map(|m| m.as_str()).collect();
            format!("unknown mode '{s}' (expected one of: {})", known.join(", "))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip() {
        for mode in GameMode::all() {
            assert_eq!(GameMode::from_key(mode.as_str()), Some(*mode));
            assert_eq!(mode.as_str().parse::<GameMode>(), Ok(*mode));
        }
        assert!("freestyle".parse::<GameMode>().is_err());
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&GameMode::BossBattle).unwrap();
        assert_eq!(json, "\"boss-battle\"");
    }

    #[test]
    fn mode_table() {
        assert_eq!(GameMode::SpeedRun.input(), InputKind::MultipleChoice);
        assert_eq!(GameMode::SpeedRun.time_limit_secs(), Some(60));
        assert_eq!(GameMode::Survival.input(), InputKind::FreeText);
        assert_eq!(GameMode::BossBattle.time_limit_secs(), Some(20));
        assert_eq!(GameMode::ChoiceReverse.direction(), Some(Direction::Reverse));
        assert_eq!(GameMode::Matching.direction(), None);
        assert_eq!(GameMode::Matching.time_limit_secs(), None);
    }

    #[test]
    fn speed_run_description_matches_per_round_clock() {
        let limit = GameMode::SpeedRun.time_limit_secs().unwrap();
        let text = GameMode::SpeedRun.description();
        assert!(text.starts_with(&format!("{limit} seconds for each word")));
        assert!(!text.contains("as many as"));
    }
}
