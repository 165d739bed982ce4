use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cross-session player record. Missing fields load as defaults and unknown
/// fields are ignored, so older and newer files both open.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Progress {
    pub total_score: u64,
    pub best_streak_ever: u32,
    pub learned_word_ids: BTreeSet<String>,
    pub games_played: u32,
    pub achievements: BTreeSet<String>,
    pub sound_enabled: bool,
    pub last_played: Option<DateTime<Utc>>,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            total_score: 0,
            best_streak_ever: 0,
            learned_word_ids: BTreeSet::new(),
            games_played: 0,
            achievements: BTreeSet::new(),
            sound_enabled: true,
            last_played: None,
        }
    }
}

impl Progress {
    pub fn learned_count(&self) -> usize {
        self.learned_word_ids.len()
    }

    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.contains(id)
    }
}
