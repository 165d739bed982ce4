use serde::{Deserialize, Serialize};

use crate::engine::scoring::{self, ComboTier};
use crate::session::matching::MatchingBoard;
use crate::session::mode::GameMode;
use crate::words::{Direction, WordPair};

/// Recorded as the answer of a round whose countdown ran out.
pub const TIMEOUT_ANSWER: &str = "⏳ Time Out";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Start,
    Playing,
    GalaxyMap,
    Result,
}

/// Identifies one round of one session. Deferred events and remark replies
/// carry the token of the round that produced them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RoundToken {
    pub session: u64,
    pub step: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub word: WordPair,
    pub was_correct: bool,
    pub user_answer: String,
    pub mode: GameMode,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub mode: GameMode,
    pub score: u32,
    pub best_streak: u32,
    pub rounds: usize,
    pub correct: usize,
    pub won: bool,
    pub elapsed_secs: Option<u32>,
    pub moves: Option<u32>,
}

impl SessionOutcome {
    pub fn accuracy(&self) -> f64 {
        scoring::accuracy(self.correct, self.rounds)
    }
}

#[derive(Clone, Debug)]
pub struct Session {
    pub id: u64,
    pub mode: GameMode,
    pub seed: u64,
    pub word_sequence: Vec<WordPair>,
    pub current_index: usize,
    pub score: u32,
    pub streak: u32,
    pub best_streak: u32,
    pub lives: Option<u32>,
    pub boss_health: Option<u32>,
    pub history: Vec<HistoryEntry>,
    pub last_judgement: Option<bool>,
    pub time_left: Option<u32>,
    pub elapsed_secs: u32,
    pub options: Vec<String>,
    pub matching: Option<MatchingBoard>,
    pub outcome: Option<SessionOutcome>,
    pub step: u32,
}

impl Session {
    pub fn token(&self) -> RoundToken {
        RoundToken {
            session: self.id,
            step: self.step,
        }
    }

    pub fn current_word(&self) -> Option<&WordPair> {
        self.word_sequence.get(self.current_index)
    }

    /// Falls back to forward for matching, which shows both sides.
    pub fn direction(&self) -> Direction {
        self.mode.direction().unwrap_or(Direction::Forward)
    }

    pub fn prompt(&self) -> Option<&str> {
        let direction = self.direction();
        self.current_word().map(|w| w.prompt(direction))
    }

    pub fn is_awaiting_answer(&self) -> bool {
        self.outcome.is_none() && self.last_judgement.is_none()
    }

    pub fn correct_count(&self) -> usize {
        self.history.iter().filter(|h| h.was_correct).count()
    }

    pub fn combo(&self) -> Option<ComboTier> {
        ComboTier::from_streak(self.streak)
    }

    /// 1-based round number for display.
    pub fn round_number(&self) -> usize {
        self.current_index + 1
    }
}
