pub mod bank;

use serde::{Deserialize, Serialize};

pub use bank::{BundledWords, WordBank, WordBankError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// Which side of a pair is shown and which side is expected back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Prompt with the source side, answer with the target side.
    Forward,
    /// Prompt with the target side, answer with one of the source synonyms.
    Reverse,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Source,
    Target,
}

/// One translation pair. `source` may hold several comma-separated synonyms,
/// `target` is a single canonical string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPair {
    pub id: String,
    pub source: String,
    pub target: String,
    pub category: String,
    pub difficulty: Difficulty,
}

impl WordPair {
    pub fn source_synonyms(&self) -> impl Iterator<Item = &str> {
        self.source
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// First listed synonym, used where a single short label is needed
    /// (matching cards, reverse-direction choice options).
    pub fn primary_source(&self) -> &str {
        self.source_synonyms()
            .next()
            .unwrap_or_else(|| self.source.trim())
    }

    pub fn prompt(&self, direction: Direction) -> &str {
        match direction {
            Direction::Forward => &self.source,
            Direction::Reverse => &self.target,
        }
    }

    /// Full text of the expected answer, as revealed after a round.
    pub fn answer(&self, direction: Direction) -> &str {
        match direction {
            Direction::Forward => &self.target,
            Direction::Reverse => &self.source,
        }
    }

    /// Label used for this word when it appears as a choice option.
    pub fn option_label(&self, direction: Direction) -> &str {
        match direction {
            Direction::Forward => &self.target,
            Direction::Reverse => self.primary_source(),
        }
    }

    pub fn prompt_side(direction: Direction) -> Side {
        match direction {
            Direction::Forward => Side::Source,
            Direction::Reverse => Side::Target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(source: &str, target: &str) -> WordPair {
        WordPair {
            id: "x".to_string(),
            source: source.to_string(),
            target: target.to_string(),
            category: "Test".to_string(),
            difficulty: Difficulty::Easy,
        }
    }

    #[test]
    fn synonyms_are_trimmed_and_skip_blanks() {
        let word = pair(" умный ,  высокоинтеллектуальный,, ", "intelligent");
        let synonyms: Vec<&str> = word.source_synonyms().collect();
        assert_eq!(synonyms, vec!["умный", "высокоинтеллектуальный"]);
        assert_eq!(word.primary_source(), "умный");
    }

    #[test]
    fn prompt_and_answer_follow_direction() {
        let word = pair("зеркало", "mirror");
        assert_eq!(word.prompt(Direction::Forward), "зеркало");
        assert_eq!(word.answer(Direction::Forward), "mirror");
        assert_eq!(word.prompt(Direction::Reverse), "mirror");
        assert_eq!(word.answer(Direction::Reverse), "зеркало");
    }

    #[test]
    fn reverse_option_label_is_primary_synonym() {
        let word = pair("вся жизнь, целая жизнь", "lifetime");
        assert_eq!(word.option_label(Direction::Reverse), "вся жизнь");
        assert_eq!(word.option_label(Direction::Forward), "lifetime");
    }

    #[test]
    fn difficulty_deserializes_lowercase() {
        let d: Difficulty = serde_json::from_str("\"hard\"").unwrap();
        assert_eq!(d, Difficulty::Hard);
    }
}
