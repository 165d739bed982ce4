use std::collections::HashSet;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::words::WordPair;

const BUNDLED_WORDS: &str = include_str!("../../assets/words.json");

/// Read-only source of translation pairs.
pub trait WordBank {
    fn list(&self) -> &[WordPair];
}

#[derive(Debug, Error)]
pub enum WordBankError {
    #[error("failed to read word bank {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse word bank: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("word bank contains no words")]
    Empty,
    #[error("duplicate word id '{0}'")]
    DuplicateId(String),
}

#[derive(Clone, Debug)]
pub struct BundledWords {
    words: Vec<WordPair>,
}

impl BundledWords {
    /// The word list compiled into the binary.
    pub fn load() -> Self {
        let words: Vec<WordPair> = serde_json::from_str(BUNDLED_WORDS).unwrap_or_default();
        Self { words }
    }

    pub fn from_file(path: &Path) -> Result<Self, WordBankError> {
        let content = fs::read_to_string(path).map_err(|source| WordBankError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, WordBankError> {
        let words: Vec<WordPair> = serde_json::from_str(json)?;
        Self::from_words(words)
    }

    pub fn from_words(words: Vec<WordPair>) -> Result<Self, WordBankError> {
        if words.is_empty() {
            return Err(WordBankError::Empty);
        }
        let mut seen = HashSet::new();
        for word in &words {
            if !seen.insert(word.id.as_str()) {
                return Err(WordBankError::DuplicateId(word.id.clone()));
            }
        }
        Ok(Self { words })
    }

    /// Custom bank from `path`, or the bundled list when it is missing or invalid.
    pub fn load_or_bundled(path: Option<&Path>) -> Self {
        match path {
            Some(path) => match Self::from_file(path) {
                Ok(bank) => {
                    tracing::info!(path = %path.display(), words = bank.words.len(), "Loaded custom word bank");
                    bank
                }
                Err(err) => {
                    tracing::warn!(%err, "Custom word bank unusable, falling back to bundled words");
                    Self::load()
                }
            },
            None => Self::load(),
        }
    }

}

impl WordBank for BundledWords {
    fn list(&self) -> &[WordPair] {
        &self.words
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::words::Difficulty;

    #[test]
    fn bundled_bank_has_unique_ids() {
        let bank = BundledWords::load();
        assert_eq!(bank.list().len(), 25);
        let ids: HashSet<&str> = bank.list().iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids.len(), bank.list().len());
    }

    #[test]
    fn bundled_bank_has_fewer_than_five_hard_words() {
        // Boss battles on the bundled list always take the sampling fallback.
        let bank = BundledWords::load();
        let hard = bank
            .list()
            .iter()
            .filter(|w| w.difficulty == Difficulty::Hard)
            .count();
        assert_eq!(hard, 4);
    }

    #[test]
    fn rejects_empty_and_duplicate_banks() {
        assert!(matches!(
            BundledWords::from_json("[]"),
            Err(WordBankError::Empty)
        ));

        let json = r#"[
            {"id":"a","source":"кот","target":"cat","category":"Animals","difficulty":"easy"},
            {"id":"a","source":"пёс","target":"dog","category":"Animals","difficulty":"easy"}
        ]"#;
        match BundledWords::from_json(json) {
            Err(WordBankError::DuplicateId(id)) => assert_eq!(id, "a"),
            other => panic!("expected duplicate id error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_falls_back_to_bundled() {
        let dir = tempfile::TempDir::new().unwrap();
        let bank = BundledWords::load_or_bundled(Some(&dir.path().join("missing.json")));
        assert_eq!(bank.list().len(), BundledWords::load().list().len());
    }

    #[test]
    fn custom_file_is_loaded() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("words.json");
        fs::write(
            &path,
            r#"[{"id":"cat","source":"кот","target":"cat","category":"Animals","difficulty":"easy"}]"#,
        )
        .unwrap();
        let bank = BundledWords::load_or_bundled(Some(&path));
        assert_eq!(bank.list().len(), 1);
        assert_eq!(bank.list()[0].target, "cat");
    }
}
