use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;

use crate::store::schema::Progress;

const PROGRESS_FILE: &str = "progress.json";

/// Durable home of the player's [`Progress`].
pub trait ProgressStore {
    /// Stored progress, or defaults when nothing usable is on disk.
    fn load(&self) -> Progress;
    fn save(&self, progress: &Progress) -> Result<()>;
}

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vocab-quest");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn path(&self) -> PathBuf {
        self.base_dir.join(PROGRESS_FILE)
    }
}

impl ProgressStore for JsonStore {
    fn load(&self) -> Progress {
        let path = self.path();
        if !path.exists() {
            return Progress::default();
        }
        let parsed = fs::read_to_string(&path)
            .map_err(anyhow::Error::from)
            .and_then(|content| serde_json::from_str(&content).map_err(anyhow::Error::from));
        match parsed {
            Ok(progress) => progress,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "Progress file unreadable, starting fresh");
                Progress::default()
            }
        }
    }

    fn save(&self, progress: &Progress) -> Result<()> {
        let path = self.path();
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(progress)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn missing_file_loads_defaults() {
        let (_dir, store) = make_test_store();
        assert_eq!(store.load(), Progress::default());
    }

    #[test]
    fn saved_progress_round_trips() {
        let (_dir, store) = make_test_store();
        let mut progress = Progress::default();
        progress.total_score = 340;
        progress.learned_word_ids.insert("7".to_string());
        progress.sound_enabled = false;
        store.save(&progress).unwrap();

        assert_eq!(store.load(), progress);
        assert!(!store.path().with_extension("tmp").exists());
    }

    #[test]
    fn corrupt_file_loads_defaults() {
        let (_dir, store) = make_test_store();
        fs::write(store.path(), "{ not json").unwrap();
        assert_eq!(store.load(), Progress::default());
    }

    #[test]
    fn save_into_missing_dir_fails() {
        let (dir, _store) = make_test_store();
        let bad_store = JsonStore {
            base_dir: dir.path().join("nonexistent_subdir"),
        };
        assert!(bad_store.save(&Progress::default()).is_err());
    }
}
