use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

pub const LOG_FILE: &str = "vocab-quest.log";

pub fn log_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vocab-quest")
}

/// `RUST_LOG` wins over the configured level.
fn filter(config: &Config) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn open_log(dir: &Path) -> Result<File> {
    fs::create_dir_all(dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))?;
    Ok(file)
}

/// Send tracing output to a file in `dir`. The terminal belongs to the UI,
/// so nothing is written to stdout or stderr.
pub fn init(config: &Config, dir: &Path) -> Result<()> {
    let file = open_log(dir)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter(config))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_is_created_in_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let nested = dir.path().join("logs");
        open_log(&nested).unwrap();
        assert!(nested.join(LOG_FILE).exists());
    }

    #[test]
    fn configured_level_is_used() {
        let mut config = Config::default();
        config.log_level = "debug".to_string();
        assert!(filter(&config).to_string().contains("debug") || std::env::var("RUST_LOG").is_ok());
    }
}
