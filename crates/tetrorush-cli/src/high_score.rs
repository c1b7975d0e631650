use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::util;

const FILE_KIND: &str = "high score";

/// Best score persisted between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub score: usize,
    #[serde(default)]
    pub achieved_at: Option<DateTime<Utc>>,
}

/// High score backed by a JSON file.
#[derive(Debug, Clone)]
pub struct HighScoreStore {
    path: PathBuf,
    record: HighScoreRecord,
}

impl HighScoreStore {
    /// Loads the record at `path`. A missing file yields an empty record.
    pub fn load<P>(path: P) -> anyhow::Result<Self>
    where
        P: Into<PathBuf>,
    {
        let path = path.into();
        let record = if path.exists() {
            util::read_json_file(FILE_KIND, &path)?
        } else {
            HighScoreRecord::default()
        };
        Ok(Self { path, record })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn record(&self) -> &HighScoreRecord {
        &self.record
    }

    /// Records `score` if it beats the stored one, saving the file.
    ///
    /// Returns whether a new record was set.
    pub fn submit(&mut self, score: usize) -> anyhow::Result<bool> {
        if score <= self.record.score {
            return Ok(false);
        }
        self.record = HighScoreRecord {
            score,
            achieved_at: Some(Utc::now()),
        };
        self.save()?;
        Ok(true)
    }

    pub fn reset(&mut self) -> anyhow::Result<()> {
        self.record = HighScoreRecord::default();
        self.save()
    }

    fn save(&self) -> anyhow::Result<()> {
        util::write_json_file(FILE_KIND, &self.path, &self.record)
    }
}

#[cfg(test)]
mod tests {
    use std::{env, fs, process};

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir()
            .join(format!("tetrorush-{}-{name}", process::id()))
            .join("highscore.json")
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let path = temp_path("missing");
        let store = HighScoreStore::load(&path).unwrap();
        assert_eq!(store.record(), &HighScoreRecord::default());
        assert!(!path.exists());
    }

    #[test]
    fn test_submit_saves_only_new_records() {
        let path = temp_path("submit");
        let mut store = HighScoreStore::load(&path).unwrap();

        assert!(store.submit(300).unwrap());
        assert!(!store.submit(300).unwrap());
        assert!(!store.submit(100).unwrap());
        assert_eq!(store.record().score, 300);
        assert!(store.record().achieved_at.is_some());

        let reloaded = HighScoreStore::load(&path).unwrap();
        assert_eq!(reloaded.record(), store.record());

        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_reset_clears_record() {
        let path = temp_path("reset");
        let mut store = HighScoreStore::load(&path).unwrap();
        store.submit(800).unwrap();
        store.reset().unwrap();

        let reloaded = HighScoreStore::load(&path).unwrap();
        assert_eq!(reloaded.record(), &HighScoreRecord::default());

        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let path = temp_path("malformed");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();

        let err = HighScoreStore::load(&path).unwrap_err();
        assert!(err.to_string().contains("high score"));

        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }
}
