//! Score history in a local SQLite database
//!
//! Stored at <data dir>/blockfall/scores.db (platform equivalent) unless a
//! path is given on the command line or in settings.

use crate::error::StoreError;
use directories::ProjectDirs;
use rusqlite::{params, Connection};
use std::fs;
use std::path::{Path, PathBuf};

const DB_FILE: &str = "scores.db";

/// One row of the results table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRecord {
    pub score: u64,
    /// SQLite `CURRENT_TIMESTAMP`, UTC
    pub recorded_at: String,
}

/// Append-only store of finished game scores
pub struct ScoreStore {
    conn: Connection,
}

impl ScoreStore {
    /// Default database location in the platform data directory
    pub fn default_path() -> Result<PathBuf, StoreError> {
        ProjectDirs::from("com", "blockfall", "blockfall")
            .map(|dirs| dirs.data_dir().join(DB_FILE))
            .ok_or(StoreError::NoDataDir)
    }

    /// Open (creating if needed) the database at `path`
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| StoreError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        Self::init(Connection::open(path)?)
    }

    /// A throwaway store, used when no file is wanted
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS results (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                score INTEGER NOT NULL,
                recorded_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            [],
        )?;
        Ok(Self { conn })
    }

    /// Append one finished game's score
    pub fn record_score(&self, score: u64) -> Result<(), StoreError> {
        let score = i64::try_from(score).unwrap_or(i64::MAX);
        self.conn
            .execute("INSERT INTO results (score) VALUES (?1)", params![score])?;
        Ok(())
    }

    /// Highest score on record, if any game has been recorded
    pub fn best_score(&self) -> Result<Option<u64>, StoreError> {
        let best: Option<i64> = self
            .conn
            .query_row("SELECT MAX(score) FROM results", [], |row| {
                row.get::<_, Option<i64>>(0)
            })?;
        Ok(best.map(|score| score.max(0) as u64))
    }

    /// The `limit` best scores, highest first, ties broken by age
    pub fn top_scores(&self, limit: usize) -> Result<Vec<ScoreRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT score, recorded_at FROM results ORDER BY score DESC, id ASC LIMIT ?1",
        )?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt.query_map(params![limit], |row| {
            let score: i64 = row.get(0)?;
            Ok(ScoreRecord {
                score: score.max(0) as u64,
                recorded_at: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store_has_no_best() {
        let store = ScoreStore::open_in_memory().unwrap();
        assert_eq!(store.best_score().unwrap(), None);
        assert!(store.top_scores(5).unwrap().is_empty());
    }

    #[test]
    fn test_record_and_rank() {
        let store = ScoreStore::open_in_memory().unwrap();
        for score in [300, 1500, 0, 700] {
            store.record_score(score).unwrap();
        }
        assert_eq!(store.best_score().unwrap(), Some(1500));

        let top: Vec<u64> = store
            .top_scores(3)
            .unwrap()
            .into_iter()
            .map(|record| record.score)
            .collect();
        assert_eq!(top, vec![1500, 700, 300]);
    }

    #[test]
    fn test_records_get_timestamp() {
        let store = ScoreStore::open_in_memory().unwrap();
        store.record_score(100).unwrap();
        let top = store.top_scores(1).unwrap();
        assert!(!top[0].recorded_at.is_empty());
    }

    #[test]
    fn test_write_failure_is_an_error() {
        let store = ScoreStore::open_in_memory().unwrap();
        store.conn.execute("DROP TABLE results", []).unwrap();
        assert!(matches!(store.record_score(100), Err(StoreError::Sqlite(_))));
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = std::env::temp_dir().join(format!("blockfall-test-{}", std::process::id()));
        let path = dir.join("nested").join(DB_FILE);
        {
            let store = ScoreStore::open(&path).unwrap();
            store.record_score(42).unwrap();
        }
        let reopened = ScoreStore::open(&path).unwrap();
        assert_eq!(reopened.best_score().unwrap(), Some(42));
        let _ = fs::remove_dir_all(&dir);
    }
}
