use crate::app_dirs::AppDirs;
use chrono::{DateTime, Local, Utc};
use rusqlite::{params, Connection, Result};
use std::path::{Path, PathBuf};

/// One finished game, as stored in the history ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    pub target: String,
    pub attempts_used: u32,
    pub won: bool,
    pub finished_at: DateTime<Local>,
}

/// SQLite-backed ledger of finished games. Opened best-effort at startup;
/// callers hold it as `Option<HistoryDb>` and gameplay proceeds without it.
#[derive(Debug)]
pub struct HistoryDb {
    conn: Connection,
}

impl HistoryDb {
    pub fn new() -> Result<Self> {
        let db_path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("wrdl_history.db"));
        Self::open(db_path)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                    Some(format!("Failed to create directory: {}", e)),
                )
            })?;
        }

        let conn = Connection::open(path)?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS games (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                target TEXT NOT NULL,
                attempts_used INTEGER NOT NULL,
                won BOOLEAN NOT NULL,
                finished_at TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            [],
        )?;

        Ok(HistoryDb { conn })
    }

    pub fn record_game(&self, record: &GameRecord) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO games (target, attempts_used, won, finished_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                record.target,
                record.attempts_used,
                record.won,
                // stored in UTC so the column is offset-uniform
                record.finished_at.with_timezone(&Utc).to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Most recently recorded first. Insertion order is the source of truth;
    /// timestamp strings are display data, not a sort key.
    pub fn recent_games(&self, limit: usize) -> Result<Vec<GameRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT target, attempts_used, won, finished_at
            FROM games
            ORDER BY id DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            let finished_at: String = row.get(3)?;
            Ok(GameRecord {
                target: row.get(0)?,
                attempts_used: row.get(1)?,
                won: row.get(2)?,
                finished_at: DateTime::parse_from_rfc3339(&finished_at)
                    .map(|dt| dt.with_timezone(&Local))
                    .unwrap_or_else(|_| Local::now()),
            })
        })?;

        rows.collect()
    }

    pub fn games_recorded(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM games", [], |row| row.get(0))
    }
}
