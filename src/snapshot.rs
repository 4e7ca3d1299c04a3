use crate::session::{Attempt, Session};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Key holding the serialized session snapshot.
pub const SNAPSHOT_KEY: &str = "session-snapshot";
/// Key holding the active-session marker, kept separate so a partial clear
/// is detectable.
pub const ACTIVE_KEY: &str = "active-session";

/// Local durable key-value storage used for session snapshots.
pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> std::io::Result<()>;
    fn remove(&self, key: &str) -> std::io::Result<()>;
}

/// File-per-key store under a directory, values as UTF-8.
#[derive(Debug, Clone)]
pub struct FileKvStore {
    dir: PathBuf,
}

impl FileKvStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn with_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)
    }

    fn remove(&self, key: &str) -> std::io::Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

/// Serializable projection of a `Session`, written before interruption
/// boundaries and consulted once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub timestamp: DateTime<Local>,
    pub active: bool,
    pub target_word: String,
    pub attempt_index: usize,
    pub cursor_index: usize,
    pub terminal: bool,
    pub row: String,
    pub history: Vec<Attempt>,
}

impl SessionSnapshot {
    pub fn of(session: &Session) -> Self {
        Self {
            timestamp: Local::now(),
            active: true,
            target_word: session.target().to_string(),
            attempt_index: session.attempt_index(),
            cursor_index: session.cursor_index(),
            terminal: session.is_terminal(),
            row: session.current_row().iter().collect(),
            history: session.history().to_vec(),
        }
    }
}

/// Makes an in-progress session survive a quit or suspend. Marker and
/// snapshot live under distinct keys and are always cleared together; the
/// restore path treats any partial or malformed pair as "no resumable
/// session" and wipes what remains.
pub struct PersistenceBridge<S: KvStore> {
    store: S,
}

impl<S: KvStore> PersistenceBridge<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Snapshot the session. No-op for untouched or terminal sessions, so a
    /// finished game never masquerades as resumable.
    pub fn save(&self, session: &Session) -> std::io::Result<()> {
        if !session.has_started() || session.is_terminal() {
            return Ok(());
        }
        let snapshot = SessionSnapshot::of(session);
        let json = serde_json::to_string(&snapshot).unwrap_or_default();
        self.store.set(SNAPSHOT_KEY, &json)?;
        self.store.set(ACTIVE_KEY, "true")
    }

    /// Attempt to resume. Fails closed: anything inconsistent clears both
    /// keys and yields `None`.
    pub fn restore(&self) -> Option<Session> {
        let marker = self.store.get(ACTIVE_KEY);
        let raw = self.store.get(SNAPSHOT_KEY);

        let (marker, raw) = match (marker, raw) {
            (Some(m), Some(r)) => (m, r),
            (None, None) => return None,
            // Half a pair is an inconsistent state; wipe the remainder.
            _ => {
                self.clear();
                return None;
            }
        };

        if marker.trim() != "true" {
            self.clear();
            return None;
        }

        let snapshot: SessionSnapshot = match serde_json::from_str(&raw) {
            Ok(s) => s,
            Err(_) => {
                self.clear();
                return None;
            }
        };

        if !snapshot.active
            || snapshot.terminal
            || snapshot.cursor_index != snapshot.row.len()
        {
            self.clear();
            return None;
        }

        let session = Session::resume(
            &snapshot.target_word,
            snapshot.attempt_index,
            snapshot.row.chars().collect(),
            snapshot.history,
        );
        if session.is_none() {
            self.clear();
        }
        session
    }

    /// Remove marker and snapshot together. Called at terminal transitions
    /// and explicit resets.
    pub fn clear(&self) {
        let _ = self.store.remove(SNAPSHOT_KEY);
        let _ = self.store.remove(ACTIVE_KEY);
    }
}
