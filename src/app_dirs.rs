use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join("wrdl"),
            )
        } else {
            ProjectDirs::from("", "", "wrdl").map(|pd| pd.data_local_dir().to_path_buf())
        }
    }

    /// Game-history database location.
    pub fn db_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("history.db"))
    }

    /// Durable stats snapshot location.
    pub fn stats_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("stats.json"))
    }

    /// Directory for the session snapshot key-value store.
    pub fn snapshot_dir() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("session"))
    }
}
