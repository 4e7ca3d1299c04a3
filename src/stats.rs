use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Cumulative play statistics, mutated only at session-terminal transitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub games_played: u32,
    pub games_won: u32,
    pub current_streak: u32,
    pub max_streak: u32,
}

impl Stats {
    pub fn record_win(&mut self) {
        self.games_played += 1;
        self.games_won += 1;
        self.current_streak += 1;
        self.max_streak = self.max_streak.max(self.current_streak);
    }

    pub fn record_loss(&mut self) {
        self.games_played += 1;
        self.current_streak = 0;
    }

    /// Derived, never stored: keeps the rate from drifting out of sync with
    /// the underlying counts.
    pub fn win_rate(&self) -> u32 {
        if self.games_played == 0 {
            return 0;
        }
        ((100.0 * self.games_won as f64) / self.games_played as f64).round() as u32
    }
}

/// Remote profile store (cloud leaderboard backend). Optional collaborator:
/// absence is configuration, and failure never blocks gameplay.
pub trait RemoteStatsStore {
    fn load(&self) -> Option<Stats>;
    fn save(&self, stats: &Stats) -> std::io::Result<()>;
}

/// Durable local stats snapshot, one JSON file under the state dir.
#[derive(Debug, Clone)]
pub struct FileStatsStore {
    path: PathBuf,
}

impl FileStatsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self) -> Option<Stats> {
        let bytes = fs::read(&self.path).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    pub fn save(&self, stats: &Stats) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(stats).unwrap_or_default();
        fs::write(&self.path, data)
    }
}

/// Stats plus their persistence: local snapshot written unconditionally on
/// every mutation, remote write best-effort afterwards.
pub struct StatsLedger {
    stats: Stats,
    local: FileStatsStore,
    remote: Option<Box<dyn RemoteStatsStore>>,
}

impl StatsLedger {
    /// Load order: remote store preferred, local snapshot fallback, defaults
    /// when neither has anything.
    pub fn load(local: FileStatsStore, remote: Option<Box<dyn RemoteStatsStore>>) -> Self {
        let stats = remote
            .as_ref()
            .and_then(|r| r.load())
            .or_else(|| local.load())
            .unwrap_or_default();
        Self {
            stats,
            local,
            remote,
        }
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn record_win(&mut self) {
        self.stats.record_win();
        self.persist();
    }

    pub fn record_loss(&mut self) {
        self.stats.record_loss();
        self.persist();
    }

    fn persist(&self) {
        // Local failure must not crash the terminal sequence; remote failure
        // must not roll back the local write.
        let _ = self.local.save(&self.stats);
        if let Some(remote) = &self.remote {
            let _ = remote.save(&self.stats);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::tempdir;

    #[test]
    fn test_win_updates_counts_and_streaks() {
        let mut stats = Stats::default();
        stats.record_win();
        stats.record_win();

        assert_eq!(stats.games_played, 2);
        assert_eq!(stats.games_won, 2);
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.max_streak, 2);
    }

    #[test]
    fn test_loss_resets_streak_but_not_max() {
        let mut stats = Stats::default();
        stats.record_win();
        stats.record_win();
        stats.record_loss();

        assert_eq!(stats.games_played, 3);
        assert_eq!(stats.games_won, 2);
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.max_streak, 2);

        stats.record_win();
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.max_streak, 2);
    }

    #[test]
    fn test_win_rate_is_derived() {
        let mut stats = Stats::default();
        assert_eq!(stats.win_rate(), 0);

        stats.record_win();
        stats.record_win();
        stats.record_loss();
        assert_eq!(stats.win_rate(), 67);
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempdir().unwrap();
        let store = FileStatsStore::with_path(dir.path().join("stats.json"));

        assert_eq!(store.load(), None);

        let mut stats = Stats::default();
        stats.record_win();
        store.save(&stats).unwrap();
        assert_eq!(store.load(), Some(stats));
    }

    #[test]
    fn test_file_store_tolerates_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stats.json");
        std::fs::write(&path, b"not json").unwrap();
        assert_eq!(FileStatsStore::with_path(&path).load(), None);
    }

    struct FakeRemote {
        seed: Option<Stats>,
        saved: Rc<RefCell<Vec<Stats>>>,
        fail_saves: bool,
    }

    impl RemoteStatsStore for FakeRemote {
        fn load(&self) -> Option<Stats> {
            self.seed
        }

        fn save(&self, stats: &Stats) -> std::io::Result<()> {
            if self.fail_saves {
                return Err(std::io::Error::other("remote down"));
            }
            self.saved.borrow_mut().push(*stats);
            Ok(())
        }
    }

    #[test]
    fn test_ledger_prefers_remote_on_load() {
        let dir = tempdir().unwrap();
        let local = FileStatsStore::with_path(dir.path().join("stats.json"));
        let mut seeded = Stats::default();
        seeded.record_win();
        local.save(&Stats::default()).unwrap();

        let remote = FakeRemote {
            seed: Some(seeded),
            saved: Rc::new(RefCell::new(Vec::new())),
            fail_saves: false,
        };
        let ledger = StatsLedger::load(local, Some(Box::new(remote)));
        assert_eq!(ledger.stats(), seeded);
    }

    #[test]
    fn test_ledger_falls_back_to_local() {
        let dir = tempdir().unwrap();
        let local = FileStatsStore::with_path(dir.path().join("stats.json"));
        let mut seeded = Stats::default();
        seeded.record_loss();
        local.save(&seeded).unwrap();

        let ledger = StatsLedger::load(local, None);
        assert_eq!(ledger.stats(), seeded);
    }

    #[test]
    fn test_remote_failure_does_not_block_local_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stats.json");
        let local = FileStatsStore::with_path(&path);
        let remote = FakeRemote {
            seed: None,
            saved: Rc::new(RefCell::new(Vec::new())),
            fail_saves: true,
        };

        let mut ledger = StatsLedger::load(local, Some(Box::new(remote)));
        ledger.record_win();

        let on_disk = FileStatsStore::with_path(&path).load().unwrap();
        assert_eq!(on_disk.games_won, 1);
        assert_eq!(ledger.stats().games_won, 1);
    }

    #[test]
    fn test_mutations_reach_both_stores() {
        let dir = tempdir().unwrap();
        let saved = Rc::new(RefCell::new(Vec::new()));
        let remote = FakeRemote {
            seed: None,
            saved: saved.clone(),
            fail_saves: false,
        };
        let local = FileStatsStore::with_path(dir.path().join("stats.json"));

        let mut ledger = StatsLedger::load(local, Some(Box::new(remote)));
        ledger.record_win();
        ledger.record_loss();

        assert_eq!(saved.borrow().len(), 2);
        assert_eq!(saved.borrow().last().unwrap().games_played, 2);
    }
}
