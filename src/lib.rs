// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod config;
pub mod game;
pub mod history;
pub mod reveal;
pub mod runtime;
pub mod score;
pub mod session;
pub mod snapshot;
pub mod stats;
pub mod words;

/// Letters per guess.
pub const WORD_LENGTH: usize = 5;
/// Rows on the board.
pub const MAX_ATTEMPTS: usize = 6;
pub const TICK_RATE_MS: u64 = 100;
