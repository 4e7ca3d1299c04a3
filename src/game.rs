use crate::history::{GameRecord, HistoryDb};
use crate::reveal::RevealSequence;
use crate::score::{KeyHints, LetterStatus};
use crate::session::{Phase, Session};
use crate::snapshot::{KvStore, PersistenceBridge};
use crate::stats::{Stats, StatsLedger};
use crate::words::WordValidator;
use chrono::Local;
use crossterm::event::KeyCode;

/// Ticks a transient message stays on screen.
const MESSAGE_TICKS: u32 = 25;

/// The game driver: owns the session and serializes input against the
/// validate-score-reveal pipeline.
///
/// Two guards shape input handling. The terminal guard (session phase) drops
/// every key once the game is decided. The in-flight guard (`validating`)
/// closes the gate the moment a complete row is submitted and reopens it
/// either immediately, on a rejected word or a failed dictionary check, or
/// only after the reveal sequence has fully played out on an accepted one.
/// At most one submission is ever in flight.
pub struct Game<S: KvStore> {
    session: Session,
    hints: KeyHints,
    validating: bool,
    practice: bool,
    reveal: Option<RevealSequence>,
    validator: Option<Box<dyn WordValidator>>,
    stats: StatsLedger,
    bridge: PersistenceBridge<S>,
    history_db: Option<HistoryDb>,
    message: Option<(String, u32)>,
}

impl<S: KvStore> Game<S> {
    pub fn new(
        session: Session,
        restored: bool,
        validator: Option<Box<dyn WordValidator>>,
        stats: StatsLedger,
        bridge: PersistenceBridge<S>,
        history_db: Option<HistoryDb>,
    ) -> Self {
        let mut hints = KeyHints::new();
        for attempt in session.history() {
            hints.absorb(&attempt.guess, &attempt.statuses);
        }
        let mut game = Self {
            session,
            hints,
            validating: false,
            practice: false,
            reveal: None,
            validator,
            stats,
            bridge,
            history_db,
            message: None,
        };
        if restored {
            game.notify("Welcome back! Your session was restored.");
        }
        game
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn hints(&self) -> &KeyHints {
        &self.hints
    }

    pub fn stats(&self) -> Stats {
        self.stats.stats()
    }

    pub fn is_validating(&self) -> bool {
        self.validating
    }

    /// Mark this as a practice run against a fixed target. Outcomes stay off
    /// the stats ledger and history, and the snapshot pair of any saved real
    /// session is left untouched.
    pub fn mark_practice(&mut self) {
        self.practice = true;
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_ref().map(|(text, _)| text.as_str())
    }

    pub fn recent_games(&self, limit: usize) -> Vec<GameRecord> {
        self.history_db
            .as_ref()
            .and_then(|db| db.recent_games(limit).ok())
            .unwrap_or_default()
    }

    /// Title/message pair for the end-of-game banner.
    pub fn outcome(&self) -> Option<(String, String)> {
        match self.session.phase() {
            Phase::Won => Some((
                "You got it!".to_string(),
                format!(
                    "Solved in {}/{}",
                    self.session.history().len(),
                    crate::MAX_ATTEMPTS
                ),
            )),
            Phase::Lost => Some((
                "Out of tries".to_string(),
                format!("The word was {}", self.session.target()),
            )),
            _ => None,
        }
    }

    fn notify(&mut self, text: &str) {
        self.message = Some((text.to_string(), MESSAGE_TICKS));
    }

    /// Route one key press through the guards.
    pub fn handle_key(&mut self, code: KeyCode) {
        if self.session.is_terminal() {
            return;
        }
        if self.validating {
            // A submission is mid-flight: no second submit, no deleting a
            // tile that is being revealed, no stray letters.
            return;
        }
        match code {
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => self.session.delete_letter(),
            KeyCode::Char(c) => self.session.add_letter(c),
            _ => {}
        }
    }

    fn submit(&mut self) {
        let guess = match self.session.begin_submit() {
            Some(g) => g,
            None => {
                self.notify("Not enough letters");
                return;
            }
        };

        self.validating = true;
        let verdict = match &self.validator {
            Some(validator) => validator.is_valid(&guess),
            None => Ok(true),
        };

        match verdict {
            Ok(true) => {
                let row = self.session.attempt_index();
                match self.session.apply_scored() {
                    Some(attempt) => {
                        self.reveal = Some(RevealSequence::new(row, attempt));
                        // gate stays closed until the reveal settles
                    }
                    None => self.validating = false,
                }
            }
            Ok(false) => {
                self.session.reject_word();
                self.validating = false;
                self.notify("Not in word list");
            }
            Err(e) => {
                self.session.reject_word();
                self.validating = false;
                self.notify(&e.to_string());
            }
        }
    }

    /// Advance time: ages the transient message, steps the reveal, and runs
    /// the terminal check once the reveal has settled. Returns true when the
    /// tick touched something visible, so the event loop knows to redraw.
    /// The guard state is sampled at entry: the tick that settles a reveal
    /// or expires a message still reports a change.
    pub fn on_tick(&mut self) -> bool {
        let had_message = self.message.is_some();
        if let Some((_, ttl)) = &mut self.message {
            *ttl -= 1;
            if *ttl == 0 {
                self.message = None;
            }
        }

        let Some(reveal) = &mut self.reveal else {
            return had_message;
        };
        reveal.on_tick();
        if !reveal.is_done() {
            return true;
        }

        let attempt = reveal.attempt().clone();
        self.reveal = None;
        self.hints.absorb(&attempt.guess, &attempt.statuses);

        match self.session.settle_row() {
            Phase::Won => self.finish(true),
            Phase::Lost => self.finish(false),
            _ => {}
        }
        self.validating = false;
        true
    }

    fn finish(&mut self, won: bool) {
        if self.practice {
            return;
        }
        if won {
            self.stats.record_win();
        } else {
            self.stats.record_loss();
        }
        if let Some(db) = &self.history_db {
            let _ = db.record_game(&GameRecord {
                target: self.session.target().to_string(),
                attempts_used: self.session.history().len() as u32,
                won,
                finished_at: Local::now(),
            });
        }
        self.bridge.clear();
    }

    /// Board verdict for a cell: live reveal for the in-flight row, history
    /// for settled rows, nothing for unscored tiles.
    pub fn status_at(&self, row: usize, col: usize) -> Option<LetterStatus> {
        if let Some(reveal) = &self.reveal {
            if reveal.row() == row {
                return reveal.status_at(col);
            }
        }
        self.session
            .history()
            .get(row)
            .and_then(|a| a.statuses.get(col).copied())
    }

    /// Snapshot the session for a later resume. A submission that is still
    /// mid-flight is rolled back to its pre-submission state: the row keeps
    /// its letters, the attempt is not consumed.
    pub fn snapshot(&self) {
        if self.practice {
            return;
        }
        if self.validating {
            let history = self.session.history();
            let trimmed = history[..history.len().saturating_sub(1)].to_vec();
            if let Some(session) = Session::resume(
                self.session.target(),
                self.session.attempt_index(),
                self.session.current_row().to_vec(),
                trimmed,
            ) {
                let _ = self.bridge.save(&session);
            }
            return;
        }
        let _ = self.bridge.save(&self.session);
    }

    /// Explicit reset: brand-new session, fresh guards and hints. Clears the
    /// snapshot pair, except in practice mode where it belongs to the saved
    /// real session.
    pub fn reset(&mut self, target: &str) {
        self.session = Session::new(target);
        self.hints = KeyHints::new();
        self.validating = false;
        self.reveal = None;
        self.message = None;
        if !self.practice {
            self.bridge.clear();
        }
    }
}
