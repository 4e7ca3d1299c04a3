use crate::score::{score, LetterStatus};
use crate::{MAX_ATTEMPTS, WORD_LENGTH};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Where the session is in its lifecycle. `Won` and `Lost` are terminal;
/// nothing leaves them except constructing a brand-new `Session`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Accepting letters and deletions on the active row.
    Filling,
    /// A complete row has been handed to the dictionary check.
    Submitting,
    /// Row scored and appended to history; awaiting the terminal check.
    RowComplete,
    Won,
    Lost,
}

/// One completed attempt: the guess and its per-letter verdicts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    pub guess: String,
    pub statuses: Vec<LetterStatus>,
}

/// Authoritative game state. The UI only projects this; it never feeds
/// state back in.
#[derive(Clone, Debug)]
pub struct Session {
    target: String,
    attempt_index: usize,
    row: Vec<char>,
    phase: Phase,
    history: Vec<Attempt>,
}

impl Session {
    pub fn new(target: &str) -> Self {
        let target = target.to_uppercase();
        debug_assert_eq!(target.len(), WORD_LENGTH);
        Self {
            target,
            attempt_index: 0,
            row: Vec::new(),
            phase: Phase::Filling,
            history: Vec::new(),
        }
    }

    /// Rebuild a non-terminal session from snapshot parts. Returns `None`
    /// when the parts are inconsistent; callers treat that as "no resumable
    /// session" rather than half-applying it.
    pub fn resume(
        target: &str,
        attempt_index: usize,
        row: Vec<char>,
        history: Vec<Attempt>,
    ) -> Option<Self> {
        let target = target.to_uppercase();
        if target.len() != WORD_LENGTH || !target.chars().all(|c| c.is_ascii_uppercase()) {
            return None;
        }
        if attempt_index != history.len() || attempt_index >= MAX_ATTEMPTS {
            return None;
        }
        if row.len() > WORD_LENGTH {
            return None;
        }
        let mut checked = Vec::with_capacity(history.len());
        for attempt in history {
            if attempt.guess.len() != WORD_LENGTH
                || !attempt.guess.chars().all(|c| c.is_ascii_uppercase())
            {
                return None;
            }
            if attempt.guess == target {
                // A matching guess in history means the session was terminal
                return None;
            }
            // Verdicts are recomputed rather than trusted, so a tampered
            // snapshot cannot smuggle statuses inconsistent with the target
            // into the keyboard hints or the share grid.
            let statuses = score(&attempt.guess, &target).to_vec();
            checked.push(Attempt {
                guess: attempt.guess,
                statuses,
            });
        }
        Some(Self {
            target,
            attempt_index,
            row,
            phase: Phase::Filling,
            history: checked,
        })
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, Phase::Won | Phase::Lost)
    }

    pub fn attempt_index(&self) -> usize {
        self.attempt_index
    }

    pub fn cursor_index(&self) -> usize {
        self.row.len()
    }

    pub fn current_row(&self) -> &[char] {
        &self.row
    }

    pub fn history(&self) -> &[Attempt] {
        &self.history
    }

    /// True once at least one letter has been entered or scored.
    pub fn has_started(&self) -> bool {
        !self.row.is_empty() || !self.history.is_empty()
    }

    /// Append a letter to the active row. No-op outside `Filling` or when
    /// the row is already full.
    pub fn add_letter(&mut self, c: char) {
        if self.phase != Phase::Filling || self.row.len() == WORD_LENGTH {
            return;
        }
        if c.is_ascii_alphabetic() {
            self.row.push(c.to_ascii_uppercase());
        }
    }

    /// Remove the last letter of the active row. No-op outside `Filling` or
    /// on an empty row.
    pub fn delete_letter(&mut self) {
        if self.phase != Phase::Filling {
            return;
        }
        self.row.pop();
    }

    /// Hand the completed row off for validation. Returns the guess, or
    /// `None` when the row is incomplete or the session is not `Filling`.
    pub fn begin_submit(&mut self) -> Option<String> {
        if self.phase != Phase::Filling || self.row.len() != WORD_LENGTH {
            return None;
        }
        self.phase = Phase::Submitting;
        Some(self.row.iter().collect())
    }

    /// Dictionary rejected the word (or the check failed). The attempt is
    /// not consumed: cursor and history stay untouched.
    pub fn reject_word(&mut self) {
        if self.phase == Phase::Submitting {
            self.phase = Phase::Filling;
        }
    }

    /// Dictionary accepted the word: score it and append to history.
    /// Returns the scored attempt for the reveal sequence.
    pub fn apply_scored(&mut self) -> Option<Attempt> {
        if self.phase != Phase::Submitting {
            return None;
        }
        let guess: String = self.row.iter().collect();
        let statuses = score(&guess, &self.target).to_vec();
        let attempt = Attempt { guess, statuses };
        self.history.push(attempt.clone());
        self.phase = Phase::RowComplete;
        Some(attempt)
    }

    /// Terminal check, run strictly after the reveal completes. Either ends
    /// the session or advances to the next row.
    pub fn settle_row(&mut self) -> Phase {
        if self.phase != Phase::RowComplete {
            return self.phase;
        }
        let matched = self
            .history
            .last()
            .map(|a| a.guess == self.target)
            .unwrap_or(false);

        if matched {
            self.phase = Phase::Won;
        } else if self.attempt_index == MAX_ATTEMPTS - 1 {
            self.phase = Phase::Lost;
        } else {
            self.attempt_index += 1;
            self.row.clear();
            self.phase = Phase::Filling;
        }
        self.phase
    }

    /// Letter occupying a board cell, from history for settled rows or the
    /// live row for the active one.
    pub fn letter_at(&self, row: usize, col: usize) -> Option<char> {
        if let Some(attempt) = self.history.get(row) {
            return attempt.guess.chars().nth(col);
        }
        if row == self.attempt_index {
            return self.row.get(col).copied();
        }
        None
    }

    /// Colored-square summary of the finished board, one line per attempt.
    pub fn share_grid(&self) -> String {
        self.history
            .iter()
            .map(|attempt| {
                attempt
                    .statuses
                    .iter()
                    .map(|s| match s {
                        LetterStatus::Correct => '\u{1F7E9}', // green square
                        LetterStatus::Present => '\u{1F7E8}', // yellow square
                        LetterStatus::Absent => '\u{2B1B}',   // black square
                    })
                    .collect::<String>()
            })
            .join("\n")
    }
}
