use crate::score::LetterStatus;
use crate::session::Attempt;
use crate::WORD_LENGTH;

/// Ticks between consecutive tile flips.
pub const TICKS_PER_TILE: u32 = 2;
/// Ticks to hold after the last tile before the terminal check may run.
pub const SETTLE_TICKS: u32 = 3;

/// Scripted reveal of one scored row, advanced by the event-loop tick.
///
/// Tiles flip left to right on a fixed budget, then the sequence holds for a
/// settle delay. The input gate stays closed for the whole duration, and the
/// session's terminal check runs only once `is_done` reports true, so win or
/// loss bookkeeping never races ahead of the visible board.
#[derive(Clone, Debug)]
pub struct RevealSequence {
    attempt: Attempt,
    row: usize,
    ticks: u32,
}

impl RevealSequence {
    pub fn new(row: usize, attempt: Attempt) -> Self {
        Self {
            attempt,
            row,
            ticks: 0,
        }
    }

    /// Total tick budget from start to gate-reopen.
    pub fn total_ticks() -> u32 {
        WORD_LENGTH as u32 * TICKS_PER_TILE + SETTLE_TICKS
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn attempt(&self) -> &Attempt {
        &self.attempt
    }

    pub fn on_tick(&mut self) {
        if !self.is_done() {
            self.ticks += 1;
        }
    }

    /// Number of tiles whose verdict is currently visible.
    pub fn revealed_tiles(&self) -> usize {
        ((self.ticks / TICKS_PER_TILE) as usize).min(WORD_LENGTH)
    }

    /// Verdict for a column, once its tile has flipped.
    pub fn status_at(&self, col: usize) -> Option<LetterStatus> {
        if col < self.revealed_tiles() {
            self.attempt.statuses.get(col).copied()
        } else {
            None
        }
    }

    pub fn is_done(&self) -> bool {
        self.ticks >= Self::total_ticks()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::score;

    fn sequence() -> RevealSequence {
        let attempt = Attempt {
            guess: "BRACE".to_string(),
            statuses: score("BRACE", "CRANE").to_vec(),
        };
        RevealSequence::new(0, attempt)
    }

    #[test]
    fn test_nothing_revealed_at_start() {
        let seq = sequence();
        assert_eq!(seq.revealed_tiles(), 0);
        assert_eq!(seq.status_at(0), None);
        assert!(!seq.is_done());
    }

    #[test]
    fn test_tiles_flip_in_order() {
        let mut seq = sequence();
        let mut last = 0;
        while !seq.is_done() {
            seq.on_tick();
            let now = seq.revealed_tiles();
            assert!(now == last || now == last + 1, "tiles must flip one at a time");
            last = now;
        }
        assert_eq!(seq.revealed_tiles(), WORD_LENGTH);
    }

    #[test]
    fn test_not_done_until_settle_elapses() {
        let mut seq = sequence();
        for _ in 0..WORD_LENGTH as u32 * TICKS_PER_TILE {
            seq.on_tick();
        }
        // all tiles visible, but the settle delay still holds the gate
        assert_eq!(seq.revealed_tiles(), WORD_LENGTH);
        assert!(!seq.is_done());

        for _ in 0..SETTLE_TICKS {
            seq.on_tick();
        }
        assert!(seq.is_done());
    }

    #[test]
    fn test_status_matches_scored_attempt() {
        let mut seq = sequence();
        for _ in 0..RevealSequence::total_ticks() {
            seq.on_tick();
        }
        for col in 0..WORD_LENGTH {
            assert_eq!(seq.status_at(col), seq.attempt().statuses.get(col).copied());
        }
    }

    #[test]
    fn test_ticks_saturate_after_done() {
        let mut seq = sequence();
        for _ in 0..RevealSequence::total_ticks() * 2 {
            seq.on_tick();
        }
        assert!(seq.is_done());
        assert_eq!(seq.revealed_tiles(), WORD_LENGTH);
    }
}
