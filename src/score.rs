use crate::WORD_LENGTH;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-tile verdict for one letter of a scored guess.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LetterStatus {
    /// Letter does not appear in the target (or all its occurrences are spoken for).
    Absent,
    /// Letter appears in the target at a different position.
    Present,
    /// Letter matches the target at this position.
    Correct,
}

/// Scores a guess against the target word.
///
/// Two passes: exact matches first, each consuming its target letter, then
/// wrong-position matches drawing from the remaining pool. A repeated guess
/// letter only earns as many marks as the target has unconsumed occurrences,
/// so duplicates are never over-credited.
pub fn score(guess: &str, target: &str) -> [LetterStatus; WORD_LENGTH] {
    debug_assert_eq!(guess.len(), WORD_LENGTH);
    debug_assert_eq!(target.len(), WORD_LENGTH);

    let guess: Vec<char> = guess.chars().collect();
    let target: Vec<char> = target.chars().collect();

    let mut statuses = [LetterStatus::Absent; WORD_LENGTH];
    let mut consumed = [false; WORD_LENGTH];

    for i in 0..WORD_LENGTH {
        if guess[i] == target[i] {
            statuses[i] = LetterStatus::Correct;
            consumed[i] = true;
        }
    }

    for i in 0..WORD_LENGTH {
        if statuses[i] == LetterStatus::Correct {
            continue;
        }
        for j in 0..WORD_LENGTH {
            if !consumed[j] && target[j] == guess[i] {
                statuses[i] = LetterStatus::Present;
                consumed[j] = true;
                break;
            }
        }
    }

    statuses
}

/// Aggregate per-key status across all scored guesses, for the on-screen
/// keyboard. A key only ever upgrades (absent -> present -> correct); the
/// derived `Ord` on `LetterStatus` encodes that ordering.
#[derive(Clone, Debug, Default)]
pub struct KeyHints {
    hints: HashMap<char, LetterStatus>,
}

impl KeyHints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn absorb(&mut self, guess: &str, statuses: &[LetterStatus]) {
        for (c, &status) in guess.chars().zip(statuses.iter()) {
            let entry = self.hints.entry(c).or_insert(status);
            if status > *entry {
                *entry = status;
            }
        }
    }

    pub fn get(&self, key: char) -> Option<LetterStatus> {
        self.hints.get(&key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marks(guess: &str, target: &str) -> Vec<LetterStatus> {
        score(guess, target).to_vec()
    }

    #[test]
    fn test_all_correct() {
        assert_eq!(marks("CRANE", "CRANE"), vec![LetterStatus::Correct; 5]);
    }

    #[test]
    fn test_all_absent() {
        assert_eq!(marks("PUDGY", "CRANE"), vec![LetterStatus::Absent; 5]);
    }

    #[test]
    fn test_present_letters() {
        use LetterStatus::*;
        // E and A both occur in CRANE, elsewhere
        assert_eq!(marks("EARLS", "CRANE"), vec![Present, Present, Present, Absent, Absent]);
    }

    #[test]
    fn test_duplicate_guess_letter_single_target_occurrence() {
        use LetterStatus::*;
        // Target has one E, exact-matched at the end; the leading E's must
        // not be credited out of an exhausted pool
        assert_eq!(marks("EERIE", "CRANE"), vec![Absent, Absent, Present, Absent, Correct]);
    }

    #[test]
    fn test_duplicate_consumption_against_double_target() {
        use LetterStatus::*;
        // Target ABABA: three A's, two B's. Walked by hand:
        //   guess AABBB vs target ABABA
        //   pass1: pos0 A==A correct (consume t0), pos3 B==B correct (consume t3)
        //   pass2: pos1 A -> pool has A at t2,t4 -> present (consume t2)
        //          pos2 B -> pool has B at t1 -> present (consume t1)
        //          pos4 B -> pool exhausted of B -> absent
        assert_eq!(
            marks("AABBB", "ABABA"),
            vec![Correct, Present, Present, Correct, Absent]
        );
    }

    #[test]
    fn test_correct_consumes_before_present() {
        use LetterStatus::*;
        // Target SHEEP has two E's and no exact match anywhere in ERASE:
        // E at pos0 -> present (consume t2), S at pos3 -> present (t0),
        // E at pos4 -> present (consume t3).
        assert_eq!(
            marks("ERASE", "SHEEP"),
            vec![Present, Absent, Absent, Present, Present]
        );
    }

    #[test]
    fn test_exact_match_reserves_pool_slot() {
        use LetterStatus::*;
        // Target ABBEY, guess BABES: second B exact-matches, first B takes the
        // remaining B; E present; S absent.
        assert_eq!(
            marks("BABES", "ABBEY"),
            vec![Present, Present, Correct, Correct, Absent]
        );
    }

    #[test]
    fn test_marks_never_exceed_target_occurrences() {
        let targets = ["CRANE", "ABABA", "SHEEP", "ABBEY", "LLAMA"];
        let guesses = ["AABBB", "EEEEE", "ABABA", "LLLLL", "CRANE"];
        for target in targets {
            for guess in guesses {
                let statuses = score(guess, target);
                for letter in 'A'..='Z' {
                    let credited = guess
                        .chars()
                        .zip(statuses.iter())
                        .filter(|(c, s)| *c == letter && **s != LetterStatus::Absent)
                        .count();
                    let available = target.chars().filter(|c| *c == letter).count();
                    assert!(
                        credited <= available,
                        "{guess} vs {target}: letter {letter} credited {credited} > {available}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_key_hints_upgrade_monotonically() {
        let mut hints = KeyHints::new();
        hints.absorb("CRANE", &score("CRANE", "BRACE"));
        assert_eq!(hints.get('C'), Some(LetterStatus::Present));
        assert_eq!(hints.get('R'), Some(LetterStatus::Correct));

        // C becomes correct in a later guess and must stay correct afterwards
        hints.absorb("BRACE", &score("BRACE", "BRACE"));
        assert_eq!(hints.get('C'), Some(LetterStatus::Correct));

        hints.absorb("CLAMP", &score("CLAMP", "BRACE"));
        assert_eq!(hints.get('C'), Some(LetterStatus::Correct));
        assert_eq!(hints.get('P'), Some(LetterStatus::Absent));
    }

    #[test]
    fn test_key_hints_unseen_key() {
        let hints = KeyHints::new();
        assert_eq!(hints.get('Q'), None);
    }
}
