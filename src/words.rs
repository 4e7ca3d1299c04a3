use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::fmt;

static WORDS_DIR: Dir = include_dir!("src/words");

/// Embedded dictionary: answer candidates plus extra words that are legal
/// guesses but never chosen as targets.
#[derive(Deserialize, Clone, Debug)]
pub struct WordList {
    pub name: String,
    pub answers: Vec<String>,
    pub allowed: Vec<String>,
}

impl WordList {
    pub fn new(file_name: &str) -> Self {
        let file = WORDS_DIR
            .get_file(format!("{file_name}.json"))
            .expect("word list file not found");

        let contents = file
            .contents_utf8()
            .expect("unable to interpret word list as a string");

        let mut list: WordList =
            serde_json::from_str(contents).expect("unable to deserialize word list json");

        for w in list.answers.iter_mut().chain(list.allowed.iter_mut()) {
            *w = w.to_uppercase();
        }
        list
    }

    /// Pick a random target word from the answer pool.
    pub fn pick_target(&self) -> String {
        let mut rng = rand::thread_rng();
        self.answers
            .choose(&mut rng)
            .cloned()
            .unwrap_or_else(|| "CRANE".to_string())
    }

    pub fn contains(&self, word: &str) -> bool {
        let word = word.to_uppercase();
        self.answers.iter().any(|w| *w == word) || self.allowed.iter().any(|w| *w == word)
    }
}

/// Failure from a dictionary lookup. Recoverable: the caller surfaces a
/// transient message and reopens input without consuming the attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorError {
    pub message: String,
}

impl fmt::Display for ValidatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "word check failed: {}", self.message)
    }
}

impl std::error::Error for ValidatorError {}

/// Dictionary check. The production implementation is the embedded list;
/// a networked service would slot in behind the same trait.
pub trait WordValidator {
    fn is_valid(&self, word: &str) -> Result<bool, ValidatorError>;
}

/// Validator backed by the embedded word list.
pub struct ListValidator {
    list: WordList,
}

impl ListValidator {
    pub fn new(list: WordList) -> Self {
        Self { list }
    }
}

impl WordValidator for ListValidator {
    fn is_valid(&self, word: &str) -> Result<bool, ValidatorError> {
        Ok(self.list.contains(word))
    }
}
