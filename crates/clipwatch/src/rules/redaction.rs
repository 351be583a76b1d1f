//! NG-word redaction.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Replacement written over every occurrence of a matched NG word.
pub const MASK: &str = "*****";

/// Ordered list of forbidden substrings.
///
/// Order is precedence: the first word in the list that occurs in the text
/// is the one that gets masked, regardless of where it appears in the text.
/// Empty strings are dropped on construction since they would match
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct NgWordList {
    words: Vec<String>,
}

impl NgWordList {
    /// Build a list, dropping empty entries.
    #[must_use]
    pub fn new(words: Vec<String>) -> Self {
        let before = words.len();
        let words: Vec<String> = words.into_iter().filter(|w| !w.is_empty()).collect();
        if words.len() != before {
            warn!(dropped = before - words.len(), "Ignoring empty NG words");
        }
        Self { words }
    }

    /// The words in precedence order.
    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Number of words.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// First word, in list order, that occurs in `text`.
    #[must_use]
    pub fn first_match(&self, text: &str) -> Option<&str> {
        self.words
            .iter()
            .find(|word| text.contains(word.as_str()))
            .map(String::as_str)
    }
}

impl From<Vec<String>> for NgWordList {
    fn from(words: Vec<String>) -> Self {
        Self::new(words)
    }
}

impl From<NgWordList> for Vec<String> {
    fn from(list: NgWordList) -> Self {
        list.words
    }
}

/// Mask the first matching NG word in `text`.
///
/// Every occurrence of that one word is replaced with [`MASK`]; other NG
/// words are left alone even if present. Returns the resulting text and
/// whether anything changed.
#[must_use]
pub fn redact(text: &str, words: &NgWordList) -> (String, bool) {
    match words.first_match(text) {
        Some(word) => {
            debug!(word_len = word.len(), "NG word found, masking");
            (text.replace(word, MASK), true)
        }
        None => (text.to_string(), false),
    }
}
