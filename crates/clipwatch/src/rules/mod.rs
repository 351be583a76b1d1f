//! Text rewrite rules.
//!
//! Two ordered-list scanners with early exit:
//!
//! - **Redaction** masks the first configured NG word found in the text.
//! - **Remap** rewrites a leading source URL prefix to its destination.
//!
//! Both are pure functions of `(text, rules)` returning the new text and a
//! change flag. Writing results back to the clipboard is the monitor's job.

mod redaction;
mod remap;

pub use redaction::{redact, NgWordList, MASK};
pub use remap::{remap, UrlMapping};

/// The rule tables loaded at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    /// Words to mask.
    pub ng_words: NgWordList,
    /// URL prefixes to rewrite.
    pub url_mapping: UrlMapping,
}

impl RuleSet {
    /// Bundle the rule tables.
    #[must_use]
    pub fn new(ng_words: NgWordList, url_mapping: UrlMapping) -> Self {
        Self {
            ng_words,
            url_mapping,
        }
    }

    /// Apply the NG-word rule.
    #[must_use]
    pub fn redact(&self, text: &str) -> (String, bool) {
        redact(text, &self.ng_words)
    }

    /// Apply the URL remap rule.
    #[must_use]
    pub fn remap(&self, text: &str) -> (String, bool) {
        remap(text, &self.url_mapping)
    }
}
