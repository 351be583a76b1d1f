//! Clipboard text normalization.

use std::borrow::Cow;

/// Decode HTML entities so rules see the text a user would read.
///
/// Named (`&lt;`, `&amp;`, ...) and numeric (`&#39;`, `&#x27;`) references
/// are decoded. Text without entities is returned borrowed.
#[must_use]
pub fn normalize(text: &str) -> Cow<'_, str> {
    html_escape::decode_html_entities(text)
}
