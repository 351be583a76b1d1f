//! System clipboard access.
//!
//! A thin wrapper over `clipboard-rs` that only deals in text. Non-text
//! clipboard contents are reported as "no text" rather than as an error,
//! so callers can treat them like an empty clipboard.

use clipboard_rs::{Clipboard, ClipboardContext};
use thiserror::Error;
use tracing::trace;

/// Errors that can occur while talking to the system clipboard.
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// Failed to open the clipboard.
    #[error("clipboard access failed: {0}")]
    AccessFailed(String),

    /// Failed to write text to the clipboard.
    #[error("clipboard write failed: {0}")]
    WriteFailed(String),
}

/// Result type for clipboard operations.
pub type Result<T> = std::result::Result<T, ClipboardError>;

/// Handle on the system clipboard.
///
/// The underlying context keeps serving written selections for as long as
/// it lives, so a watcher should hold one instance for its whole run.
pub struct SystemClipboard {
    ctx: ClipboardContext,
}

impl std::fmt::Debug for SystemClipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemClipboard").finish_non_exhaustive()
    }
}

impl SystemClipboard {
    /// Open the system clipboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform clipboard cannot be opened.
    pub fn new() -> Result<Self> {
        let ctx =
            ClipboardContext::new().map_err(|e| ClipboardError::AccessFailed(e.to_string()))?;
        Ok(Self { ctx })
    }

    /// Get the current clipboard text.
    ///
    /// Returns `None` when the clipboard is empty or holds non-text content.
    #[must_use]
    pub fn get_text(&self) -> Option<String> {
        match self.ctx.get_text() {
            Ok(text) if !text.is_empty() => Some(text),
            Ok(_) => None,
            Err(e) => {
                // Non-text clipboard content surfaces as an error here
                trace!(error = %e, "No text on clipboard");
                None
            }
        }
    }

    /// Replace the clipboard contents with `text`.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform rejects the write.
    pub fn set_text(&self, text: &str) -> Result<()> {
        self.ctx
            .set_text(text.to_string())
            .map_err(|e| ClipboardError::WriteFailed(e.to_string()))
    }
}
