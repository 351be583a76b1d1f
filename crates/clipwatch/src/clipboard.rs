//! Clipboard access seam.
//!
//! The monitor and the control surface only see [`ClipboardAccess`]. The
//! desktop clipboard implements it for real use; [`MemoryClipboard`] backs
//! the `apply` dry run and tests.

use std::sync::{Arc, Mutex, PoisonError};

use clipwatch_desktop::SystemClipboard;

use crate::error::Result;

/// Text-only clipboard operations.
pub trait ClipboardAccess {
    /// Read the clipboard text. `None` means empty or non-text content.
    ///
    /// # Errors
    ///
    /// Returns an error if the clipboard cannot be read.
    fn read_text(&self) -> Result<Option<String>>;

    /// Replace the clipboard contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the clipboard cannot be written.
    fn write_text(&self, text: &str) -> Result<()>;
}

impl ClipboardAccess for SystemClipboard {
    fn read_text(&self) -> Result<Option<String>> {
        Ok(self.get_text())
    }

    fn write_text(&self, text: &str) -> Result<()> {
        Ok(self.set_text(text)?)
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    text: Option<String>,
    reads: usize,
    writes: Vec<String>,
}

/// In-process clipboard that records every write.
///
/// Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryClipboard {
    /// Create a clipboard holding `text`.
    #[must_use]
    pub fn with_text(text: impl Into<String>) -> Self {
        let clipboard = Self::default();
        clipboard.set(Some(text.into()));
        clipboard
    }

    /// Replace the contents without recording a write.
    pub fn set(&self, text: Option<String>) {
        self.lock().text = text;
    }

    /// Current contents.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        self.lock().text.clone()
    }

    /// Number of reads so far.
    #[must_use]
    pub fn reads(&self) -> usize {
        self.lock().reads
    }

    /// Every text written through [`ClipboardAccess::write_text`], in order.
    #[must_use]
    pub fn writes(&self) -> Vec<String> {
        self.lock().writes.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ClipboardAccess for MemoryClipboard {
    fn read_text(&self) -> Result<Option<String>> {
        let mut inner = self.lock();
        inner.reads += 1;
        Ok(inner.text.clone().filter(|t| !t.is_empty()))
    }

    fn write_text(&self, text: &str) -> Result<()> {
        let mut inner = self.lock();
        inner.text = Some(text.to_string());
        inner.writes.push(text.to_string());
        Ok(())
    }
}
