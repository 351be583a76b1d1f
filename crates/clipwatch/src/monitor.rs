//! The clipboard polling loop.
//!
//! Every tick the monitor sleeps for the current interval, then, unless
//! paused, reads the clipboard and runs it through the rule pipeline:
//!
//! 1. decode HTML entities
//! 2. mask the first matching NG word (write back)
//! 3. expand a short link (write back, notify)
//! 4. remap a leading URL prefix (write back, notify)
//!
//! Each step sees the clipboard text as the previous step left it. A step
//! that changes the text writes it to the clipboard straight away, so one
//! tick may write several times; a failed write leaves the next step on the
//! text the clipboard still holds. Nothing in a tick is fatal: failures are
//! logged and the loop carries on with the next sleep.
//!
//! There is no lock around clipboard I/O. Another application writing
//! between our read and write-back loses its change.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread::JoinHandle;

use clipwatch_desktop::SoundPlayer;
use tracing::{debug, error, info, trace, warn};

use crate::clipboard::ClipboardAccess;
use crate::error::Result;
use crate::expand::ShortLinkExpander;
use crate::normalize::normalize;
use crate::rules::RuleSet;
use crate::state::MonitorState;

/// Side effect triggered when the monitor rewrites the clipboard.
pub trait Notifier: Send + Sync {
    /// Signal that the clipboard was rewritten.
    fn notify(&self);
}

impl Notifier for SoundPlayer {
    fn notify(&self) {
        self.play();
    }
}

/// Notifier that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self) {
        debug!("Clipboard rewritten");
    }
}

/// A rule that rewrote the clipboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rewrite {
    /// An NG word was masked.
    Redacted,
    /// A short link was expanded.
    Expanded,
    /// A URL prefix was remapped.
    Remapped,
}

impl std::fmt::Display for Rewrite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Redacted => write!(f, "redacted"),
            Self::Expanded => write!(f, "expanded"),
            Self::Remapped => write!(f, "remapped"),
        }
    }
}

/// What one tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Monitoring is paused.
    Paused,
    /// The clipboard was empty or held no text.
    Empty,
    /// The clipboard could not be read.
    ReadFailed,
    /// The text went through the pipeline.
    Processed {
        /// Rewrites written back, in pipeline order.
        rewrites: Vec<Rewrite>,
    },
}

/// Polls the clipboard and applies the rewrite rules.
pub struct ClipboardMonitor<C> {
    clipboard: C,
    state: Arc<MonitorState>,
    rules: RuleSet,
    expander: ShortLinkExpander,
    notifier: Box<dyn Notifier>,
}

impl<C> std::fmt::Debug for ClipboardMonitor<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipboardMonitor")
            .field("state", &self.state)
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

impl<C: ClipboardAccess> ClipboardMonitor<C> {
    /// Create a monitor.
    pub fn new(
        clipboard: C,
        state: Arc<MonitorState>,
        rules: RuleSet,
        expander: ShortLinkExpander,
        notifier: impl Notifier + 'static,
    ) -> Self {
        Self {
            clipboard,
            state,
            rules,
            expander,
            notifier: Box::new(notifier),
        }
    }

    /// The clipboard this monitor works on.
    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    /// Run forever: sleep for the current interval, then tick.
    ///
    /// The interval is re-read before every sleep, so a change lands after
    /// the sleep already in progress.
    pub async fn run(&self) {
        info!(
            interval_secs = self.state.interval_seconds(),
            ng_words = self.rules.ng_words.len(),
            url_mappings = self.rules.url_mapping.len(),
            "Clipboard monitor started"
        );
        loop {
            tokio::time::sleep(self.state.poll_interval()).await;
            let outcome = self.tick().await;
            trace!(?outcome, "Tick finished");
        }
    }

    /// Run one pass of the pipeline without sleeping.
    pub async fn tick(&self) -> TickOutcome {
        if !self.state.is_active() {
            return TickOutcome::Paused;
        }

        let raw = match self.clipboard.read_text() {
            Ok(Some(text)) => text,
            Ok(None) => return TickOutcome::Empty,
            Err(e) => {
                warn!(error = %e, "Failed to read clipboard");
                return TickOutcome::ReadFailed;
            }
        };

        let mut text = normalize(&raw).into_owned();
        let mut rewrites = Vec::new();

        let (redacted, changed) = self.rules.redact(&text);
        // Later steps only see text that reached the clipboard
        if changed && self.write_back(&redacted, Rewrite::Redacted) {
            // Masking does not notify
            rewrites.push(Rewrite::Redacted);
            text = redacted;
        }

        if let Some(expanded) = self.expander.expand(&text).await {
            if self.write_back(&expanded, Rewrite::Expanded) {
                self.notifier.notify();
                rewrites.push(Rewrite::Expanded);
                text = expanded;
            }
        }

        let (remapped, changed) = self.rules.remap(&text);
        if changed && self.write_back(&remapped, Rewrite::Remapped) {
            self.notifier.notify();
            rewrites.push(Rewrite::Remapped);
        }

        TickOutcome::Processed { rewrites }
    }

    fn write_back(&self, text: &str, rewrite: Rewrite) -> bool {
        match self.clipboard.write_text(text) {
            Ok(()) => {
                debug!(%rewrite, len = text.len(), "Clipboard rewritten");
                true
            }
            Err(e) => {
                warn!(%rewrite, error = %e, "Failed to write clipboard");
                false
            }
        }
    }
}

/// Start a monitor on its own thread and leave it running.
///
/// `build` runs on the new thread, so the clipboard handle it creates never
/// crosses threads. The thread drives the monitor on a single-threaded
/// runtime and ends only with the process; the returned handle need not be
/// joined.
///
/// # Errors
///
/// Returns an error if the thread, its runtime, or the monitor itself
/// cannot be created.
pub fn spawn_detached<C, F>(build: F) -> Result<JoinHandle<()>>
where
    C: ClipboardAccess + 'static,
    F: FnOnce() -> Result<ClipboardMonitor<C>> + Send + 'static,
{
    let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<()>>(1);

    let handle = std::thread::Builder::new()
        .name("clipboard-monitor".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    let _ = ready_tx.send(Err(e.into()));
                    return;
                }
            };
            let monitor = match build() {
                Ok(monitor) => monitor,
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };
            let _ = ready_tx.send(Ok(()));
            runtime.block_on(monitor.run());
        })?;

    match ready_rx.recv() {
        Ok(Ok(())) => Ok(handle),
        Ok(Err(e)) => Err(e),
        Err(_) => {
            error!("Clipboard monitor thread exited during startup");
            Err(std::io::Error::other("clipboard monitor thread exited during startup").into())
        }
    }
}
