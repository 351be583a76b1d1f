//! `clipwatch` - A background clipboard watcher
//!
//! This library provides the clipboard polling loop, the rewrite rules it
//! applies (NG-word masking, short-link expansion, URL domain remapping),
//! the JSON settings store and the control surface that pauses the loop and
//! changes its interval.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod clipboard;
pub mod config;
pub mod console;
pub mod control;
pub mod error;
pub mod expand;
pub mod logging;
pub mod monitor;
pub mod normalize;
pub mod rules;
pub mod state;

pub use clipboard::{ClipboardAccess, MemoryClipboard};
pub use config::{Config, ConfigStore};
pub use control::{ControlSurface, MenuAction, MenuItem};
pub use error::{Error, Result};
pub use expand::{HttpResolver, LinkResolver, ShortLinkExpander};
pub use logging::init_logging;
pub use monitor::{ClipboardMonitor, Notifier, SilentNotifier, TickOutcome};
pub use rules::{NgWordList, RuleSet, UrlMapping};
pub use state::MonitorState;
