//! Desktop integrations for clipwatch.
//!
//! This crate wraps the platform facilities the clipboard watcher talks to:
//! the system clipboard, the notification sound, the login autostart entry,
//! and QR code rendering for the terminal.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod autostart;
pub mod clipboard;
pub mod qr;
pub mod sound;

pub use autostart::{Autostart, AutostartError, APP_IDENTIFIER};
pub use clipboard::{ClipboardError, SystemClipboard};
pub use qr::{render_qr, QrRenderError};
pub use sound::{SoundPlayer, NOTIFICATION_SOUND_FILE};

/// Get the platform name.
#[must_use]
pub fn platform_name() -> &'static str {
    if cfg!(target_os = "macos") {
        "macOS"
    } else if cfg!(target_os = "windows") {
        "Windows"
    } else if cfg!(target_os = "linux") {
        "Linux"
    } else {
        "unknown"
    }
}
