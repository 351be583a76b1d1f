//! Error types for clipwatch.
//!
//! Everything that can fail outside the polling loop surfaces as [`Error`].
//! Inside the loop, failures are logged and the tick moves on.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for clipwatch operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// A poll interval that is not positive or too large for a `Duration`.
    #[error("invalid poll interval {0}: must be a positive number of seconds within range")]
    InvalidInterval(f64),

    /// A settings file could not be read or written.
    #[error("failed to access settings file {path}: {source}")]
    SettingsFile {
        /// Path of the settings file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A settings file holds malformed JSON.
    #[error("malformed settings file {path}: {source}")]
    SettingsParse {
        /// Path of the settings file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    // === Platform Errors ===
    /// The system clipboard could not be used.
    #[error("clipboard error: {0}")]
    Clipboard(String),

    /// Autostart registration failed.
    #[error("autostart error: {0}")]
    Autostart(#[from] clipwatch_desktop::AutostartError),

    /// The HTTP client for short-link resolution could not be built.
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// QR rendering failed.
    #[error("QR error: {0}")]
    Qr(#[from] clipwatch_desktop::QrRenderError),

    // === I/O Errors ===
    /// File system or terminal operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for clipwatch operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl From<clipwatch_desktop::ClipboardError> for Error {
    fn from(err: clipwatch_desktop::ClipboardError) -> Self {
        Self::Clipboard(err.to_string())
    }
}

impl Error {
    /// Create a new clipboard error.
    #[must_use]
    pub fn clipboard(message: impl Into<String>) -> Self {
        Self::Clipboard(message.into())
    }

    /// Check if this error came from a malformed settings file.
    #[must_use]
    pub fn is_malformed_settings(&self) -> bool {
        matches!(self, Self::SettingsParse { .. } | Self::ConfigLoad(_))
    }
}
