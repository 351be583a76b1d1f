//! Login autostart registration.
//!
//! Registration is an XDG autostart desktop entry named after
//! [`APP_IDENTIFIER`] whose `Exec` line points at the current executable.
//! The entry is written to a temporary file and renamed into place, so a
//! change is either fully applied or not applied at all.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

/// Fixed identifier the autostart entry is keyed by.
pub const APP_IDENTIFIER: &str = "ClipboardWatcher";

/// Errors that can occur while changing the autostart registration.
#[derive(Debug, Error)]
pub enum AutostartError {
    /// No per-user configuration directory is known on this system.
    #[error("no user configuration directory available for autostart entries")]
    NoConfigDir,

    /// The path of the running executable could not be determined.
    #[error("cannot determine the current executable: {0}")]
    CurrentExe(#[source] io::Error),

    /// Reading or writing the autostart entry failed.
    #[error("autostart entry {path}: {source}")]
    Io {
        /// Path of the entry.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
}

/// Result type for autostart operations.
pub type Result<T> = std::result::Result<T, AutostartError>;

/// Manages the autostart entry for the watcher.
#[derive(Debug, Clone)]
pub struct Autostart {
    dir: PathBuf,
}

impl Autostart {
    /// Use the standard per-user autostart directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the user configuration directory is unknown.
    pub fn new() -> Result<Self> {
        let config = dirs::config_dir().ok_or(AutostartError::NoConfigDir)?;
        Ok(Self::with_dir(config.join("autostart")))
    }

    /// Keep autostart entries in `dir`.
    #[must_use]
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the autostart entry.
    #[must_use]
    pub fn entry_path(&self) -> PathBuf {
        self.dir.join(format!("{APP_IDENTIFIER}.desktop"))
    }

    /// Check if the watcher is registered to start at login.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.entry_path().is_file()
    }

    /// Register the current executable to start at login.
    ///
    /// # Errors
    ///
    /// Returns an error if the executable path is unknown or the entry
    /// cannot be written.
    pub fn enable(&self) -> Result<()> {
        let exe = std::env::current_exe().map_err(AutostartError::CurrentExe)?;
        self.enable_for(&exe)
    }

    /// Register `exe` to start at login.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be written.
    pub fn enable_for(&self, exe: &Path) -> Result<()> {
        let path = self.entry_path();
        let io_err = |source: io::Error| AutostartError::Io {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(io_err)?;

        let staging = self.dir.join(format!(".{APP_IDENTIFIER}.desktop.tmp"));
        fs::write(&staging, desktop_entry(exe)).map_err(io_err)?;
        fs::rename(&staging, &path).map_err(io_err)?;

        info!(path = %path.display(), exe = %exe.display(), "Registered autostart entry");
        Ok(())
    }

    /// Remove the autostart registration. Removing a missing entry is fine.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry exists but cannot be removed.
    pub fn disable(&self) -> Result<()> {
        let path = self.entry_path();
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(path = %path.display(), "Removed autostart entry");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No autostart entry to remove");
                Ok(())
            }
            Err(source) => Err(AutostartError::Io { path, source }),
        }
    }
}

fn desktop_entry(exe: &Path) -> String {
    format!(
        "[Desktop Entry]\n\
         Type=Application\n\
         Name={APP_IDENTIFIER}\n\
         Exec={}\n\
         X-GNOME-Autostart-enabled=true\n",
        exec_quote(&exe.to_string_lossy())
    )
}

/// Quote a path as one `Exec` argument.
///
/// Inside the quotes `"`, `` ` ``, `$` and `\` take a backslash. The value
/// then goes through string-value escaping, which doubles every backslash,
/// and `%` is doubled so it is not read as a field code.
fn exec_quote(arg: &str) -> String {
    let mut out = String::with_capacity(arg.len() + 2);
    out.push('"');
    for c in arg.chars() {
        match c {
            '"' | '`' | '$' => {
                out.push_str(r"\\");
                out.push(c);
            }
            '\\' => out.push_str(r"\\\\"),
            '%' => out.push_str("%%"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
