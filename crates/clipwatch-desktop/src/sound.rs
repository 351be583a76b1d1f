//! Notification sound playback.
//!
//! Playback is fire-and-forget on a short-lived thread so the caller never
//! waits for the clip to finish. A missing asset is not an error: it is
//! logged and the notification is skipped.

use std::path::{Path, PathBuf};

use tracing::warn;

/// File name of the bundled notification sound.
pub const NOTIFICATION_SOUND_FILE: &str = "notification_sound.wav";

/// Plays the notification sound.
#[derive(Debug, Clone)]
pub struct SoundPlayer {
    path: PathBuf,
}

impl SoundPlayer {
    /// Create a player for the sound at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Locate the notification sound.
    ///
    /// Looks next to the running executable first, then in `fallback_dir`.
    /// When neither has the file, the executable-relative path is kept so
    /// the warning at play time names where the asset was expected.
    #[must_use]
    pub fn locate(fallback_dir: &Path) -> Self {
        let beside_exe = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(NOTIFICATION_SOUND_FILE)));

        if let Some(path) = beside_exe.as_ref().filter(|p| p.exists()) {
            return Self::new(path.clone());
        }

        let in_data_dir = fallback_dir.join(NOTIFICATION_SOUND_FILE);
        if in_data_dir.exists() {
            return Self::new(in_data_dir);
        }

        Self::new(beside_exe.unwrap_or(in_data_dir))
    }

    /// Path of the sound asset.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the sound asset exists.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.path.exists()
    }

    /// Play the sound, returning immediately.
    ///
    /// Returns `false` if the asset is missing and nothing was played.
    pub fn play(&self) -> bool {
        if !self.is_available() {
            warn!(path = %self.path.display(), "Notification sound not found");
            return false;
        }
        play_file(&self.path);
        true
    }
}

#[cfg(feature = "sound")]
fn play_file(path: &Path) {
    use std::fs::File;
    use std::io::BufReader;

    let path = path.to_path_buf();
    let spawned = std::thread::Builder::new()
        .name("notification-sound".to_string())
        .spawn(move || {
            let Ok((_stream, handle)) = rodio::OutputStream::try_default() else {
                warn!("No audio output device available");
                return;
            };
            let sink = match rodio::Sink::try_new(&handle) {
                Ok(sink) => sink,
                Err(e) => {
                    warn!(error = %e, "Failed to create audio sink");
                    return;
                }
            };
            let source = match File::open(&path)
                .map_err(|e| e.to_string())
                .and_then(|f| rodio::Decoder::new(BufReader::new(f)).map_err(|e| e.to_string()))
            {
                Ok(source) => source,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to decode notification sound");
                    return;
                }
            };
            sink.append(source);
            sink.sleep_until_end();
        });

    if let Err(e) = spawned {
        warn!(error = %e, "Failed to start sound thread");
    }
}

#[cfg(not(feature = "sound"))]
fn play_file(path: &Path) {
    tracing::debug!(path = %path.display(), "Sound support not compiled in, skipping playback");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_sound_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let player = SoundPlayer::new(dir.path().join("missing.wav"));

        assert!(!player.is_available());
        assert!(!player.play());
    }

    #[test]
    fn test_locate_prefers_data_dir_when_exe_has_none() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(NOTIFICATION_SOUND_FILE), b"RIFF").unwrap();

        let player = SoundPlayer::locate(dir.path());
        assert!(player.is_available());
        assert!(player.path().ends_with(NOTIFICATION_SOUND_FILE));
    }

    #[test]
    fn test_locate_without_any_asset() {
        let dir = tempfile::tempdir().unwrap();
        let player = SoundPlayer::locate(dir.path());

        assert!(player.path().ends_with(NOTIFICATION_SOUND_FILE));
    }
}
