//! State shared between the control surface and the monitor.
//!
//! The control context writes, the monitor reads once per tick. Each field
//! is its own atomic; nothing spans both fields, so a tick may observe a new
//! pause flag with an old interval or vice versa.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use crate::error::{Error, Result};

/// Check that `seconds` is usable as a poll interval.
///
/// # Errors
///
/// Returns [`Error::InvalidInterval`] unless `seconds` is `> 0` and fits in
/// a [`Duration`].
pub fn validate_interval(seconds: f64) -> Result<f64> {
    if seconds > 0.0 && Duration::try_from_secs_f64(seconds).is_ok() {
        Ok(seconds)
    } else {
        Err(Error::InvalidInterval(seconds))
    }
}

/// Pause flag and poll interval.
#[derive(Debug)]
pub struct MonitorState {
    active: AtomicBool,
    // f64 bit pattern
    interval: AtomicU64,
}

impl MonitorState {
    /// Create an active state polling every `interval_seconds`.
    ///
    /// # Errors
    ///
    /// Returns an error if the interval is not a positive number.
    pub fn new(interval_seconds: f64) -> Result<Self> {
        let seconds = validate_interval(interval_seconds)?;
        Ok(Self {
            active: AtomicBool::new(true),
            interval: AtomicU64::new(seconds.to_bits()),
        })
    }

    /// Check if the monitor should process clipboard contents.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Pause or resume the monitor.
    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::SeqCst);
    }

    /// Flip the pause flag, returning the new value.
    pub fn toggle_active(&self) -> bool {
        !self.active.fetch_xor(true, Ordering::SeqCst)
    }

    /// Current poll interval in seconds.
    #[must_use]
    pub fn interval_seconds(&self) -> f64 {
        f64::from_bits(self.interval.load(Ordering::SeqCst))
    }

    /// Change the poll interval. Takes effect after the sleep in progress.
    ///
    /// # Errors
    ///
    /// Returns an error if the interval is not a positive number.
    pub fn set_interval_seconds(&self, seconds: f64) -> Result<()> {
        let seconds = validate_interval(seconds)?;
        self.interval.store(seconds.to_bits(), Ordering::SeqCst);
        Ok(())
    }

    /// Current poll interval as a `Duration`.
    ///
    /// Every stored value went through [`validate_interval`], so the
    /// conversion cannot overflow.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs_f64(self.interval_seconds())
    }
}
