//! The control surface: menu model and the actions behind it.
//!
//! The control surface runs on the main context and shares only
//! [`MonitorState`] with the monitor. The menu is rebuilt from current
//! state after every action, so its labels always reflect what a
//! selection would do.

use std::borrow::Cow;
use std::sync::Arc;

use clipwatch_desktop::{render_qr, Autostart};
use tracing::{debug, info};

use crate::clipboard::ClipboardAccess;
use crate::config::{Config, ConfigStore};
use crate::error::Result;
use crate::normalize::normalize;
use crate::state::{validate_interval, MonitorState};

/// Poll intervals offered by the menu, in seconds.
pub const INTERVAL_PRESETS: [f64; 3] = [0.1, 0.5, 1.0];

/// Normalize clipboard text and return it if it is an `http(s)` URL.
#[must_use]
pub fn qr_url(raw: &str) -> Option<Cow<'_, str>> {
    let text = normalize(raw);
    (text.starts_with("http://") || text.starts_with("https://")).then_some(text)
}

/// Shows a QR code for a URL.
pub trait QrPresenter {
    /// Present `url` as a QR code.
    ///
    /// # Errors
    ///
    /// Returns an error if the code cannot be rendered or shown.
    fn present(&self, url: &str) -> Result<()>;
}

/// Prints QR codes to standard output as block characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalQr;

impl QrPresenter for TerminalQr {
    fn present(&self, url: &str) -> Result<()> {
        let code = render_qr(url)?;
        println!("{code}");
        println!("{url}");
        Ok(())
    }
}

/// Launch-at-login registration.
pub trait StartupRegistry {
    /// Check if launch at login is registered.
    fn is_enabled(&self) -> bool;

    /// Register or unregister launch at login.
    ///
    /// # Errors
    ///
    /// Returns an error if the registration cannot be changed.
    fn set_enabled(&self, enabled: bool) -> Result<()>;
}

impl StartupRegistry for Autostart {
    fn is_enabled(&self) -> bool {
        Autostart::is_enabled(self)
    }

    fn set_enabled(&self, enabled: bool) -> Result<()> {
        if enabled {
            self.enable()?;
        } else {
            self.disable()?;
        }
        Ok(())
    }
}

/// What a menu entry does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MenuAction {
    /// Pause or resume monitoring.
    ToggleMonitoring,
    /// Informational line; does nothing.
    ShowInterval,
    /// Switch to a preset poll interval.
    SetInterval(f64),
    /// Render the clipboard URL as a QR code.
    GenerateQr,
    /// Register or unregister launch at login.
    ToggleStartup,
    /// Quit the program.
    Exit,
}

/// One menu entry.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    /// Text shown to the user.
    pub label: String,
    /// Action run when the entry is chosen.
    pub action: MenuAction,
}

impl MenuItem {
    fn new(label: impl Into<String>, action: MenuAction) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

/// Whether the front-end should keep going after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Show the menu again.
    Continue,
    /// Stop the front-end and end the process.
    Exit,
}

/// Menu model and action handlers.
pub struct ControlSurface {
    state: Arc<MonitorState>,
    store: ConfigStore,
    config: Config,
    clipboard: Box<dyn ClipboardAccess>,
    qr: Box<dyn QrPresenter>,
    startup: Box<dyn StartupRegistry>,
}

impl std::fmt::Debug for ControlSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlSurface")
            .field("state", &self.state)
            .field("store", &self.store)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ControlSurface {
    /// Create a control surface over shared monitor state.
    pub fn new(
        state: Arc<MonitorState>,
        store: ConfigStore,
        config: Config,
        clipboard: impl ClipboardAccess + 'static,
        qr: impl QrPresenter + 'static,
        startup: impl StartupRegistry + 'static,
    ) -> Self {
        Self {
            state,
            store,
            config,
            clipboard: Box::new(clipboard),
            qr: Box::new(qr),
            startup: Box::new(startup),
        }
    }

    /// The shared monitor state.
    #[must_use]
    pub fn state(&self) -> &Arc<MonitorState> {
        &self.state
    }

    /// The configuration as last saved.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Pause or resume monitoring.
    pub fn set_active(&self, active: bool) {
        self.state.set_active(active);
        info!(active, "Monitoring state changed");
    }

    /// Flip monitoring. Returns the new state.
    pub fn toggle_monitoring(&self) -> bool {
        let active = self.state.toggle_active();
        info!(active, "Monitoring state changed");
        active
    }

    /// Change the poll interval and persist it.
    ///
    /// The monitor picks the new value up after its current sleep.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidInterval`] for values that are not
    /// positive and finite, or an error if the config cannot be saved. The
    /// running interval is already updated when saving fails.
    pub fn set_interval_seconds(&mut self, seconds: f64) -> Result<()> {
        let seconds = validate_interval(seconds)?;
        self.state.set_interval_seconds(seconds)?;
        self.config.interval = seconds;
        self.store.save_config(&self.config)?;
        info!(interval_secs = seconds, "Poll interval changed");
        Ok(())
    }

    /// Show the clipboard as a QR code if it holds an `http(s)` URL.
    ///
    /// Returns whether a code was shown.
    ///
    /// # Errors
    ///
    /// Returns an error if the clipboard cannot be read or the code cannot
    /// be presented.
    pub fn generate_qr(&self) -> Result<bool> {
        let Some(raw) = self.clipboard.read_text()? else {
            debug!("Clipboard empty; no QR code");
            return Ok(false);
        };
        let Some(url) = qr_url(&raw) else {
            debug!("Clipboard does not hold a URL; no QR code");
            return Ok(false);
        };
        self.qr.present(&url)?;
        Ok(true)
    }

    /// Flip launch-at-login registration. Returns the new state.
    ///
    /// # Errors
    ///
    /// Returns an error if the registration cannot be changed.
    pub fn toggle_startup(&self) -> Result<bool> {
        let enabled = !self.startup.is_enabled();
        self.startup.set_enabled(enabled)?;
        info!(enabled, "Startup registration changed");
        Ok(enabled)
    }

    /// Build the menu from current state.
    #[must_use]
    pub fn menu(&self) -> Vec<MenuItem> {
        let mut items = Vec::with_capacity(5 + INTERVAL_PRESETS.len());

        let monitoring = if self.state.is_active() {
            "Pause monitoring"
        } else {
            "Resume monitoring"
        };
        items.push(MenuItem::new(monitoring, MenuAction::ToggleMonitoring));
        items.push(MenuItem::new(
            format!(
                "Current interval: {:?} seconds",
                self.state.interval_seconds()
            ),
            MenuAction::ShowInterval,
        ));
        for preset in INTERVAL_PRESETS {
            items.push(MenuItem::new(
                format!("Set interval to {preset:?} seconds"),
                MenuAction::SetInterval(preset),
            ));
        }
        items.push(MenuItem::new("Generate QR code", MenuAction::GenerateQr));

        let startup = if self.startup.is_enabled() {
            "Unregister from startup"
        } else {
            "Register at startup"
        };
        items.push(MenuItem::new(startup, MenuAction::ToggleStartup));
        items.push(MenuItem::new("Exit", MenuAction::Exit));
        items
    }

    /// Run a menu action.
    ///
    /// # Errors
    ///
    /// Returns the error of the action that failed. State is left as the
    /// action left it; the caller may keep going.
    pub fn handle(&mut self, action: MenuAction) -> Result<Flow> {
        match action {
            MenuAction::ToggleMonitoring => {
                self.toggle_monitoring();
            }
            MenuAction::ShowInterval => {}
            MenuAction::SetInterval(seconds) => self.set_interval_seconds(seconds)?,
            MenuAction::GenerateQr => {
                self.generate_qr()?;
            }
            MenuAction::ToggleStartup => {
                self.toggle_startup()?;
            }
            MenuAction::Exit => {
                info!("Exit requested");
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::error::Error;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Default)]
    struct RecordingQr(Rc<RefCell<Vec<String>>>);

    impl QrPresenter for RecordingQr {
        fn present(&self, url: &str) -> Result<()> {
            self.0.borrow_mut().push(url.to_string());
            Ok(())
        }
    }

    #[derive(Debug, Clone, Default)]
    struct FakeStartup(Rc<Cell<bool>>);

    impl StartupRegistry for FakeStartup {
        fn is_enabled(&self) -> bool {
            self.0.get()
        }

        fn set_enabled(&self, enabled: bool) -> Result<()> {
            self.0.set(enabled);
            Ok(())
        }
    }

    struct Fixture {
        _dir: TempDir,
        surface: ControlSurface,
        store: ConfigStore,
        clipboard: MemoryClipboard,
        qr: RecordingQr,
        startup: FakeStartup,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path());
        let config = store.load_config().unwrap();
        let state = Arc::new(MonitorState::new(config.interval).unwrap());
        let clipboard = MemoryClipboard::default();
        let qr = RecordingQr::default();
        let startup = FakeStartup::default();
        let surface = ControlSurface::new(
            state,
            store.clone(),
            config,
            clipboard.clone(),
            qr.clone(),
            startup.clone(),
        );
        Fixture {
            _dir: dir,
            surface,
            store,
            clipboard,
            qr,
            startup,
        }
    }

    fn labels(surface: &ControlSurface) -> Vec<String> {
        surface.menu().into_iter().map(|item| item.label).collect()
    }

    #[test]
    fn test_qr_url() {
        assert_eq!(qr_url("https://a.example/").as_deref(), Some("https://a.example/"));
        assert_eq!(qr_url("http://a.example/?x=1&amp;y=2").as_deref(), Some("http://a.example/?x=1&y=2"));
        assert_eq!(qr_url(" https://a.example/"), None);
        assert_eq!(qr_url("mailto:someone@example.com"), None);
    }

    #[test]
    fn test_toggle_monitoring() {
        let f = fixture();
        assert!(f.surface.state().is_active());
        assert!(!f.surface.toggle_monitoring());
        assert!(!f.surface.state().is_active());
        assert!(f.surface.toggle_monitoring());
    }

    #[test]
    fn test_set_active() {
        let f = fixture();
        f.surface.set_active(false);
        assert!(!f.surface.state().is_active());
        f.surface.set_active(true);
        assert!(f.surface.state().is_active());
    }

    #[test]
    fn test_set_interval_updates_state_and_file() {
        let mut f = fixture();
        f.surface.set_interval_seconds(0.1).unwrap();

        assert!((f.surface.state().interval_seconds() - 0.1).abs() < f64::EPSILON);
        assert!((f.surface.config().interval - 0.1).abs() < f64::EPSILON);
        let reloaded = f.store.load_config().unwrap();
        assert!((reloaded.interval - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_set_interval_rejects_invalid() {
        let mut f = fixture();
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = f.surface.set_interval_seconds(bad).unwrap_err();
            assert!(matches!(err, Error::InvalidInterval(_)));
        }
        assert!((f.surface.state().interval_seconds() - 0.5).abs() < f64::EPSILON);
        let reloaded = f.store.load_config().unwrap();
        assert!((reloaded.interval - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_generate_qr_for_url() {
        let f = fixture();
        f.clipboard.set(Some("https://example.com/a?b=1&amp;c=2".to_string()));

        assert!(f.surface.generate_qr().unwrap());
        assert_eq!(
            *f.qr.0.borrow(),
            ["https://example.com/a?b=1&c=2".to_string()]
        );
        assert!(f.clipboard.writes().is_empty());
    }

    #[test]
    fn test_generate_qr_ignores_non_url() {
        let f = fixture();
        f.clipboard.set(Some("see https://example.com".to_string()));
        assert!(!f.surface.generate_qr().unwrap());

        f.clipboard.set(Some("ftp://example.com".to_string()));
        assert!(!f.surface.generate_qr().unwrap());

        f.clipboard.set(None);
        assert!(!f.surface.generate_qr().unwrap());

        assert!(f.qr.0.borrow().is_empty());
    }

    #[test]
    fn test_generate_qr_leaves_state_alone() {
        let f = fixture();
        f.surface.set_active(false);
        f.clipboard.set(Some("http://example.com".to_string()));
        assert!(f.surface.generate_qr().unwrap());
        assert!(!f.surface.state().is_active());
    }

    #[test]
    fn test_toggle_startup() {
        let f = fixture();
        assert!(f.surface.toggle_startup().unwrap());
        assert!(f.startup.0.get());
        assert!(!f.surface.toggle_startup().unwrap());
        assert!(!f.startup.0.get());
    }

    #[test]
    fn test_menu_layout() {
        let f = fixture();
        let menu = f.surface.menu();
        let actions: Vec<MenuAction> = menu.iter().map(|item| item.action).collect();
        assert_eq!(
            actions,
            [
                MenuAction::ToggleMonitoring,
                MenuAction::ShowInterval,
                MenuAction::SetInterval(0.1),
                MenuAction::SetInterval(0.5),
                MenuAction::SetInterval(1.0),
                MenuAction::GenerateQr,
                MenuAction::ToggleStartup,
                MenuAction::Exit,
            ]
        );
        assert_eq!(menu[1].label, "Current interval: 0.5 seconds");
        assert_eq!(menu[4].label, "Set interval to 1.0 seconds");
    }

    #[test]
    fn test_menu_labels_follow_state() {
        let mut f = fixture();
        let before = labels(&f.surface);
        assert_eq!(before[0], "Pause monitoring");
        assert_eq!(before[6], "Register at startup");

        f.surface.handle(MenuAction::ToggleMonitoring).unwrap();
        f.surface.handle(MenuAction::ToggleStartup).unwrap();
        f.surface.handle(MenuAction::SetInterval(1.0)).unwrap();

        let after = labels(&f.surface);
        assert_eq!(after[0], "Resume monitoring");
        assert_eq!(after[1], "Current interval: 1.0 seconds");
        assert_eq!(after[6], "Unregister from startup");
    }

    #[test]
    fn test_handle_flow() {
        let mut f = fixture();
        assert_eq!(f.surface.handle(MenuAction::ShowInterval).unwrap(), Flow::Continue);
        assert_eq!(f.surface.handle(MenuAction::GenerateQr).unwrap(), Flow::Continue);
        assert_eq!(f.surface.handle(MenuAction::Exit).unwrap(), Flow::Exit);
    }

    #[test]
    fn test_handle_reports_errors() {
        let mut f = fixture();
        assert!(f.surface.handle(MenuAction::SetInterval(-0.5)).is_err());
    }

    #[test]
    fn test_autostart_as_startup_registry() {
        let dir = TempDir::new().unwrap();
        let autostart = Autostart::with_dir(dir.path());
        assert!(!StartupRegistry::is_enabled(&autostart));
        autostart.set_enabled(true).unwrap();
        assert!(StartupRegistry::is_enabled(&autostart));
        autostart.set_enabled(false).unwrap();
        assert!(!StartupRegistry::is_enabled(&autostart));
    }

    #[test]
    fn test_terminal_qr_rejects_oversized_input() {
        let url = format!("https://example.com/{}", "a".repeat(10_000));
        assert!(matches!(TerminalQr.present(&url), Err(Error::Qr(_))));
    }
}
