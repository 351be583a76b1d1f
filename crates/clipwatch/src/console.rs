//! Numbered console menu driving a [`ControlSurface`].

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

use crate::control::{ControlSurface, Flow, MenuAction, MenuItem};
use crate::error::Result;

/// Print the menu, read a choice, run it; repeat until exit is chosen.
///
/// A failed action is reported and the menu is shown again. When input
/// closes (started at login, in the background, or with stdin redirected)
/// the menu stops but this never returns, so the monitor keeps running
/// until the process is terminated.
///
/// # Errors
///
/// Returns an error only if reading input or writing output fails.
pub async fn run_menu<R, W>(surface: &mut ControlSurface, input: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    loop {
        let menu = surface.menu();
        print_menu(&menu, out)?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            out.flush()?;
            info!("Console input closed; watching in the background");
            return std::future::pending().await;
        };

        let Some(action) = parse_choice(&line, &menu) else {
            if !line.trim().is_empty() {
                writeln!(out, "Unknown choice: {}", line.trim())?;
            }
            continue;
        };

        match surface.handle(action) {
            Ok(Flow::Exit) => return Ok(()),
            Ok(Flow::Continue) => {}
            Err(e) => {
                warn!(error = %e, ?action, "Menu action failed");
                writeln!(out, "Error: {e}")?;
            }
        }
    }
}

fn print_menu<W: Write>(menu: &[MenuItem], out: &mut W) -> Result<()> {
    writeln!(out)?;
    for (i, item) in menu.iter().enumerate() {
        if item.action == MenuAction::ShowInterval {
            writeln!(out, "    {}", item.label)?;
        } else {
            writeln!(out, "{:>2}) {}", i + 1, item.label)?;
        }
    }
    write!(out, "> ")?;
    out.flush()?;
    Ok(())
}

/// Map a 1-based menu number to its action. Informational lines are not
/// selectable.
fn parse_choice(line: &str, menu: &[MenuItem]) -> Option<MenuAction> {
    let index = line.trim().parse::<usize>().ok()?.checked_sub(1)?;
    menu.get(index)
        .map(|item| item.action)
        .filter(|action| *action != MenuAction::ShowInterval)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::config::ConfigStore;
    use crate::control::{QrPresenter, StartupRegistry};
    use crate::state::MonitorState;
    use std::cell::Cell;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Copy)]
    struct NoQr;

    impl QrPresenter for NoQr {
        fn present(&self, _url: &str) -> Result<()> {
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    struct FakeStartup(Cell<bool>);

    impl StartupRegistry for FakeStartup {
        fn is_enabled(&self) -> bool {
            self.0.get()
        }

        fn set_enabled(&self, enabled: bool) -> Result<()> {
            self.0.set(enabled);
            Ok(())
        }
    }

    fn surface(dir: &TempDir) -> ControlSurface {
        let store = ConfigStore::new(dir.path());
        let config = store.load_config().unwrap();
        let state = Arc::new(MonitorState::new(config.interval).unwrap());
        ControlSurface::new(
            state,
            store,
            config,
            MemoryClipboard::default(),
            NoQr,
            FakeStartup::default(),
        )
    }

    async fn drive(surface: &mut ControlSurface, input: &str) -> String {
        let mut out = Vec::new();
        run_menu(surface, input.as_bytes(), &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_exit_choice_stops() {
        let dir = TempDir::new().unwrap();
        let mut surface = surface(&dir);
        let out = drive(&mut surface, "8\n1\n").await;
        assert!(out.contains(" 8) Exit"));
        // The toggle after exit was never read
        assert!(surface.state().is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_end_of_input_keeps_running() {
        let dir = TempDir::new().unwrap();
        let mut surface = surface(&dir);
        let mut out = Vec::new();

        let result = tokio::time::timeout(
            Duration::from_secs(3600),
            run_menu(&mut surface, &b""[..], &mut out),
        )
        .await;
        assert!(result.is_err(), "menu ended without an exit choice");

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Pause monitoring"));
        assert!(surface.state().is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_actions_before_end_of_input_still_apply() {
        let dir = TempDir::new().unwrap();
        let mut surface = surface(&dir);
        let mut out = Vec::new();

        let result = tokio::time::timeout(
            Duration::from_secs(60),
            run_menu(&mut surface, &b"1\n"[..], &mut out),
        )
        .await;
        assert!(result.is_err());
        assert!(!surface.state().is_active());
    }

    #[tokio::test]
    async fn test_choices_are_applied() {
        let dir = TempDir::new().unwrap();
        let mut surface = surface(&dir);
        let out = drive(&mut surface, "1\n3\n8\n").await;

        assert!(!surface.state().is_active());
        assert!((surface.state().interval_seconds() - 0.1).abs() < f64::EPSILON);
        assert!(out.contains("Resume monitoring"));
        assert!(out.contains("Current interval: 0.1 seconds"));
    }

    #[tokio::test]
    async fn test_unknown_choice_reported() {
        let dir = TempDir::new().unwrap();
        let mut surface = surface(&dir);
        let out = drive(&mut surface, "42\nabc\n\n8\n").await;
        assert!(out.contains("Unknown choice: 42"));
        assert!(out.contains("Unknown choice: abc"));
        assert!(surface.state().is_active());
    }

    #[test]
    fn test_parse_choice() {
        let dir = TempDir::new().unwrap();
        let menu = surface(&dir).menu();
        assert_eq!(parse_choice("1", &menu), Some(MenuAction::ToggleMonitoring));
        assert_eq!(parse_choice(" 5 ", &menu), Some(MenuAction::SetInterval(1.0)));
        assert_eq!(parse_choice("2", &menu), None);
        assert_eq!(parse_choice("0", &menu), None);
        assert_eq!(parse_choice("-1", &menu), None);
        assert_eq!(parse_choice("99", &menu), None);
    }
}
