//! `clipwatch` - CLI for the clipboard watcher
//!
//! Without a subcommand the watcher starts and the control menu is shown on
//! the terminal.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tracing::info;

use clipwatch::cli::{ApplyCommand, Cli, Command, ConfigCommand, RunCommand};
use clipwatch::control::{qr_url, QrPresenter, TerminalQr};
use clipwatch::monitor::{self, Rewrite};
use clipwatch::{
    console, init_logging, ClipboardAccess, ClipboardMonitor, ConfigStore, ControlSurface,
    HttpResolver, MemoryClipboard, MonitorState, ShortLinkExpander, SilentNotifier, TickOutcome,
};
use clipwatch_desktop::{platform_name, Autostart, SoundPlayer, SystemClipboard};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let store = ConfigStore::in_dir_or_cwd(cli.data_dir.clone());

    match cli.command_or_default() {
        Command::Run(run_cmd) => handle_run(store, &run_cmd).await,
        Command::Apply(apply_cmd) => handle_apply(&store, &apply_cmd).await,
        Command::Qr => handle_qr(),
        Command::Config(config_cmd) => handle_config(&store, &config_cmd),
    }
}

async fn handle_run(store: ConfigStore, cmd: &RunCommand) -> anyhow::Result<()> {
    let config = store
        .load_config()
        .with_context(|| format!("loading settings from {}", store.dir().display()))?;
    let rules = store.load_rules()?;

    let state = Arc::new(MonitorState::new(config.interval)?);
    if cmd.paused {
        state.set_active(false);
    }

    let sound = SoundPlayer::locate(store.dir());
    if !sound.is_available() {
        info!(path = %sound.path().display(), "No notification sound found");
    }

    let monitor_state = Arc::clone(&state);
    monitor::spawn_detached(move || {
        let clipboard = SystemClipboard::new()?;
        let expander = ShortLinkExpander::new(HttpResolver::new()?);
        Ok(ClipboardMonitor::new(
            clipboard,
            monitor_state,
            rules,
            expander,
            sound,
        ))
    })
    .context("starting clipboard monitor")?;

    info!(platform = platform_name(), "Clipboard watcher running");

    let mut surface = ControlSurface::new(
        state,
        store,
        config,
        SystemClipboard::new()?,
        TerminalQr,
        Autostart::new()?,
    );
    let stdin = BufReader::new(tokio::io::stdin());
    console::run_menu(&mut surface, stdin, &mut std::io::stdout()).await?;

    // The monitor thread ends with the process
    info!("Shutting down");
    Ok(())
}

async fn handle_apply(store: &ConfigStore, cmd: &ApplyCommand) -> anyhow::Result<()> {
    let config = store.load_config()?;
    let rules = store.load_rules()?;
    let expander = if cmd.expand {
        ShortLinkExpander::new(HttpResolver::new()?)
    } else {
        ShortLinkExpander::offline()
    };

    let monitor = ClipboardMonitor::new(
        MemoryClipboard::with_text(cmd.text.clone()),
        Arc::new(MonitorState::new(config.interval)?),
        rules,
        expander,
        SilentNotifier,
    );

    if let TickOutcome::Processed { rewrites } = monitor.tick().await {
        let applied: Vec<String> = rewrites.iter().map(Rewrite::to_string).collect();
        if !applied.is_empty() {
            info!(rewrites = %applied.join(", "), "Rules applied");
        }
    }

    println!("{}", monitor.clipboard().text().unwrap_or_default());
    Ok(())
}

fn handle_qr() -> anyhow::Result<()> {
    let clipboard = SystemClipboard::new()?;
    let text = clipboard.read_text()?.unwrap_or_default();
    match qr_url(&text) {
        Some(url) => TerminalQr.present(&url)?,
        None => println!("The clipboard does not hold an http(s) URL."),
    }
    Ok(())
}

fn handle_config(store: &ConfigStore, cmd: &ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = store.load_config()?;
            let rules = store.load_rules()?;
            if *json {
                let settings = serde_json::json!({
                    "interval": config.interval,
                    "ng_words": rules.ng_words,
                    "url_mapping": rules.url_mapping,
                });
                println!("{}", serde_json::to_string_pretty(&settings)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Monitor]");
                println!("  Interval (s):       {:?}", config.interval);
                println!("  Platform:           {}", platform_name());
                println!();
                println!("[NG words]");
                for word in rules.ng_words.words() {
                    println!("  {word}");
                }
                println!();
                println!("[URL mapping]");
                for (from, to) in rules.url_mapping.iter() {
                    println!("  {from} -> {to}");
                }
            }
        }
        ConfigCommand::Path => {
            println!("{}", store.dir().display());
        }
    }
    Ok(())
}
