#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::sync::mpsc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, Level as TraceLevel};
use tracing_subscriber::FmtSubscriber;

use totals_tip::constants::defaults;
use totals_tip::controller::ScreenMetrics;
use totals_tip::gui::{self, Launch};
use totals_tip::hotkeys::{self, spawn_listener, ChannelHotkey};
use totals_tip::settings::{SettingsPersistence, TomlFileStore};

#[derive(Parser, Debug)]
#[command(name = "totals-tip", version, about = "Blueprint totals tooltip settings host")]
struct Cli {
    /// Settings file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// trace, debug, info, warn or error; falls back to LOG_LEVEL
    #[arg(long)]
    log_level: Option<String>,

    /// Screen height bounding the margin settings
    #[arg(long, default_value_t = defaults::SCREEN_HEIGHT)]
    screen_height: i32,

    /// Also listen for the toggle key on /dev/input keyboards
    #[arg(long)]
    evdev: bool,
}

fn init_tracing(cli_level: Option<&str>) -> Result<()> {
    let level = cli_level
        .map(str::to_string)
        .or_else(|| std::env::var("LOG_LEVEL").ok())
        .unwrap_or_else(|| "info".to_string());

    let log_level = match level.to_lowercase().as_str() {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Start the evdev listener; None when input devices are not accessible
fn start_global_hotkey() -> Option<ChannelHotkey> {
    if !hotkeys::check_permissions() {
        hotkeys::print_permission_error();
        return None;
    }

    let (hotkey_tx, hotkey_rx) = mpsc::channel();
    match spawn_listener(hotkey_tx) {
        Ok(handles) => {
            info!(listeners = handles.len(), key = ?hotkeys::TOGGLE_KEY, "Global hotkey enabled");
            Some(ChannelHotkey::new(hotkey_rx))
        }
        Err(e) => {
            error!(error = %e, "Failed to start hotkey listener");
            hotkeys::print_permission_error();
            None
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref())?;

    let persistence = match cli.config {
        Some(path) => TomlFileStore::new(path),
        None => TomlFileStore::at_default_path(),
    };
    info!(path = %persistence.path().display(), "Using settings file");
    let persisted = persistence.load()?;

    let global_hotkey = if cli.evdev {
        start_global_hotkey()
    } else {
        None
    };

    gui::run_gui(Launch {
        persistence: Box::new(persistence),
        persisted,
        screen: ScreenMetrics {
            height: cli.screen_height,
        },
        global_hotkey,
    })
}
