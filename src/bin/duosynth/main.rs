//! duosynth - two-voice terminal synthesizer
//!
//! Run with: cargo run --release [preset-name]
//!
//! Environment:
//!   DUOSYNTH_PRESET_DIR  directory for .synthpreset files (default: presets)
//!   DUOSYNTH_LOG         tracing filter (default: info), written to duosynth.log

mod app;
mod audio;
mod ui;

use std::{fs::File, sync::Mutex};

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracing_subscriber::EnvFilter;

use app::App;

const LOG_FILE: &str = "duosynth.log";
const LOG_ENV: &str = "DUOSYNTH_LOG";

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    init_tracing()?;

    App::from_env().run()
}

/// Log to a file; the terminal belongs to the UI.
fn init_tracing() -> EyreResult<()> {
    let file = File::create(LOG_FILE).wrap_err_with(|| format!("failed to create {LOG_FILE}"))?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
