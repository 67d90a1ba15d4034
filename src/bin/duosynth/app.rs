//! duosynth - application builder and runner

use std::{env, path::PathBuf, sync::Arc};

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use rtrb::RingBuffer;
use tracing::info;

use duosynth::{
    preset::{PresetStore, DEFAULT_PRESET_DIR},
    Synth, SynthConfig,
};

use super::audio::AudioOutput;
use super::ui::UiApp;

const PRESET_DIR_ENV: &str = "DUOSYNTH_PRESET_DIR";

/// Samples of rendered output buffered for the oscilloscope.
const SCOPE_RING_SIZE: usize = 8192;

/// Main application builder
pub struct App {
    config: SynthConfig,
    preset_dir: PathBuf,
    preset: Option<String>,
}

impl App {
    pub fn new() -> Self {
        Self {
            config: SynthConfig::default(),
            preset_dir: PathBuf::from(DEFAULT_PRESET_DIR),
            preset: None,
        }
    }

    /// Builder seeded from `DUOSYNTH_PRESET_DIR` and the first CLI argument.
    pub fn from_env() -> Self {
        let mut app = Self::new();
        if let Some(dir) = env::var_os(PRESET_DIR_ENV) {
            app = app.preset_dir(dir);
        }
        if let Some(name) = env::args().nth(1) {
            app = app.preset(name);
        }
        app
    }

    /// Directory presets are listed from and saved to
    pub fn preset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.preset_dir = dir.into();
        self
    }

    /// Preset to load before the stream starts
    pub fn preset(mut self, name: impl Into<String>) -> Self {
        self.preset = Some(name.into());
        self
    }

    /// Run the application (takes over the terminal, plays audio)
    pub fn run(self) -> EyreResult<()> {
        let synth = Arc::new(Synth::new(self.config));
        let store = PresetStore::new(self.preset_dir);

        if let Some(name) = &self.preset {
            let preset = store
                .load(name)
                .wrap_err_with(|| format!("failed to load preset '{name}'"))?;
            synth.apply_preset(&preset)?;
            info!(preset = %name, "startup preset applied");
        }

        let (scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_RING_SIZE);
        let mut audio = AudioOutput::start(Arc::clone(&synth), scope_tx)?;

        let mut ui = UiApp::new(synth, store, scope_rx, self.preset);
        let mut terminal = ratatui::init();
        let result = ui.run(&mut terminal, &mut audio);
        ratatui::restore();

        audio.stop();
        result
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
