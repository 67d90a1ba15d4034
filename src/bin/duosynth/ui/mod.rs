//! TUI module for duosynth
//!
//! Two voice panels, an output oscilloscope and a status bar. Every edit is
//! turned into a `ControlMessage` and applied to the shared synth.

mod state;
mod status;
mod voice_panel;
mod waveform;

use std::{sync::Arc, time::Duration};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;
use tracing::{error, info, warn};

use duosynth::{preset::PresetStore, ControlMessage, Synth, SynthSnapshot, VoiceId};

use super::audio::AudioOutput;
use state::{MessageKind, UiState};
use status::{render_status, AudioStats, StatusInfo};
use voice_panel::render_voice_panel;
use waveform::render_waveform;

/// Oscilloscope window, in samples
const SCOPE_SIZE: usize = 1024;

/// UI application state
pub struct UiApp {
    synth: Arc<Synth>,
    store: PresetStore,
    /// Rendered output from the audio callback
    scope_rx: Consumer<f32>,
    scope: Vec<f32>,
    state: UiState,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        synth: Arc<Synth>,
        store: PresetStore,
        scope_rx: Consumer<f32>,
        preset_name: Option<String>,
    ) -> Self {
        Self {
            synth,
            store,
            scope_rx,
            scope: vec![0.0; SCOPE_SIZE],
            state: UiState::new(preset_name),
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal, audio: &mut AudioOutput) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_scope();

            if audio.is_aborted() && audio.is_running() {
                audio.stop();
                error!("render aborted, output stream stopped");
                self.state.error("Audio render aborted; output stopped");
            }

            let snapshot = self.synth.snapshot()?;
            let running = audio.is_running();
            terminal.draw(|frame| self.render(frame, &snapshot, running))?;

            // Handle keyboard input (non-blocking, ~60fps)
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key, &snapshot)?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Drain the scope ring, keeping the last SCOPE_SIZE samples
    fn poll_scope(&mut self) {
        while let Ok(sample) = self.scope_rx.pop() {
            self.scope.push(sample);
        }
        if self.scope.len() > SCOPE_SIZE {
            let excess = self.scope.len() - SCOPE_SIZE;
            self.scope.drain(0..excess);
        }
    }

    fn handle_key(&mut self, key: KeyEvent, snapshot: &SynthSnapshot) -> EyreResult<()> {
        let coarse = key.modifiers.contains(KeyModifiers::SHIFT);
        let voice = self.state.voice;

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.state.voice = voice.other();
            }
            KeyCode::Up => self.state.param = self.state.param.prev(),
            KeyCode::Down => self.state.param = self.state.param.next(),
            KeyCode::Left | KeyCode::Right => {
                let steps = if key.code == KeyCode::Left { -1 } else { 1 };
                let params = &snapshot.voice(voice).params;
                let message = self.state.param.nudge(voice, params, steps, coarse);
                self.synth.apply(message)?;
            }
            KeyCode::Char(' ') => self.synth.apply(ControlMessage::ToggleNote { voice })?,
            KeyCode::Char('1') => self.synth.apply(ControlMessage::ToggleNote {
                voice: VoiceId::One,
            })?,
            KeyCode::Char('2') => self.synth.apply(ControlMessage::ToggleNote {
                voice: VoiceId::Two,
            })?,
            KeyCode::Char('s') | KeyCode::Char('S') => self.save_preset()?,
            KeyCode::Char('p') | KeyCode::Char('P') => self.load_next_preset()?,
            _ => {}
        }
        Ok(())
    }

    /// Save under the current preset name, or the next free `preset_N`
    fn save_preset(&mut self) -> EyreResult<()> {
        let name = match &self.state.preset_name {
            Some(name) => name.clone(),
            None => self.fresh_preset_name(),
        };
        let preset = self.synth.to_preset()?;

        match self.store.save(&name, &preset) {
            Ok(path) => {
                self.state.info(format!("Saved {}", path.display()));
                self.state.preset_name = Some(name);
            }
            Err(err) => {
                warn!(%err, "preset save failed");
                self.state.error(format!("Save failed: {err}"));
            }
        }
        Ok(())
    }

    fn fresh_preset_name(&self) -> String {
        let taken = self.store.list().unwrap_or_default();
        (1..)
            .map(|n| format!("preset_{n}"))
            .find(|name| !taken.contains(name))
            .unwrap_or_else(|| "preset".to_owned())
    }

    /// Step through the preset directory, loading one preset per press
    fn load_next_preset(&mut self) -> EyreResult<()> {
        let names = match self.store.list() {
            Ok(names) => names,
            Err(err) => {
                self.state.error(format!("Cannot list presets: {err}"));
                return Ok(());
            }
        };
        if names.is_empty() {
            self.state
                .info(format!("No presets in {}", self.store.dir().display()));
            return Ok(());
        }

        let index = self.state.preset_cursor % names.len();
        self.state.preset_cursor = index + 1;
        let name = &names[index];

        match self.store.load(name) {
            Ok(preset) => {
                self.synth.apply_preset(&preset)?;
                info!(preset = %name, "preset applied");
                self.state
                    .info(format!("Loaded '{name}' ({}/{})", index + 1, names.len()));
                self.state.preset_name = Some(name.clone());
            }
            Err(err) => {
                warn!(%err, preset = %name, "preset load failed");
                self.state.error(format!("Load failed: {err}"));
            }
        }
        Ok(())
    }

    /// Render the UI
    fn render(&self, frame: &mut Frame, snapshot: &SynthSnapshot, running: bool) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),  // Status bar
                Constraint::Min(11),    // Voice panels
                Constraint::Length(10), // Oscilloscope
                Constraint::Length(1),  // Message
                Constraint::Length(1),  // Help bar
            ])
            .split(area);

        let info = StatusInfo {
            sample_rate: snapshot.sample_rate,
            preset_name: self.state.preset_name.as_deref(),
            running,
        };
        render_status(frame, chunks[0], &info, &AudioStats::from_buffer(&self.scope));

        let panels = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);
        for (id, panel) in VoiceId::ALL.into_iter().zip(panels.iter()) {
            let selected = (id == self.state.voice).then_some(self.state.param);
            render_voice_panel(frame, *panel, id, snapshot.voice(id), selected);
        }

        render_waveform(frame, chunks[2], &self.scope);

        let message_color = match self.state.message_kind {
            MessageKind::Info => Color::Gray,
            MessageKind::Error => Color::Red,
        };
        let message = Paragraph::new(format!(" {}", self.state.message))
            .style(Style::default().fg(message_color));
        frame.render_widget(message, chunks[3]);

        let help = Paragraph::new(
            " [Tab] Voice  [↑↓] Param  [←→] Adjust (Shift: coarse)  [Space/1/2] Note  [S] Save  [P] Presets  [Q] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[4]);
    }
}
