//! Control-surface state that lives only on the UI thread.

use duosynth::{synth::Param, VoiceId};

/// Severity of the message shown above the help bar
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
}

pub struct UiState {
    /// Voice the arrow keys edit
    pub voice: VoiceId,
    /// Parameter the arrow keys edit
    pub param: Param,
    /// Name of the preset last loaded or saved
    pub preset_name: Option<String>,
    /// Position in the preset list for the next `p`
    pub preset_cursor: usize,
    pub message: String,
    pub message_kind: MessageKind,
}

impl UiState {
    pub fn new(preset_name: Option<String>) -> Self {
        let message = match &preset_name {
            Some(name) => format!("Loaded preset '{name}'"),
            None => "Ready".to_owned(),
        };
        Self {
            voice: VoiceId::One,
            param: Param::Frequency,
            preset_name,
            preset_cursor: 0,
            message,
            message_kind: MessageKind::Info,
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.message_kind = MessageKind::Info;
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.message_kind = MessageKind::Error;
    }
}
