//! Saved voice settings: the `key: value` text format and a directory of preset files.

use std::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::PresetError;
use crate::synth::voice::{VoiceId, VoiceParams};

pub mod format;
pub mod store;

pub use store::PresetStore;

/// File suffix of preset files.
pub const PRESET_SUFFIX: &str = ".synthpreset";
/// Directory presets are read from and saved to unless configured otherwise.
pub const DEFAULT_PRESET_DIR: &str = "presets";

/// Parameters of both voices. Render state is never saved.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub voices: [VoiceParams; 2],
}

impl Preset {
    pub fn voice(&self, id: VoiceId) -> &VoiceParams {
        &self.voices[id.index()]
    }

    pub fn voice_mut(&mut self, id: VoiceId) -> &mut VoiceParams {
        &mut self.voices[id.index()]
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self {
            voices: [VoiceParams::voice_one(), VoiceParams::voice_two()],
        }
    }
}

impl FromStr for Preset {
    type Err = PresetError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        format::parse(text)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format::write(self, f)
    }
}
