use crate::dsp::oscillator::Waveform;
use crate::error::SynthError;
use crate::synth::shared::Synth;
use crate::synth::voice::{VoiceId, VoiceParams};

/// One control-surface edit, described as a value.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ControlMessage {
    SetFrequency { voice: VoiceId, hz: f64 },
    SetAmplitude { voice: VoiceId, gain: f64 },
    SetWaveform { voice: VoiceId, waveform: Waveform },
    SetAttack { voice: VoiceId, seconds: f64 },
    SetDecay { voice: VoiceId, seconds: f64 },
    SetSustain { voice: VoiceId, level: f64 },
    SetRelease { voice: VoiceId, seconds: f64 },
    NoteOn { voice: VoiceId },
    NoteOff { voice: VoiceId },
    ToggleNote { voice: VoiceId },
}

impl ControlMessage {
    pub fn voice(&self) -> VoiceId {
        match *self {
            ControlMessage::SetFrequency { voice, .. }
            | ControlMessage::SetAmplitude { voice, .. }
            | ControlMessage::SetWaveform { voice, .. }
            | ControlMessage::SetAttack { voice, .. }
            | ControlMessage::SetDecay { voice, .. }
            | ControlMessage::SetSustain { voice, .. }
            | ControlMessage::SetRelease { voice, .. }
            | ControlMessage::NoteOn { voice }
            | ControlMessage::NoteOff { voice }
            | ControlMessage::ToggleNote { voice } => voice,
        }
    }
}

impl Synth {
    /// Dispatch a message to the matching lock-scoped method.
    pub fn apply(&self, message: ControlMessage) -> Result<(), SynthError> {
        match message {
            ControlMessage::SetFrequency { voice, hz } => self.set_frequency(voice, hz),
            ControlMessage::SetAmplitude { voice, gain } => self.set_amplitude(voice, gain),
            ControlMessage::SetWaveform { voice, waveform } => self.set_waveform(voice, waveform),
            ControlMessage::SetAttack { voice, seconds } => self.set_attack(voice, seconds),
            ControlMessage::SetDecay { voice, seconds } => self.set_decay(voice, seconds),
            ControlMessage::SetSustain { voice, level } => self.set_sustain(voice, level),
            ControlMessage::SetRelease { voice, seconds } => self.set_release(voice, seconds),
            ControlMessage::NoteOn { voice } => self.note_on(voice).map(drop),
            ControlMessage::NoteOff { voice } => self.note_off(voice).map(drop),
            ControlMessage::ToggleNote { voice } => self.toggle_note(voice).map(drop),
        }
    }
}

/// The seven editable parameters of a voice, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    Frequency,
    Amplitude,
    Waveform,
    Attack,
    Decay,
    Sustain,
    Release,
}

/// One semitone.
const SEMITONE: f64 = 1.059_463_094_359_295_3;

impl Param {
    pub const ALL: [Param; 7] = [
        Param::Frequency,
        Param::Amplitude,
        Param::Waveform,
        Param::Attack,
        Param::Decay,
        Param::Sustain,
        Param::Release,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Param::Frequency => "Frequency",
            Param::Amplitude => "Amplitude",
            Param::Waveform => "Waveform",
            Param::Attack => "Attack",
            Param::Decay => "Decay",
            Param::Sustain => "Sustain",
            Param::Release => "Release",
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self as usize + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self as usize + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Current value formatted for display.
    pub fn format(self, params: &VoiceParams) -> String {
        match self {
            Param::Frequency => format!("{:.1} Hz", params.frequency),
            Param::Amplitude => format!("{:.2}", params.amplitude),
            Param::Waveform => params.waveform.to_string(),
            Param::Attack => format!("{:.3} s", params.attack_time),
            Param::Decay => format!("{:.3} s", params.decay_time),
            Param::Sustain => format!("{:.2}", params.sustain_level),
            Param::Release => format!("{:.3} s", params.release_time),
        }
    }

    /// Message that moves this parameter `steps` notches from its current value.
    ///
    /// Frequency moves in 1 Hz notches, or semitones when `coarse`. Levels move
    /// by 0.01 (0.1 coarse) and times by 10 ms (100 ms coarse). Waveform steps
    /// through the list either way. Range limits are left to the setters.
    pub fn nudge(self, voice: VoiceId, params: &VoiceParams, steps: i32, coarse: bool) -> ControlMessage {
        let steps = f64::from(steps);
        let level_step = if coarse { 0.1 } else { 0.01 };
        let time_step = if coarse { 0.1 } else { 0.01 };

        match self {
            Param::Frequency => {
                let hz = if coarse {
                    params.frequency * SEMITONE.powf(steps)
                } else {
                    params.frequency + steps
                };
                ControlMessage::SetFrequency { voice, hz }
            }
            Param::Amplitude => ControlMessage::SetAmplitude {
                voice,
                gain: params.amplitude + steps * level_step,
            },
            Param::Waveform => {
                let mut waveform = params.waveform;
                for _ in 0..steps.abs() as usize {
                    waveform = if steps > 0.0 { waveform.next() } else { waveform.prev() };
                }
                ControlMessage::SetWaveform { voice, waveform }
            }
            Param::Attack => ControlMessage::SetAttack {
                voice,
                seconds: params.attack_time + steps * time_step,
            },
            Param::Decay => ControlMessage::SetDecay {
                voice,
                seconds: params.decay_time + steps * time_step,
            },
            Param::Sustain => ControlMessage::SetSustain {
                voice,
                level: params.sustain_level + steps * level_step,
            },
            Param::Release => ControlMessage::SetRelease {
                voice,
                seconds: params.release_time + steps * time_step,
            },
        }
    }
}
