use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::envelope::{envelope_level, Adsr, EnvelopeStage, EnvelopeState};
use crate::dsp::oscillator::{advance_phase, Waveform};
use crate::SILENCE_EPSILON;

/// Audible range accepted for oscillator frequency.
pub const FREQ_MIN: f64 = 20.0;
pub const FREQ_MAX: f64 = 20_000.0;
/// Longest attack, decay or release accepted from the control surface.
pub const MAX_STAGE_SECONDS: f64 = 10.0;

/// Which of the two voices an operation targets.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoiceId {
    One,
    Two,
}

impl VoiceId {
    pub const ALL: [VoiceId; 2] = [VoiceId::One, VoiceId::Two];

    pub fn index(self) -> usize {
        match self {
            VoiceId::One => 0,
            VoiceId::Two => 1,
        }
    }

    /// 1-based number, as shown to the user and used in preset keys.
    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }

    pub fn other(self) -> Self {
        match self {
            VoiceId::One => VoiceId::Two,
            VoiceId::Two => VoiceId::One,
        }
    }
}

impl fmt::Display for VoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Voice {}", self.number())
    }
}

/// Control-owned settings of one voice.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceParams {
    pub frequency: f64, // Hz
    pub amplitude: f64, // peak gain, 0.0 - 1.0
    pub waveform: Waveform,
    pub attack_time: f64,   // seconds
    pub decay_time: f64,    // seconds
    pub sustain_level: f64, // fraction of amplitude, 0.0 - 1.0
    pub release_time: f64,  // seconds
}

impl VoiceParams {
    /// A4 sine with a short pluck.
    pub fn voice_one() -> Self {
        Self {
            frequency: 440.0,
            amplitude: 0.5,
            waveform: Waveform::Sine,
            attack_time: 0.01,
            decay_time: 0.1,
            sustain_level: 0.7,
            release_time: 0.3,
        }
    }

    /// A fifth above voice one, square, softer and slower.
    pub fn voice_two() -> Self {
        Self {
            frequency: 660.0,
            amplitude: 0.3,
            waveform: Waveform::Square,
            attack_time: 0.05,
            decay_time: 0.2,
            sustain_level: 0.5,
            release_time: 0.5,
        }
    }

    pub fn defaults_for(voice: VoiceId) -> Self {
        match voice {
            VoiceId::One => Self::voice_one(),
            VoiceId::Two => Self::voice_two(),
        }
    }

    pub fn adsr(&self) -> Adsr {
        Adsr {
            amplitude: self.amplitude,
            attack: self.attack_time,
            decay: self.decay_time,
            sustain: self.sustain_level,
            release: self.release_time,
        }
    }

    // Setters clamp into range and ignore non-finite input.

    pub fn set_frequency(&mut self, hz: f64) {
        if hz.is_finite() {
            self.frequency = hz.clamp(FREQ_MIN, FREQ_MAX);
        }
    }

    pub fn set_amplitude(&mut self, gain: f64) {
        if gain.is_finite() {
            self.amplitude = gain.clamp(0.0, 1.0);
        }
    }

    pub fn set_attack(&mut self, seconds: f64) {
        if seconds.is_finite() {
            self.attack_time = seconds.clamp(0.0, MAX_STAGE_SECONDS);
        }
    }

    pub fn set_decay(&mut self, seconds: f64) {
        if seconds.is_finite() {
            self.decay_time = seconds.clamp(0.0, MAX_STAGE_SECONDS);
        }
    }

    pub fn set_sustain(&mut self, level: f64) {
        if level.is_finite() {
            self.sustain_level = level.clamp(0.0, 1.0);
        }
    }

    pub fn set_release(&mut self, seconds: f64) {
        if seconds.is_finite() {
            self.release_time = seconds.clamp(0.0, MAX_STAGE_SECONDS);
        }
    }

    /// Copy of `other` pushed through the setters, falling back to `self`
    /// for any field that is not finite.
    pub fn merged_from(mut self, other: &VoiceParams) -> Self {
        self.set_frequency(other.frequency);
        self.set_amplitude(other.amplitude);
        self.waveform = other.waveform;
        self.set_attack(other.attack_time);
        self.set_decay(other.decay_time);
        self.set_sustain(other.sustain_level);
        self.set_release(other.release_time);
        self
    }
}

impl Default for VoiceParams {
    fn default() -> Self {
        Self::voice_one()
    }
}

/// Render-owned state of one voice.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VoiceState {
    pub phase: f64, // radians, [0, 2π)
    pub envelope: EnvelopeState,
}

/// One oscillator + envelope: its settings and where it is in its note.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Voice {
    pub params: VoiceParams,
    pub state: VoiceState,
}

impl Voice {
    pub fn new(params: VoiceParams) -> Self {
        Self {
            params,
            state: VoiceState::default(),
        }
    }

    /// Start a note from Idle; resets phase so every note starts at zero crossing.
    pub fn note_on(&mut self) -> bool {
        if !self.state.envelope.note_on() {
            return false;
        }
        self.state.phase = 0.0;
        true
    }

    pub fn note_off(&mut self) -> bool {
        self.state.envelope.note_off(&self.params.adsr())
    }

    pub fn reset(&mut self) {
        self.state = VoiceState::default();
    }

    /// Advance one sample and return the enveloped waveform value.
    ///
    /// While the envelope is silent the waveform is not evaluated and the
    /// phase holds.
    #[inline]
    pub fn next_sample(&mut self, dt: f64, increment: f64) -> f64 {
        let level = self.state.envelope.step(&self.params.adsr(), dt);
        if level <= SILENCE_EPSILON {
            return 0.0;
        }

        let raw = self.params.waveform.sample(self.state.phase).clamp(-1.0, 1.0);
        self.state.phase = advance_phase(self.state.phase, increment);
        raw * level
    }

    /// Envelope level at the current stage and time.
    pub fn envelope_level(&self) -> f64 {
        envelope_level(&self.state.envelope, &self.params.adsr())
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.state.envelope.stage
    }

    pub fn note_active(&self) -> bool {
        self.state.envelope.note_active
    }
}
