use std::sync::{Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::dsp::oscillator::{advance_phase, Waveform};
use crate::error::SynthError;
use crate::preset::Preset;
use crate::synth::voice::{Voice, VoiceId, VoiceParams};
use crate::DEFAULT_SAMPLE_RATE;

/// Startup settings for a [`Synth`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthConfig {
    pub sample_rate: f64,
    pub voices: [VoiceParams; 2],
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            voices: [VoiceParams::voice_one(), VoiceParams::voice_two()],
        }
    }
}

/// Everything the lock protects.
#[derive(Debug)]
pub(crate) struct SynthState {
    pub(crate) voices: [Voice; 2],
    /// Bumped by every note transition or preset load on that voice.
    pub(crate) generations: [u64; 2],
    pub(crate) sample_rate: f64,
}

impl SynthState {
    /// Write back what one block advanced.
    ///
    /// A voice whose generation moved since the snapshot was retriggered or
    /// released by the control side mid-block; its state is left alone so that
    /// transition survives.
    pub(crate) fn commit(&mut self, rendered: &[Voice; 2], generations: &[u64; 2]) -> bool {
        let mut all_committed = true;
        for (slot, (voice, rendered)) in self.voices.iter_mut().zip(rendered).enumerate() {
            if self.generations[slot] != generations[slot] {
                all_committed = false;
                continue;
            }
            let envelope = &mut voice.state.envelope;
            voice.state.phase = rendered.state.phase;
            envelope.stage = rendered.state.envelope.stage;
            envelope.time_in_stage = rendered.state.envelope.time_in_stage;
            envelope.note_active = rendered.state.envelope.note_active;
        }
        all_committed
    }

    fn bump(&mut self, voice: VoiceId) {
        let generation = &mut self.generations[voice.index()];
        *generation = generation.wrapping_add(1);
    }
}

/// Read-only copy of the whole synth, for display and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthSnapshot {
    pub voices: [Voice; 2],
    pub sample_rate: f64,
}

impl SynthSnapshot {
    pub fn voice(&self, id: VoiceId) -> &Voice {
        &self.voices[id.index()]
    }
}

/// Two voices and a sample rate behind one mutex.
///
/// Every method takes the lock for a constant amount of work and releases it
/// before returning. The only failure is a poisoned lock.
#[derive(Debug)]
pub struct Synth {
    state: Mutex<SynthState>,
}

impl Synth {
    pub fn new(config: SynthConfig) -> Self {
        let voices = VoiceId::ALL.map(|id| {
            Voice::new(VoiceParams::defaults_for(id).merged_from(&config.voices[id.index()]))
        });
        Self::with_voices(voices, config.sample_rate)
    }

    /// Build from fully specified voices, render state included.
    ///
    /// Parameters go through the same sanitation as the setters; a field that
    /// is not finite falls back to that voice's default.
    pub fn with_voices(voices: [Voice; 2], sample_rate: f64) -> Self {
        let voices = VoiceId::ALL.map(|id| sanitise_voice(id, voices[id.index()]));
        let sample_rate = if sample_rate.is_finite() && sample_rate > 0.0 {
            sample_rate
        } else {
            warn!(sample_rate, "invalid sample rate, using default");
            DEFAULT_SAMPLE_RATE
        };
        Self {
            state: Mutex::new(SynthState {
                voices,
                generations: [0; 2],
                sample_rate,
            }),
        }
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, SynthState>, SynthError> {
        self.state.lock().map_err(|_| SynthError::LockPoisoned)
    }

    fn with_voice<R>(&self, id: VoiceId, f: impl FnOnce(&mut Voice) -> R) -> Result<R, SynthError> {
        let mut state = self.lock()?;
        Ok(f(&mut state.voices[id.index()]))
    }

    pub fn set_frequency(&self, voice: VoiceId, hz: f64) -> Result<(), SynthError> {
        self.with_voice(voice, |v| v.params.set_frequency(hz))
    }

    pub fn set_amplitude(&self, voice: VoiceId, gain: f64) -> Result<(), SynthError> {
        self.with_voice(voice, |v| v.params.set_amplitude(gain))
    }

    pub fn set_waveform(&self, voice: VoiceId, waveform: Waveform) -> Result<(), SynthError> {
        self.with_voice(voice, |v| v.params.waveform = waveform)
    }

    pub fn set_attack(&self, voice: VoiceId, seconds: f64) -> Result<(), SynthError> {
        self.with_voice(voice, |v| v.params.set_attack(seconds))
    }

    pub fn set_decay(&self, voice: VoiceId, seconds: f64) -> Result<(), SynthError> {
        self.with_voice(voice, |v| v.params.set_decay(seconds))
    }

    pub fn set_sustain(&self, voice: VoiceId, level: f64) -> Result<(), SynthError> {
        self.with_voice(voice, |v| v.params.set_sustain(level))
    }

    pub fn set_release(&self, voice: VoiceId, seconds: f64) -> Result<(), SynthError> {
        self.with_voice(voice, |v| v.params.set_release(seconds))
    }

    /// Start a note. Returns `false` if the voice was not idle.
    pub fn note_on(&self, voice: VoiceId) -> Result<bool, SynthError> {
        let mut state = self.lock()?;
        let started = state.voices[voice.index()].note_on();
        if started {
            state.bump(voice);
        }
        drop(state);

        debug!(%voice, started, "note on");
        Ok(started)
    }

    /// Release a held note. Returns `false` if nothing was held.
    pub fn note_off(&self, voice: VoiceId) -> Result<bool, SynthError> {
        let mut state = self.lock()?;
        let released = state.voices[voice.index()].note_off();
        if released {
            state.bump(voice);
        }
        drop(state);

        debug!(%voice, released, "note off");
        Ok(released)
    }

    /// Note-on from Idle, note-off from a held stage, nothing while releasing.
    pub fn toggle_note(&self, voice: VoiceId) -> Result<bool, SynthError> {
        let mut state = self.lock()?;
        let target = &mut state.voices[voice.index()];
        let changed = if target.stage().is_held() {
            target.note_off()
        } else {
            target.note_on()
        };
        let stage = target.stage();
        if changed {
            state.bump(voice);
        }
        drop(state);

        debug!(%voice, changed, ?stage, "note toggle");
        Ok(changed)
    }

    pub fn params(&self, voice: VoiceId) -> Result<VoiceParams, SynthError> {
        self.with_voice(voice, |v| v.params)
    }

    pub fn snapshot(&self) -> Result<SynthSnapshot, SynthError> {
        let state = self.lock()?;
        Ok(SynthSnapshot {
            voices: state.voices,
            sample_rate: state.sample_rate,
        })
    }

    pub fn sample_rate(&self) -> Result<f64, SynthError> {
        Ok(self.lock()?.sample_rate)
    }

    /// Adopt the device's rate. Non-positive or non-finite rates are ignored.
    pub fn set_sample_rate(&self, hz: f64) -> Result<(), SynthError> {
        if !(hz.is_finite() && hz > 0.0) {
            warn!(hz, "ignoring invalid sample rate");
            return Ok(());
        }
        self.lock()?.sample_rate = hz;
        Ok(())
    }

    /// Replace both voices' parameters and silence them.
    pub fn apply_preset(&self, preset: &Preset) -> Result<(), SynthError> {
        let mut state = self.lock()?;
        for id in VoiceId::ALL {
            let voice = &mut state.voices[id.index()];
            voice.params = voice.params.merged_from(preset.voice(id));
            voice.reset();
            state.bump(id);
        }
        Ok(())
    }

    pub fn to_preset(&self) -> Result<Preset, SynthError> {
        let state = self.lock()?;
        Ok(Preset {
            voices: state.voices.map(|v| v.params),
        })
    }

    /// Poison the lock the way a panicking control thread would.
    #[cfg(test)]
    pub(crate) fn poison(&self) {
        let _ = std::thread::scope(|scope| {
            scope
                .spawn(|| {
                    let _guard = self.state.lock();
                    panic!("poisoning synth state");
                })
                .join()
        });
    }
}

fn sanitise_voice(id: VoiceId, mut voice: Voice) -> Voice {
    voice.params = VoiceParams::defaults_for(id).merged_from(&voice.params);
    let state = &mut voice.state;
    state.phase = if state.phase.is_finite() {
        advance_phase(state.phase, 0.0)
    } else {
        0.0
    };
    let envelope = &mut state.envelope;
    if !envelope.time_in_stage.is_finite() || envelope.time_in_stage < 0.0 {
        envelope.time_in_stage = 0.0;
    }
    if !envelope.last_value.is_finite() {
        envelope.last_value = 0.0;
    }
    voice
}

impl Default for Synth {
    fn default() -> Self {
        Self::new(SynthConfig::default())
    }
}
