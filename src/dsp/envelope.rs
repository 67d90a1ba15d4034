use tracing::warn;

use crate::SILENCE_EPSILON;

/*
Time-in-Stage ADSR Envelope
===========================

Each voice owns one envelope. Unlike an incremental envelope (level +=
step every sample), this one stores only the current stage and how long it
has been in that stage. The level is recomputed from those two numbers on
every sample, which keeps the state tiny and easy to snapshot.

Vocabulary
----------

  amplitude     Peak gain of the voice (0.0 to 1.0). Every level the envelope
                produces lies in [0, amplitude].

  time_in_stage Seconds elapsed since the current stage began. Advanced by
                dt = 1/sample_rate before each evaluation.

  last_value    The level captured at the instant note_off moved the voice
                into Release. Release ramps from here, not from amplitude.

  note_active   True from note_on until Release runs out into Idle.


The Shape
---------

  Level
    amp ┐      ╱╲
        │     ╱  ╲___________
  amp*S │    ╱               ╲
        │   ╱                 ╲
    0.0 └──╱───────────────────╲──→ Time
         Attack Decay  Sustain  Release

  Attack   amp * min(1, t / attack)
  Decay    amp * (1 - (1 - S) * min(1, t / decay)), never below amp * S
  Sustain  amp * S
  Release  last_value * max(0, 1 - t / release)


Transitions
-----------

    ┌──────┐ note_on  ┌────────┐ t >= A ┌───────┐ t >= D ┌─────────┐
    │ Idle │ ───────→ │ Attack │ ─────→ │ Decay │ ─────→ │ Sustain │
    └──────┘          └────────┘        └───────┘        └─────────┘
        ↑                  │ note_off       │ note_off        │ note_off
        │                  ↓                ↓                 ↓
        │   t >= R    ┌─────────────────────────────────────────────┐
        └──────────── │                  Release                    │
         or level ~ 0 └─────────────────────────────────────────────┘

note_on is only honoured from Idle and note_off only from Attack, Decay or
Sustain. Anything else is ignored. Zero-length stages pass straight through
on the first sample that sees them.
*/

/// Stage of the envelope state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnvelopeStage {
    #[default]
    Idle, // silent, waiting for note_on
    Attack,  // ramping 0 → amplitude
    Decay,   // ramping amplitude → amplitude * sustain
    Sustain, // holding until note_off
    Release, // ramping last_value → 0
}

impl EnvelopeStage {
    pub const ALL: [EnvelopeStage; 5] = [
        EnvelopeStage::Idle,
        EnvelopeStage::Attack,
        EnvelopeStage::Decay,
        EnvelopeStage::Sustain,
        EnvelopeStage::Release,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }

    /// Decode a raw stage number. Unknown values fall back to `Idle`.
    pub fn from_index(index: u8) -> Self {
        match Self::ALL.get(index as usize) {
            Some(stage) => *stage,
            None => {
                warn!(index, "unknown envelope stage, resetting to idle");
                EnvelopeStage::Idle
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EnvelopeStage::Idle => "Idle",
            EnvelopeStage::Attack => "Attack",
            EnvelopeStage::Decay => "Decay",
            EnvelopeStage::Sustain => "Sustain",
            EnvelopeStage::Release => "Release",
        }
    }

    /// Attack, Decay and Sustain: the stages a note-off can release.
    pub fn is_held(self) -> bool {
        matches!(
            self,
            EnvelopeStage::Attack | EnvelopeStage::Decay | EnvelopeStage::Sustain
        )
    }
}

/// Envelope shape plus the voice's peak gain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adsr {
    pub amplitude: f64,
    pub attack: f64,  // seconds
    pub decay: f64,   // seconds
    pub sustain: f64, // fraction of amplitude
    pub release: f64, // seconds
}

/// Render-owned envelope state of one voice.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnvelopeState {
    pub stage: EnvelopeStage,
    pub time_in_stage: f64,
    pub last_value: f64, // level captured when Release began
    pub note_active: bool,
}

impl EnvelopeState {
    /// Advance by `dt` seconds and return this sample's level.
    #[inline]
    pub fn step(&mut self, adsr: &Adsr, dt: f64) -> f64 {
        let level = match self.stage {
            EnvelopeStage::Idle => return 0.0,
            EnvelopeStage::Attack => {
                self.time_in_stage += dt;
                self.step_attack(adsr)
            }
            EnvelopeStage::Decay => {
                self.time_in_stage += dt;
                self.step_decay(adsr)
            }
            EnvelopeStage::Sustain => {
                self.time_in_stage += dt;
                adsr.amplitude * adsr.sustain
            }
            EnvelopeStage::Release => {
                self.time_in_stage += dt;
                self.step_release(adsr)
            }
        };

        clamp_level(level, adsr.amplitude)
    }

    fn step_attack(&mut self, adsr: &Adsr) -> f64 {
        if adsr.attack <= 0.0 || self.time_in_stage >= adsr.attack {
            self.enter(EnvelopeStage::Decay);
            return adsr.amplitude;
        }
        adsr.amplitude * (self.time_in_stage / adsr.attack).min(1.0)
    }

    fn step_decay(&mut self, adsr: &Adsr) -> f64 {
        let floor = adsr.amplitude * adsr.sustain;
        if adsr.decay <= 0.0 || adsr.sustain >= 1.0 || self.time_in_stage >= adsr.decay {
            self.enter(EnvelopeStage::Sustain);
            return floor;
        }
        decay_level(self.time_in_stage, adsr).max(floor)
    }

    fn step_release(&mut self, adsr: &Adsr) -> f64 {
        if adsr.release <= 0.0 || self.last_value <= SILENCE_EPSILON {
            self.finish();
            return 0.0;
        }

        let level = self.last_value * (1.0 - self.time_in_stage / adsr.release).max(0.0);
        if self.time_in_stage >= adsr.release || level <= SILENCE_EPSILON {
            self.finish();
            return 0.0;
        }
        level
    }

    /// Gate high. Returns `false` (and changes nothing) unless the envelope is idle.
    pub fn note_on(&mut self) -> bool {
        if self.stage != EnvelopeStage::Idle {
            return false;
        }
        self.enter(EnvelopeStage::Attack);
        self.note_active = true;
        self.last_value = 0.0;
        true
    }

    /// Gate low. Captures the current level and starts Release from it.
    ///
    /// Ignored while Idle or already releasing.
    pub fn note_off(&mut self, adsr: &Adsr) -> bool {
        if !self.stage.is_held() {
            return false;
        }
        self.last_value = envelope_level(self, adsr);
        self.enter(EnvelopeStage::Release);
        true
    }

    /// Drop straight back to Idle, forgetting any note in flight.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn enter(&mut self, stage: EnvelopeStage) {
        self.stage = stage;
        self.time_in_stage = 0.0;
    }

    fn finish(&mut self) {
        self.enter(EnvelopeStage::Idle);
        self.note_active = false;
    }
}

/// Level for the current stage and time, without advancing anything.
///
/// Release and Idle evaluate to 0: a note-off can only come from a held
/// stage, so those two never feed a release ramp.
pub fn envelope_level(state: &EnvelopeState, adsr: &Adsr) -> f64 {
    let level = match state.stage {
        EnvelopeStage::Attack if adsr.attack <= 0.0 => adsr.amplitude,
        EnvelopeStage::Attack => adsr.amplitude * (state.time_in_stage / adsr.attack).min(1.0),
        EnvelopeStage::Decay if adsr.decay <= 0.0 || adsr.sustain >= 1.0 => {
            adsr.amplitude * adsr.sustain
        }
        EnvelopeStage::Decay => {
            decay_level(state.time_in_stage, adsr).max(adsr.amplitude * adsr.sustain)
        }
        EnvelopeStage::Sustain => adsr.amplitude * adsr.sustain,
        EnvelopeStage::Release | EnvelopeStage::Idle => 0.0,
    };
    clamp_level(level, adsr.amplitude)
}

#[inline]
fn decay_level(time_in_stage: f64, adsr: &Adsr) -> f64 {
    let progress = (time_in_stage / adsr.decay).min(1.0);
    adsr.amplitude * (1.0 - (1.0 - adsr.sustain) * progress)
}

#[inline]
fn clamp_level(level: f64, amplitude: f64) -> f64 {
    level.min(amplitude).max(0.0)
}
