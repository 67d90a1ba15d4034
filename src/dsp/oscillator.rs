use std::f64::consts::{FRAC_2_PI, PI, TAU};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Stateless Oscillator
====================

The oscillator here keeps no state of its own. The voice owns the phase (an
angle in [0, 2π)), and the oscillator only maps that angle to a sample:

  Sine      sin(φ)                       smooth, fundamental only
  Square    +1 if sin(φ) >= 0 else -1    hollow, odd harmonics
  Sawtooth  (φ mod 2π) / π - 1           bright, all harmonics
  Triangle  (2/π) · asin(sin(φ))         soft, odd harmonics falling as 1/n²

       Sine          Square         Sawtooth       Triangle
   1 ┤ ╭─╮        1 ┤┌──┐         1 ┤   ╱│  ╱    1 ┤  ╱╲
     │╱   ╲         ││  │           │  ╱ │ ╱       │ ╱  ╲
   0 ┼─────╲───   0 ┼┼──┼───      0 ┼─╱──┼╱──    0 ┼╱────╲───
     │      ╲ ╱     │   │  │        │╱   │         │      ╲ ╱
  -1 ┤       ╰   -1 ┤   └──┘     -1 ┤    │      -1 ┤       ╲╱
     0    π    2π   0    π   2π     0    π  2π     0   π    2π

Phase advances by 2π · f / sample_rate per sample and wraps back into
[0, 2π), so it never grows without bound.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl Waveform {
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Sawtooth,
        Waveform::Triangle,
    ];

    /// Stable index used by the preset format.
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() as usize + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() as usize + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "Sine",
            Waveform::Square => "Square",
            Waveform::Sawtooth => "Sawtooth",
            Waveform::Triangle => "Triangle",
        }
    }

    /// Raw sample in [-1, 1] at `phase` radians.
    #[inline]
    pub fn sample(self, phase: f64) -> f64 {
        match self {
            Waveform::Sine => phase.sin(),
            Waveform::Square => {
                if phase.sin() >= 0.0 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => phase.rem_euclid(TAU) / PI - 1.0,
            Waveform::Triangle => FRAC_2_PI * phase.sin().asin(),
        }
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Phase step in radians per sample.
#[inline]
pub fn phase_increment(frequency: f64, sample_rate: f64) -> f64 {
    TAU * frequency / sample_rate
}

/// Add `increment` to `phase` and wrap into [0, 2π).
#[inline]
pub fn advance_phase(phase: f64, increment: f64) -> f64 {
    let wrapped = (phase + increment) % TAU;
    let wrapped = if wrapped < 0.0 { wrapped + TAU } else { wrapped };
    // -tiny + TAU rounds to TAU itself
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}
