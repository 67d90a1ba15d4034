use std::fmt;

use tracing::warn;

use crate::dsp::oscillator::Waveform;
use crate::error::PresetError;
use crate::preset::Preset;
use crate::synth::voice::{VoiceId, VoiceParams};

/*
Preset Text Format
==================

Fourteen lines, one `key: value` pair each, voice 1 first:

    frequency1: 440.000000
    amplitude1: 0.500000
    waveform1: 0
    attackTime1: 0.010000
    decayTime1: 0.100000
    sustainLevel1: 0.700000
    releaseTime1: 0.300000
    frequency2: 660.000000
    ...

Waveform is an integer index (0 sine, 1 square, 2 sawtooth, 3 triangle);
everything else is a decimal written with six places.

Reading is forgiving about layout and strict about values:
  - blank lines and `#` comments are skipped
  - malformed lines and unknown keys are skipped with a warning
  - a known key with an unparseable value fails the whole load
  - all fourteen keys must be present
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Frequency,
    Amplitude,
    Waveform,
    Attack,
    Decay,
    Sustain,
    Release,
}

#[derive(Debug, Clone, Copy)]
struct Key {
    name: &'static str,
    voice: VoiceId,
    field: Field,
}

const fn key(name: &'static str, voice: VoiceId, field: Field) -> Key {
    Key { name, voice, field }
}

/// Every key, in write order.
const KEYS: [Key; 14] = [
    key("frequency1", VoiceId::One, Field::Frequency),
    key("amplitude1", VoiceId::One, Field::Amplitude),
    key("waveform1", VoiceId::One, Field::Waveform),
    key("attackTime1", VoiceId::One, Field::Attack),
    key("decayTime1", VoiceId::One, Field::Decay),
    key("sustainLevel1", VoiceId::One, Field::Sustain),
    key("releaseTime1", VoiceId::One, Field::Release),
    key("frequency2", VoiceId::Two, Field::Frequency),
    key("amplitude2", VoiceId::Two, Field::Amplitude),
    key("waveform2", VoiceId::Two, Field::Waveform),
    key("attackTime2", VoiceId::Two, Field::Attack),
    key("decayTime2", VoiceId::Two, Field::Decay),
    key("sustainLevel2", VoiceId::Two, Field::Sustain),
    key("releaseTime2", VoiceId::Two, Field::Release),
];

impl Field {
    fn get(self, params: &VoiceParams) -> f64 {
        match self {
            Field::Frequency => params.frequency,
            Field::Amplitude => params.amplitude,
            Field::Waveform => f64::from(params.waveform.index()),
            Field::Attack => params.attack_time,
            Field::Decay => params.decay_time,
            Field::Sustain => params.sustain_level,
            Field::Release => params.release_time,
        }
    }

    fn set(self, params: &mut VoiceParams, value: f64) {
        match self {
            Field::Frequency => params.frequency = value,
            Field::Amplitude => params.amplitude = value,
            Field::Attack => params.attack_time = value,
            Field::Decay => params.decay_time = value,
            Field::Sustain => params.sustain_level = value,
            Field::Release => params.release_time = value,
            // Parsed separately as an integer index.
            Field::Waveform => {}
        }
    }
}

/// Parse preset text.
pub fn parse(text: &str) -> Result<Preset, PresetError> {
    let mut preset = Preset::default();
    let mut seen = [false; KEYS.len()];

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some((name, value)) = trimmed.split_once(':') else {
            warn!(line, text = trimmed, "preset line has no ':' separator, skipping");
            continue;
        };
        let (name, value) = (name.trim(), value.trim());
        if name.is_empty() || value.is_empty() {
            warn!(line, text = trimmed, "preset line has an empty key or value, skipping");
            continue;
        }

        let Some(slot) = KEYS.iter().position(|k| k.name == name) else {
            warn!(line, key = name, "unknown preset key, skipping");
            continue;
        };
        let key = KEYS[slot];
        let params = preset.voice_mut(key.voice);

        if key.field == Field::Waveform {
            let index: i64 = value.parse().map_err(|_| invalid(key, line, value))?;
            params.waveform =
                Waveform::from_index(index).ok_or(PresetError::InvalidWaveform { line, index })?;
        } else {
            let number: f64 = value.parse().map_err(|_| invalid(key, line, value))?;
            if !number.is_finite() {
                return Err(invalid(key, line, value));
            }
            key.field.set(params, number);
        }
        seen[slot] = true;
    }

    let missing: Vec<&'static str> = KEYS
        .iter()
        .zip(seen)
        .filter(|(_, seen)| !seen)
        .map(|(k, _)| k.name)
        .collect();
    if !missing.is_empty() {
        return Err(PresetError::MissingFields(missing));
    }

    Ok(preset)
}

fn invalid(key: Key, line: usize, value: &str) -> PresetError {
    PresetError::InvalidValue {
        key: key.name,
        line,
        value: value.to_owned(),
    }
}

/// Write all fourteen keys in order.
pub fn write(preset: &Preset, out: &mut impl fmt::Write) -> fmt::Result {
    for key in KEYS {
        let params = preset.voice(key.voice);
        match key.field {
            Field::Waveform => writeln!(out, "{}: {}", key.name, params.waveform.index())?,
            field => writeln!(out, "{}: {:.6}", key.name, field.get(params))?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_fourteen_lines_in_order() {
        let text = Preset::default().to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 14);
        assert_eq!(lines[0], "frequency1: 440.000000");
        assert_eq!(lines[2], "waveform1: 0");
        assert_eq!(lines[9], "waveform2: 1");
        assert_eq!(lines[13], "releaseTime2: 0.500000");
    }

    #[test]
    fn parse_tolerates_layout_noise() {
        let mut text = String::from("# saved by hand\n\n   \n");
        text.push_str("no separator here\n");
        text.push_str("mystery: 12\n");
        text.push_str(": 3\n");
        for line in Preset::default().to_string().lines() {
            text.push_str(&format!("   {line}   \n"));
        }

        assert_eq!(parse(&text).unwrap(), Preset::default());
    }

    #[test]
    fn later_duplicate_wins() {
        let mut text = Preset::default().to_string();
        text.push_str("frequency2: 123.5\n");

        let preset = parse(&text).unwrap();
        assert_eq!(preset.voice(VoiceId::Two).frequency, 123.5);
    }

    #[test]
    fn bad_value_names_key_and_line() {
        let text = Preset::default()
            .to_string()
            .replace("decayTime1: 0.100000", "decayTime1: slow");

        match parse(&text) {
            Err(PresetError::InvalidValue { key, line, value }) => {
                assert_eq!(key, "decayTime1");
                assert_eq!(line, 5);
                assert_eq!(value, "slow");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn waveform_index_out_of_range() {
        let text = Preset::default().to_string().replace("waveform2: 1", "waveform2: 7");
        assert!(matches!(
            parse(&text),
            Err(PresetError::InvalidWaveform { line: 10, index: 7 })
        ));
    }

    #[test]
    fn missing_fields_are_listed() {
        let text: String = Preset::default()
            .to_string()
            .lines()
            .filter(|l| !l.starts_with("amplitude"))
            .map(|l| format!("{l}\n"))
            .collect();

        match parse(&text) {
            Err(PresetError::MissingFields(missing)) => {
                assert_eq!(missing, vec!["amplitude1", "amplitude2"]);
            }
            other => panic!("expected MissingFields, got {other:?}"),
        }
    }

    #[test]
    fn empty_text_misses_everything() {
        match parse("") {
            Err(PresetError::MissingFields(missing)) => assert_eq!(missing.len(), 14),
            other => panic!("expected MissingFields, got {other:?}"),
        }
    }
}
