use std::fs;

use duosynth::preset::{store::load_path, PresetStore};
use duosynth::{Preset, PresetError, Synth, VoiceId, Waveform};

fn custom_preset() -> Preset {
    let mut preset = Preset::default();
    let one = preset.voice_mut(VoiceId::One);
    one.frequency = 261.625;
    one.waveform = Waveform::Sawtooth;
    one.release_time = 1.25;
    let two = preset.voice_mut(VoiceId::Two);
    two.amplitude = 0.125;
    two.waveform = Waveform::Triangle;
    two.sustain_level = 0.333333;
    preset
}

#[test]
fn save_then_load_restores_every_field() {
    let dir = tempfile::tempdir().unwrap();
    let store = PresetStore::new(dir.path().join("presets"));
    let preset = custom_preset();

    let path = store.save("bright lead", &preset).unwrap();

    assert_eq!(path, dir.path().join("presets/bright_lead.synthpreset"));
    assert_eq!(store.load("bright lead").unwrap(), preset);
    assert_eq!(load_path(&path).unwrap(), preset);
}

#[test]
fn listing_only_returns_preset_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = PresetStore::new(dir.path());
    store.save("zeta", &Preset::default()).unwrap();
    store.save("alpha", &Preset::default()).unwrap();
    fs::write(dir.path().join("notes.txt"), "not a preset").unwrap();
    fs::write(dir.path().join("alpha.synthpreset.bak"), "old").unwrap();
    fs::create_dir(dir.path().join("folder.synthpreset")).unwrap();

    assert_eq!(store.list().unwrap(), vec!["alpha", "zeta"]);
}

#[test]
fn synth_round_trips_through_a_preset_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = PresetStore::new(dir.path());

    let source = Synth::default();
    source.set_frequency(VoiceId::Two, 880.0).unwrap();
    source.set_waveform(VoiceId::One, Waveform::Square).unwrap();
    source.set_decay(VoiceId::One, 0.75).unwrap();
    store.save("patch", &source.to_preset().unwrap()).unwrap();

    let target = Synth::default();
    target.note_on(VoiceId::One).unwrap();
    target.apply_preset(&store.load("patch").unwrap()).unwrap();

    assert_eq!(target.to_preset().unwrap(), source.to_preset().unwrap());
    let snapshot = target.snapshot().unwrap();
    assert!(!snapshot.voice(VoiceId::One).note_active(), "load silences voices");
}

#[test]
fn out_of_range_values_are_clamped_when_applied() {
    let text = Preset::default()
        .to_string()
        .replace("amplitude1: 0.500000", "amplitude1: 4.0")
        .replace("frequency2: 660.000000", "frequency2: 5");
    let preset: Preset = text.parse().unwrap();
    assert_eq!(preset.voice(VoiceId::One).amplitude, 4.0);

    let synth = Synth::default();
    synth.apply_preset(&preset).unwrap();

    assert_eq!(synth.params(VoiceId::One).unwrap().amplitude, 1.0);
    assert_eq!(synth.params(VoiceId::Two).unwrap().frequency, 20.0);
}

#[test]
fn malformed_file_reports_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = PresetStore::new(dir.path());
    let text = Preset::default()
        .to_string()
        .replace("sustainLevel2: 0.500000", "sustainLevel2: lots");
    fs::write(store.path_for("broken"), text).unwrap();

    let err = store.load("broken").unwrap_err();

    assert!(matches!(
        err,
        PresetError::InvalidValue {
            key: "sustainLevel2",
            line: 13,
            ..
        }
    ));
    assert_eq!(err.to_string(), "line 13: invalid value 'lots' for sustainLevel2");
}

#[test]
fn truncated_file_lists_missing_keys() {
    let dir = tempfile::tempdir().unwrap();
    let store = PresetStore::new(dir.path());
    let text: String = Preset::default().to_string().lines().take(7).map(|l| format!("{l}\n")).collect();
    fs::write(store.path_for("half"), text).unwrap();

    match store.load("half") {
        Err(PresetError::MissingFields(missing)) => {
            assert_eq!(missing.len(), 7);
            assert!(missing.iter().all(|k| k.ends_with('2')));
        }
        other => panic!("expected MissingFields, got {other:?}"),
    }
}
