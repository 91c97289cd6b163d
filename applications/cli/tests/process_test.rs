//! End-to-end processing of WAV files

use crossfeed_cli::wav::read_wav;
use crossfeed_cli::{load_settings, process_file};
use crossfeed_core::{CrossfeedError, SampleRate};
use crossfeed_dsp::{CrossfeedPreset, CrossfeedSettings, DELAY_FRAMES};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::Path;

const FRAMES: usize = 2048;

fn spec(channels: u16, bits: u16, sample_format: SampleFormat) -> WavSpec {
    WavSpec {
        channels,
        sample_rate: 44_100,
        bits_per_sample: bits,
        sample_format,
    }
}

/// 16-bit file with a 440 Hz tone in the left channel only
fn write_left_tone(path: &Path, channels: u16) {
    let mut writer = WavWriter::create(path, spec(channels, 16, SampleFormat::Int))
        .expect("create test wav");
    for i in 0..FRAMES {
        let phase = i as f64 * 2.0 * std::f64::consts::PI * 440.0 / 44_100.0;
        writer
            .write_sample((phase.sin() * 16_000.0) as i16)
            .expect("write sample");
        for _ in 1..channels {
            writer.write_sample(0i16).expect("write sample");
        }
    }
    writer.finalize().expect("finalize test wav");
}

fn read_i16(path: &Path) -> Vec<i16> {
    hound::WavReader::open(path)
        .expect("open output")
        .into_samples::<i16>()
        .collect::<Result<_, _>>()
        .expect("read output")
}

#[test]
fn stereo_file_gets_crossfed() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");
    write_left_tone(&input, 2);

    let settings = CrossfeedSettings::default().enabled();
    let report = process_file(&input, &output, &settings, 100).expect("processing succeeds");

    assert_eq!(report.channels, 2);
    assert_eq!(report.sample_rate, SampleRate::CD_QUALITY);
    assert_eq!(report.frames, FRAMES);
    assert!(report.crossfed);

    let samples = read_i16(&output);
    assert_eq!(samples.len(), FRAMES * 2);

    let right: Vec<i16> = samples.iter().skip(1).step_by(2).copied().collect();
    assert!(right[..DELAY_FRAMES].iter().all(|&s| s == 0));
    let peak = right.iter().map(|s| s.unsigned_abs()).max().unwrap_or(0);
    assert!(peak > 1_000, "right channel peak {}", peak);

    // Direct path is attenuated
    let left_peak = samples.iter().step_by(2).map(|s| s.unsigned_abs()).max().unwrap_or(0);
    assert!(left_peak < 16_000, "left channel peak {}", left_peak);
}

#[test]
fn block_size_does_not_change_output() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("in.wav");
    write_left_tone(&input, 2);

    let settings = CrossfeedSettings::from_preset(CrossfeedPreset::Meier).enabled();
    let mut outputs = Vec::new();
    for block_frames in [1, 13, 1024, FRAMES * 2] {
        let output = dir.path().join(format!("out_{}.wav", block_frames));
        process_file(&input, &output, &settings, block_frames).expect("processing succeeds");
        outputs.push(read_i16(&output));
    }

    assert!(outputs.windows(2).all(|pair| pair[0] == pair[1]));
}

#[test]
fn mono_file_is_copied_untouched() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("mono.wav");
    let output = dir.path().join("out.wav");
    write_left_tone(&input, 1);

    let settings = CrossfeedSettings::default().enabled();
    let report = process_file(&input, &output, &settings, 256).expect("processing succeeds");

    assert!(!report.crossfed);
    assert_eq!(read_i16(&output), read_i16(&input));
}

#[test]
fn disabled_settings_are_bit_perfect() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");
    write_left_tone(&input, 2);

    let report = process_file(&input, &output, &CrossfeedSettings::default(), 512)
        .expect("processing succeeds");

    assert!(!report.crossfed);
    assert_eq!(read_i16(&output), read_i16(&input));
}

#[test]
fn float_files_keep_their_layout() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("float.wav");
    let output = dir.path().join("out.wav");

    let mut writer =
        WavWriter::create(&input, spec(2, 32, SampleFormat::Float)).expect("create test wav");
    for _ in 0..256 {
        writer.write_sample(0.5f32).expect("write sample");
        writer.write_sample(0.0f32).expect("write sample");
    }
    writer.finalize().expect("finalize test wav");

    process_file(&input, &output, &CrossfeedSettings::default().enabled(), 64)
        .expect("processing succeeds");

    let wav = read_wav(&output).expect("read output");
    assert_eq!(wav.spec, spec(2, 32, SampleFormat::Float));
    assert_eq!(wav.frames(), 256);
    assert!(wav.samples.iter().skip(1).step_by(2).any(|&s| s != 0));
}

#[test]
fn zero_block_size_is_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("in.wav");
    write_left_tone(&input, 2);

    let err = process_file(&input, &dir.path().join("out.wav"), &CrossfeedSettings::default(), 0)
        .unwrap_err();
    assert!(matches!(err, CrossfeedError::InvalidBuffer(_)));
}

#[test]
fn missing_input_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let result = process_file(
        &dir.path().join("absent.wav"),
        &dir.path().join("out.wav"),
        &CrossfeedSettings::default(),
        64,
    );
    assert!(result.is_err());
}

#[test]
fn json_config_is_accepted() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("crossfeed.json");
    std::fs::write(&path, r#"{ "enabled": true, "preset": "relaxed", "hf_cutoff": 650 }"#)
        .expect("write config");

    let settings = load_settings(Some(&path), None).expect("valid config");
    assert!(settings.enabled);
    assert_eq!(settings.preset, CrossfeedPreset::Relaxed);
    assert_eq!(settings.hf_cutoff, 650);
}
