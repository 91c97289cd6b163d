//! Crossfeed inside a pipeline
//!
//! Stream format changes, enable/disable and flush as a host would drive
//! them.

use crossfeed_core::{DspBuffer, DspId, SampleRate, StageId, StreamFormat};
use crossfeed_dsp::{CrossfeedPreset, CrossfeedSettings, DspPipeline, DELAY_FRAMES, DELAY_SLOTS};

const RATE: SampleRate = SampleRate::CD_QUALITY;

fn pipeline(settings: &CrossfeedSettings) -> DspPipeline {
    let mut pipeline = DspPipeline::with_crossfeed(DspId::AUDIO, RATE);
    settings.apply(&mut pipeline).expect("valid settings");
    pipeline
}

/// Hard-panned left sine, s3.28
fn left_only(frames: usize, format: StreamFormat) -> DspBuffer {
    let left: Vec<i32> = (0..frames)
        .map(|i| {
            let phase = i as f64 * 2.0 * std::f64::consts::PI * 440.0 / 44_100.0;
            (phase.sin() * f64::from(1 << 26)) as i32
        })
        .collect();
    DspBuffer::from_channels(&left, &vec![0; frames], format)
}

#[test]
fn enabled_pipeline_crossfeeds() {
    let mut pipeline = pipeline(&CrossfeedSettings::default().enabled());
    let mut buffer = left_only(256, StreamFormat::stereo(RATE));
    pipeline.process(&mut buffer);

    let right = buffer.channel(1);
    assert!(right[..DELAY_FRAMES].iter().all(|&s| s == 0));
    assert!(right[DELAY_FRAMES..].iter().any(|&s| s != 0));
}

#[test]
fn disabled_pipeline_is_bit_perfect() {
    let mut pipeline = pipeline(&CrossfeedSettings::default());
    let mut buffer = left_only(256, StreamFormat::stereo(RATE));
    let original = buffer.clone();
    pipeline.process(&mut buffer);

    assert_eq!(buffer, original);
    assert!(!pipeline.is_enabled(StageId::CROSSFEED));
}

#[test]
fn mono_stream_deactivates_until_stereo_returns() {
    let mut pipeline = pipeline(&CrossfeedSettings::default().enabled());
    let stereo = StreamFormat::stereo(RATE);

    pipeline.process(&mut left_only(64, stereo));
    assert!(pipeline.is_active(StageId::CROSSFEED));

    // Switch to mono: stage goes to sleep, audio untouched
    let mono = stereo.changed(1, RATE);
    let samples: Vec<i32> = (0..64).map(|i| i * 1000).collect();
    let mut buffer = DspBuffer::new(samples.clone(), mono);
    pipeline.process(&mut buffer);
    assert_eq!(buffer.samples, samples);
    assert!(!pipeline.is_active(StageId::CROSSFEED));
    assert!(pipeline.is_enabled(StageId::CROSSFEED));

    let crossfeed = pipeline.crossfeed().expect("crossfeed stage");
    assert_eq!(crossfeed.delay_line(), &[0; DELAY_SLOTS]);

    // More mono buffers of the same generation skip the stage entirely
    let mut buffer = DspBuffer::new(samples.clone(), mono);
    pipeline.process(&mut buffer);
    assert_eq!(buffer.samples, samples);

    // Back to stereo: probed, activated, and the probing block is processed
    let mut buffer = left_only(64, mono.changed(2, RATE));
    pipeline.process(&mut buffer);
    assert!(pipeline.is_active(StageId::CROSSFEED));
    assert!(buffer.channel(1)[DELAY_FRAMES..].iter().any(|&s| s != 0));
}

#[test]
fn disable_then_enable_resumes_tone_and_clears_state() {
    let settings = CrossfeedSettings::from_preset(CrossfeedPreset::Meier).enabled();
    let mut pipeline = pipeline(&settings);
    pipeline.process(&mut left_only(100, StreamFormat::stereo(RATE)));

    let coefs = pipeline.crossfeed().map(|c| c.coefs());

    assert!(pipeline.enable_stage(StageId::CROSSFEED, false));
    assert!(!pipeline.is_active(StageId::CROSSFEED));
    assert!(pipeline.enable_stage(StageId::CROSSFEED, true));
    assert!(pipeline.is_active(StageId::CROSSFEED));

    let crossfeed = pipeline.crossfeed().expect("crossfeed stage");
    assert_eq!(Some(crossfeed.coefs()), coefs);
    assert_eq!(crossfeed.delay_line(), &[0; DELAY_SLOTS]);
    assert!(crossfeed.is_probing());
}

#[test]
fn flush_matches_fresh_pipeline() {
    let settings = CrossfeedSettings::default().enabled();
    let format = StreamFormat::stereo(RATE);

    let mut used = pipeline(&settings);
    used.process(&mut left_only(500, format));
    used.flush();

    let mut fresh = pipeline(&settings);

    let mut a = left_only(300, format);
    let mut b = a.clone();
    used.process(&mut a);
    fresh.process(&mut b);
    assert_eq!(a, b);
}

#[test]
fn changing_settings_keeps_delay_line() {
    let mut pipeline = pipeline(&CrossfeedSettings::default().enabled());
    pipeline.process(&mut left_only(20, StreamFormat::stereo(RATE)));
    let delay = pipeline.crossfeed().map(|c| *c.delay_line());

    CrossfeedSettings::from_preset(CrossfeedPreset::Natural)
        .enabled()
        .apply(&mut pipeline)
        .expect("valid settings");

    assert_eq!(pipeline.crossfeed().map(|c| *c.delay_line()), delay);
}

#[test]
fn presets_differ_in_crossfeed_level() {
    let format = StreamFormat::stereo(RATE);
    let energy = |preset: CrossfeedPreset| -> f64 {
        let mut pipeline = pipeline(&CrossfeedSettings::from_preset(preset).enabled());
        let mut buffer = left_only(2048, format);
        pipeline.process(&mut buffer);
        buffer
            .channel(1)
            .iter()
            .map(|&s| f64::from(s) * f64::from(s))
            .sum()
    };

    let natural = energy(CrossfeedPreset::Natural);
    let classic = energy(CrossfeedPreset::Classic);
    let meier = energy(CrossfeedPreset::Meier);
    assert!(natural > classic, "natural {} classic {}", natural, classic);
    assert!(classic > meier, "classic {} meier {}", classic, meier);
}
