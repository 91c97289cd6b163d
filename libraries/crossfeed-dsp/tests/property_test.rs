//! Property-based tests for the crossfeed
//!
//! These tests use proptest to verify invariants across many random inputs.

use crossfeed_core::fixed::Q31_MAX;
use crossfeed_core::{DspBuffer, DspHost, DspId, SampleRate, StageId, StreamFormat};
use crossfeed_dsp::{
    Crossfeed, CrossfeedSettings, DspConfig, CROSS_GAIN_RANGE, DIRECT_GAIN_RANGE,
    HF_ATTENUATION_RANGE, HF_CUTOFF_RANGE, DELAY_SLOTS,
};
use proptest::prelude::*;

const RATE: SampleRate = SampleRate::CD_QUALITY;

// Helper: attached crossfeed with the given settings
fn crossfeed(settings: &CrossfeedSettings) -> (Crossfeed, DspConfig) {
    let mut host = DspConfig::new(DspId::AUDIO, RATE);
    let mut crossfeed = Crossfeed::new();
    settings.configure(&mut crossfeed, RATE);
    crossfeed.attach(&mut host);
    (crossfeed, host)
}

// Helper: stereo s3.28 samples at or below full scale
fn samples() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(-(1i32 << 28)..=(1i32 << 28), 2..512).prop_map(|mut v| {
        v.truncate(v.len() & !1);
        v
    })
}

fn valid_settings() -> impl Strategy<Value = CrossfeedSettings> {
    (
        DIRECT_GAIN_RANGE,
        CROSS_GAIN_RANGE,
        HF_ATTENUATION_RANGE,
        HF_CUTOFF_RANGE,
    )
        .prop_map(|(direct, cross, hf, cutoff)| CrossfeedSettings::custom(direct, cross, hf, cutoff))
}

proptest! {
    /// Property: every in-range setting produces a stable shelf
    #[test]
    fn valid_settings_give_stable_pole(settings in valid_settings()) {
        prop_assert!(settings.validate().is_ok());

        let (crossfeed, _) = crossfeed(&settings);
        let pole = f64::from(crossfeed.coefs()[2]) / 2_147_483_648.0;
        prop_assert!(pole.abs() < 1.0, "pole {} for {:?}", pole, settings);
    }

    /// Property: the direct gain never wraps negative
    #[test]
    fn direct_gain_never_negative(gain in any::<i32>()) {
        let mut crossfeed = Crossfeed::new();
        crossfeed.set_direct_gain(gain);
        prop_assert!(crossfeed.direct_gain() > 0);
        if gain >= 0 {
            prop_assert_eq!(crossfeed.direct_gain(), Q31_MAX);
        }
    }

    /// Property: processing is deterministic after a reset
    #[test]
    fn reset_makes_processing_repeatable(
        settings in valid_settings(),
        input in samples()
    ) {
        let (mut crossfeed, mut host) = crossfeed(&settings);
        let format = StreamFormat::stereo(RATE);

        let mut first = DspBuffer::new(input.clone(), format);
        crossfeed.process(&mut host, &mut first);

        crossfeed.reset();
        let mut second = DspBuffer::new(input, format);
        crossfeed.process(&mut host, &mut second);

        prop_assert_eq!(first, second);
    }

    /// Property: full-scale input with valid settings stays inside the headroom
    #[test]
    fn valid_settings_never_reach_the_rails(
        settings in valid_settings(),
        input in samples()
    ) {
        let (mut crossfeed, mut host) = crossfeed(&settings);
        let mut buffer = DspBuffer::new(input, StreamFormat::stereo(RATE));
        crossfeed.process(&mut host, &mut buffer);

        // Three bits of headroom above full scale
        let limit = 1i32 << 30;
        prop_assert!(buffer.samples.iter().all(|&s| s > -limit && s < limit));
    }

    /// Property: streams with fewer than two channels pass through untouched
    #[test]
    fn mono_is_true_bypass(
        settings in valid_settings(),
        input in samples()
    ) {
        let (mut crossfeed, mut host) = crossfeed(&settings);
        let mut buffer = DspBuffer::new(input.clone(), StreamFormat::mono(RATE));
        crossfeed.process(&mut host, &mut buffer);

        prop_assert_eq!(buffer.samples, input);
        prop_assert!(!host.is_active(StageId::CROSSFEED));
    }

    /// Property: the cursor always sits on a left slot inside the delay line
    #[test]
    fn cursor_stays_on_frame_boundary(
        blocks in prop::collection::vec(samples(), 1..8)
    ) {
        let (mut crossfeed, mut host) = crossfeed(&CrossfeedSettings::default());
        let format = StreamFormat::stereo(RATE);
        let mut frames = 0;

        for block in blocks {
            frames += block.len() / 2;
            crossfeed.process(&mut host, &mut DspBuffer::new(block, format));
            prop_assert!(crossfeed.cursor() < DELAY_SLOTS);
            prop_assert_eq!(crossfeed.cursor() % 2, 0);
            prop_assert_eq!(crossfeed.cursor(), (frames * 2) % DELAY_SLOTS);
        }
    }
}
