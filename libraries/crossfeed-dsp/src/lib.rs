//! Crossfeed DSP
//!
//! Fixed-point stereo crossfeed for headphone playback.
//!
//! This crate provides:
//! - The crossfeed filter: a 13-frame delay line feeding a first-order high
//!   shelf into the opposite channel, plus an attenuated direct path
//! - A format guard that switches the effect off for streams with fewer than
//!   two channels and re-checks on every format change
//! - Gain conversion and shelf coefficient design in fixed point
//! - Settings and presets with range validation
//! - A minimal pipeline that hosts stages and tracks their activation
//!
//! # Example
//!
//! ```rust
//! use crossfeed_core::{DspBuffer, DspId, SampleRate, StreamFormat};
//! use crossfeed_dsp::{CrossfeedSettings, DspPipeline};
//!
//! # fn example() -> crossfeed_core::Result<()> {
//! let mut pipeline = DspPipeline::with_crossfeed(DspId::AUDIO, SampleRate::CD_QUALITY);
//! CrossfeedSettings::default().enabled().apply(&mut pipeline)?;
//!
//! // Hard-panned left signal, s3.28
//! let samples = (0..64).flat_map(|_| [1 << 26, 0]).collect();
//! let mut buffer = DspBuffer::new(samples, StreamFormat::stereo(SampleRate::CD_QUALITY));
//! pipeline.process(&mut buffer);
//!
//! // The right channel now carries some of the left
//! assert!(buffer.channel(1).iter().any(|&s| s != 0));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![deny(unsafe_code)]

pub mod crossfeed;
pub mod filter;
pub mod gain;
pub mod pipeline;
mod settings;

pub use crossfeed::{Crossfeed, History, DELAY_FRAMES, DELAY_SLOTS};
pub use filter::{normalized_cutoff, shelf_coefs, ShelfKind};
pub use pipeline::{DspConfig, DspPipeline, DspStage, StageInfo};
pub use settings::{
    CrossfeedPreset, CrossfeedSettings, CROSS_GAIN_RANGE, DIRECT_GAIN_RANGE,
    HF_ATTENUATION_RANGE, HF_CUTOFF_RANGE,
};
