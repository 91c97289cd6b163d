//! Audio stream types

use serde::{Deserialize, Serialize};

/// Fractional bits of an internal sample (s3.28)
///
/// Full scale input occupies 28 bits, leaving three bits of headroom above
/// full scale before the 32-bit accumulator wraps.
pub const SAMPLE_FRAC_BITS: u32 = 28;

/// Sample rate in Hz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SampleRate(pub u32);

impl SampleRate {
    /// Common sample rates
    pub const CD_QUALITY: Self = Self(44_100);
    pub const DVD_QUALITY: Self = Self(48_000);
    pub const HIGH_RES_96: Self = Self(96_000);

    /// Create a new sample rate
    #[must_use]
    pub fn new(hz: u32) -> Self {
        Self(hz)
    }

    /// Get the sample rate as Hz
    pub fn as_hz(&self) -> u32 {
        self.0
    }
}

impl Default for SampleRate {
    fn default() -> Self {
        Self::CD_QUALITY
    }
}

/// Format descriptor carried with every buffer
///
/// `generation` changes whenever the producer switches format (channel count,
/// rate, or anything else a stage may care about). Stages compare it with the
/// generation they last probed instead of comparing every field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamFormat {
    /// Number of interleaved channels (1 = mono, 2 = stereo)
    pub channels: u16,

    /// Sample rate of the stream
    pub sample_rate: SampleRate,

    /// Format change marker
    pub generation: u32,
}

impl StreamFormat {
    /// Create a new stream format at generation 0
    pub fn new(channels: u16, sample_rate: SampleRate) -> Self {
        Self {
            channels,
            sample_rate,
            generation: 0,
        }
    }

    /// Stereo stream at generation 0
    pub fn stereo(sample_rate: SampleRate) -> Self {
        Self::new(2, sample_rate)
    }

    /// Mono stream at generation 0
    pub fn mono(sample_rate: SampleRate) -> Self {
        Self::new(1, sample_rate)
    }

    /// Same format with an explicit generation
    #[must_use]
    pub fn with_generation(mut self, generation: u32) -> Self {
        self.generation = generation;
        self
    }

    /// Derive the descriptor for a changed format
    ///
    /// The generation is bumped so downstream stages re-check it.
    #[must_use]
    pub fn changed(self, channels: u16, sample_rate: SampleRate) -> Self {
        Self {
            channels,
            sample_rate,
            generation: self.generation.wrapping_add(1),
        }
    }
}

/// Buffer of interleaved fixed-point samples
///
/// Samples are s3.28 (see [`SAMPLE_FRAC_BITS`]).
/// Interleaved format: [L, R, L, R, ...] for stereo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DspBuffer {
    /// Samples (i32, interleaved)
    pub samples: Vec<i32>,

    /// Stream format information
    pub format: StreamFormat,
}

impl DspBuffer {
    /// Create a new buffer
    pub fn new(samples: Vec<i32>, format: StreamFormat) -> Self {
        Self { samples, format }
    }

    /// Build a stereo buffer from separate left/right channels
    ///
    /// The shorter channel determines the frame count.
    pub fn from_channels(left: &[i32], right: &[i32], format: StreamFormat) -> Self {
        let samples = left
            .iter()
            .zip(right)
            .flat_map(|(&l, &r)| [l, r])
            .collect();
        Self {
            samples,
            format: StreamFormat {
                channels: 2,
                ..format
            },
        }
    }

    /// Get the number of frames (samples per channel)
    pub fn frames(&self) -> usize {
        match self.format.channels {
            0 => 0,
            channels => self.samples.len() / usize::from(channels),
        }
    }

    /// Copy one channel out of the interleaved buffer
    pub fn channel(&self, index: usize) -> Vec<i32> {
        let channels = usize::from(self.format.channels);
        if index >= channels {
            return Vec::new();
        }
        self.samples
            .chunks_exact(channels)
            .map(|frame| frame[index])
            .collect()
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Get the length in samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }
}
