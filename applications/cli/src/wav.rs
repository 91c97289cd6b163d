//! WAV file I/O
//!
//! Samples are held as interleaved s3.28 fixed point, the format the
//! crossfeed works in. Integer PCM of 8 to 32 bits and 32-bit float are
//! supported.

use crossfeed_core::{CrossfeedError, Result, SAMPLE_FRAC_BITS};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::Path;

/// Full scale in s3.28
const FULL_SCALE: f64 = (1u32 << SAMPLE_FRAC_BITS) as f64;

/// Decoded WAV contents
#[derive(Debug, Clone)]
pub struct WavData {
    /// Original file layout, reused when writing
    pub spec: WavSpec,
    /// Interleaved s3.28 samples
    pub samples: Vec<i32>,
}

impl WavData {
    /// Number of frames
    pub fn frames(&self) -> usize {
        match self.spec.channels {
            0 => 0,
            n => self.samples.len() / usize::from(n),
        }
    }
}

/// Read a WAV file into s3.28 samples
pub fn read_wav(path: &Path) -> Result<WavData> {
    let reader = WavReader::open(path).map_err(|e| wav_error(path, e))?;
    let spec = reader.spec();
    check_spec(&spec)?;

    let samples = match spec.sample_format {
        SampleFormat::Int => reader
            .into_samples::<i32>()
            .map(|s| s.map(|s| int_to_fixed(s, spec.bits_per_sample)))
            .collect::<std::result::Result<Vec<_>, _>>(),
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(float_to_fixed))
            .collect::<std::result::Result<Vec<_>, _>>(),
    }
    .map_err(|e| wav_error(path, e))?;

    tracing::debug!(
        path = %path.display(),
        channels = spec.channels,
        sample_rate = spec.sample_rate,
        bits = spec.bits_per_sample,
        samples = samples.len(),
        "Read WAV file"
    );

    Ok(WavData { spec, samples })
}

/// Write s3.28 samples to a WAV file with the given layout
///
/// Samples beyond full scale are clipped.
pub fn write_wav(path: &Path, spec: WavSpec, samples: &[i32]) -> Result<()> {
    check_spec(&spec)?;
    let mut writer = WavWriter::create(path, spec).map_err(|e| wav_error(path, e))?;

    match spec.sample_format {
        SampleFormat::Int => {
            for &sample in samples {
                writer
                    .write_sample(fixed_to_int(sample, spec.bits_per_sample))
                    .map_err(|e| wav_error(path, e))?;
            }
        }
        SampleFormat::Float => {
            for &sample in samples {
                writer
                    .write_sample(fixed_to_float(sample))
                    .map_err(|e| wav_error(path, e))?;
            }
        }
    }

    writer.finalize().map_err(|e| wav_error(path, e))
}

fn check_spec(spec: &WavSpec) -> Result<()> {
    match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 8..=32) | (SampleFormat::Float, 32) => Ok(()),
        (format, bits) => Err(CrossfeedError::unsupported_format(format!(
            "{:?} samples of {} bits",
            format, bits
        ))),
    }
}

fn wav_error(path: &Path, err: hound::Error) -> CrossfeedError {
    match err {
        hound::Error::IoError(e) => CrossfeedError::Io(e),
        other => CrossfeedError::wav(format!("{}: {}", path.display(), other)),
    }
}

/// Shift from an integer PCM sample of `bits` to s3.28 (positive is left)
fn shift_for(bits: u16) -> i32 {
    SAMPLE_FRAC_BITS as i32 + 1 - i32::from(bits)
}

/// Convert integer PCM to s3.28
pub fn int_to_fixed(sample: i32, bits: u16) -> i32 {
    let shift = shift_for(bits);
    if shift >= 0 {
        sample << shift
    } else {
        sample >> -shift
    }
}

/// Convert s3.28 to integer PCM, rounding and clipping to `bits`
pub fn fixed_to_int(sample: i32, bits: u16) -> i32 {
    let max = (1i64 << (bits - 1)) - 1;
    let min = -(1i64 << (bits - 1));
    let shift = shift_for(bits);

    let value = if shift > 0 {
        (i64::from(sample) + (1i64 << (shift - 1))) >> shift
    } else {
        i64::from(sample) << -shift
    };

    value.clamp(min, max) as i32
}

/// Convert float PCM to s3.28
pub fn float_to_fixed(sample: f32) -> i32 {
    (f64::from(sample) * FULL_SCALE)
        .round()
        .clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

/// Convert s3.28 to float PCM, clipping to [-1.0, 1.0]
pub fn fixed_to_float(sample: i32) -> f32 {
    (f64::from(sample) / FULL_SCALE).clamp(-1.0, 1.0) as f32
}
