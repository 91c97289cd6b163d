//! Offline processing of WAV files

use crate::wav::{read_wav, write_wav};
use crossfeed_core::{
    CrossfeedError, DspBuffer, DspId, Result, SampleRate, StageId, StreamFormat,
};
use crossfeed_dsp::{CrossfeedSettings, DspPipeline};
use std::path::Path;
use tracing::info;

/// Summary of a processed file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessReport {
    pub channels: u16,
    pub sample_rate: SampleRate,
    pub frames: usize,
    /// Whether the crossfeed was running (false for mono input)
    pub crossfed: bool,
}

/// Run `input` through a crossfeed pipeline and write `output`
///
/// Audio is fed in blocks of `block_frames` frames, the way a player
/// would deliver it. The output keeps the input's WAV layout.
pub fn process_file(
    input: &Path,
    output: &Path,
    settings: &CrossfeedSettings,
    block_frames: usize,
) -> Result<ProcessReport> {
    if block_frames == 0 {
        return Err(CrossfeedError::invalid_buffer("block size must be at least one frame"));
    }

    let wav = read_wav(input)?;
    let sample_rate = SampleRate::new(wav.spec.sample_rate);
    let format = StreamFormat::new(wav.spec.channels, sample_rate);

    let mut pipeline = DspPipeline::with_crossfeed(DspId::AUDIO, sample_rate);
    settings.apply(&mut pipeline)?;

    let block_len = block_frames * usize::from(wav.spec.channels.max(1));
    let mut processed = Vec::with_capacity(wav.samples.len());
    for block in wav.samples.chunks(block_len) {
        let mut buffer = DspBuffer::new(block.to_vec(), format);
        pipeline.process(&mut buffer);
        processed.extend_from_slice(&buffer.samples);
    }

    write_wav(output, wav.spec, &processed)?;

    let report = ProcessReport {
        channels: wav.spec.channels,
        sample_rate,
        frames: wav.frames(),
        crossfed: pipeline.is_active(StageId::CROSSFEED),
    };

    info!(
        input = %input.display(),
        output = %output.display(),
        channels = report.channels,
        sample_rate = report.sample_rate.as_hz(),
        frames = report.frames,
        crossfed = report.crossfed,
        "Processed file"
    );

    Ok(report)
}
