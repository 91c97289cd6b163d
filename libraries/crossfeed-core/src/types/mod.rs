//! Stream types shared by the pipeline and its stages

mod audio;

pub use audio::{DspBuffer, SampleRate, StreamFormat, SAMPLE_FRAC_BITS};
