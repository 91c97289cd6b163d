//! Crossfeed command-line front end
//!
//! Loads crossfeed settings, reads WAV files, runs them through a
//! `DspPipeline` and writes the result.

pub mod config;
pub mod process;
pub mod wav;

pub use config::load_settings;
pub use process::{process_file, ProcessReport};
