//! DSP Pipeline Abstractions
//!
//! A minimal pull-style host for fixed-point stages. The pipeline owns its
//! stages and its configuration; stages see the configuration only through
//! the `DspHost` trait while they run.
//!
//! # Architecture
//!
//! ```text
//! DspBuffer -> DspPipeline::process -> [DspStage]* -> DspBuffer
//!                    |
//!                    v
//!               DspConfig (DspHost: activation mask, native rate)
//! ```

mod dsp;
mod stage;
mod stage_impls;

pub use dsp::{DspConfig, DspPipeline};
pub use stage::{DspStage, StageInfo};
