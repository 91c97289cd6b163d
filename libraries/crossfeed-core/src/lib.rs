//! Crossfeed Core
//!
//! Platform-agnostic types, traits, and error handling for the crossfeed DSP.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Stream Types**: `SampleRate`, `StreamFormat`, `DspBuffer`
//! - **Fixed-Point Math**: Q0.31 fractional multiply, fixed-point division, sin/cos
//! - **Core Traits**: `DspHost`, the services a processing pipeline offers its stages
//! - **Error Handling**: Unified `CrossfeedError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use crossfeed_core::fixed::{fracmul, Q31_MAX};
//! use crossfeed_core::types::{DspBuffer, SampleRate, StreamFormat};
//!
//! let format = StreamFormat::stereo(SampleRate::CD_QUALITY);
//! let buffer = DspBuffer::new(vec![0; 8], format);
//! assert_eq!(buffer.frames(), 4);
//!
//! // Multiplying by the largest Q0.31 value is (almost) unity gain
//! assert_eq!(fracmul(1 << 28, Q31_MAX), (1 << 28) - 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod fixed;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{CrossfeedError, Result};
pub use traits::{DspHost, DspId, StageId};
pub use types::{DspBuffer, SampleRate, StreamFormat, SAMPLE_FRAC_BITS};
