//! Core error types for the crossfeed DSP

use thiserror::Error;

/// Result type alias using `CrossfeedError`
pub type Result<T> = std::result::Result<T, CrossfeedError>;

/// Core error type
///
/// The processing entry points are total and never return errors; these
/// variants only surface at the configuration and file I/O boundaries.
#[derive(Error, Debug)]
pub enum CrossfeedError {
    /// Settings outside the range the filter design supports
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// Malformed sample buffer
    #[error("Invalid buffer: {0}")]
    InvalidBuffer(String),

    /// Stream format the caller cannot convert
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Configuration loading errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// WAV reading/writing errors
    #[error("WAV error: {0}")]
    Wav(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CrossfeedError {
    /// Create an invalid settings error
    pub fn invalid_settings(msg: impl Into<String>) -> Self {
        Self::InvalidSettings(msg.into())
    }

    /// Create an invalid buffer error
    pub fn invalid_buffer(msg: impl Into<String>) -> Self {
        Self::InvalidBuffer(msg.into())
    }

    /// Create an unsupported format error
    pub fn unsupported_format(msg: impl Into<String>) -> Self {
        Self::UnsupportedFormat(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a WAV error
    pub fn wav(msg: impl Into<String>) -> Self {
        Self::Wav(msg.into())
    }
}
