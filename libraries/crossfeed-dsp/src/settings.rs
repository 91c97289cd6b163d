//! Crossfeed settings and presets
//!
//! User-facing parameters in tenths of a decibel and Hz. This is the layer
//! that range-checks values; the filter setters themselves accept anything.

use crate::crossfeed::Crossfeed;
use crate::pipeline::DspPipeline;
use crossfeed_core::{CrossfeedError, Result, SampleRate, StageId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use tracing::info;

/// Allowed direct gain, 0.1 dB
pub const DIRECT_GAIN_RANGE: RangeInclusive<i32> = -60..=0;

/// Allowed cross gain, 0.1 dB
pub const CROSS_GAIN_RANGE: RangeInclusive<i32> = -120..=-30;

/// Allowed high-frequency attenuation, 0.1 dB
pub const HF_ATTENUATION_RANGE: RangeInclusive<i32> = -240..=-60;

/// Allowed high-frequency cutoff, Hz
pub const HF_CUTOFF_RANGE: RangeInclusive<u32> = 500..=2000;

/// Crossfeed preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrossfeedPreset {
    /// Classic: the long-standing default tuning
    /// Direct: -1.5 dB, Cross: -6 dB, HF: -16 dB, Cutoff: 700 Hz
    #[default]
    Classic,

    /// Natural: Subtle crossfeed for a more natural soundstage
    /// Cross: -4.5 dB, Cutoff: 700 Hz
    Natural,

    /// Relaxed: Moderate crossfeed for casual listening
    /// Cross: -6 dB, Cutoff: 650 Hz
    Relaxed,

    /// Meier: Based on Jan Meier's crossfeed circuit
    /// Cross: -9 dB, Cutoff: 550 Hz
    Meier,

    /// Custom: User-defined settings
    Custom,
}

impl CrossfeedPreset {
    /// All presets with fixed values
    pub const ALL: [Self; 4] = [Self::Classic, Self::Natural, Self::Relaxed, Self::Meier];

    /// Get cross gain in 0.1 dB for this preset
    pub fn cross_gain(&self) -> i32 {
        match self {
            Self::Classic | Self::Relaxed | Self::Custom => -60,
            Self::Natural => -45,
            Self::Meier => -90,
        }
    }

    /// Get cutoff frequency in Hz for this preset
    pub fn hf_cutoff(&self) -> u32 {
        match self {
            Self::Classic | Self::Natural | Self::Custom => 700,
            Self::Relaxed => 650,
            Self::Meier => 550,
        }
    }

    /// Get direct gain in 0.1 dB for this preset
    pub fn direct_gain(&self) -> i32 {
        -15
    }

    /// Get high-frequency attenuation in 0.1 dB for this preset
    pub fn hf_attenuation(&self) -> i32 {
        -160
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Natural => "natural",
            Self::Relaxed => "relaxed",
            Self::Meier => "meier",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for CrossfeedPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CrossfeedPreset {
    type Err = CrossfeedError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "classic" => Ok(Self::Classic),
            "natural" => Ok(Self::Natural),
            "relaxed" => Ok(Self::Relaxed),
            "meier" => Ok(Self::Meier),
            "custom" => Ok(Self::Custom),
            other => Err(CrossfeedError::invalid_settings(format!(
                "unknown crossfeed preset '{}'",
                other
            ))),
        }
    }
}

/// Crossfeed settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossfeedSettings {
    /// Whether the crossfeed stage is attached
    pub enabled: bool,

    /// Preset the values came from
    pub preset: CrossfeedPreset,

    /// Direct (dry) path gain in 0.1 dB
    pub direct_gain: i32,

    /// Crossfed signal gain below the cutoff in 0.1 dB
    pub cross_gain: i32,

    /// Extra attenuation of the crossfed signal above the cutoff in 0.1 dB
    pub hf_attenuation: i32,

    /// Frequency of the shelf's -3 dB point in Hz
    pub hf_cutoff: u32,
}

impl Default for CrossfeedSettings {
    fn default() -> Self {
        Self::from_preset(CrossfeedPreset::Classic)
    }
}

impl CrossfeedSettings {
    /// Create settings from a preset (disabled)
    pub fn from_preset(preset: CrossfeedPreset) -> Self {
        Self {
            enabled: false,
            preset,
            direct_gain: preset.direct_gain(),
            cross_gain: preset.cross_gain(),
            hf_attenuation: preset.hf_attenuation(),
            hf_cutoff: preset.hf_cutoff(),
        }
    }

    /// Create custom settings (disabled)
    pub fn custom(direct_gain: i32, cross_gain: i32, hf_attenuation: i32, hf_cutoff: u32) -> Self {
        Self {
            enabled: false,
            preset: CrossfeedPreset::Custom,
            direct_gain,
            cross_gain,
            hf_attenuation,
            hf_cutoff,
        }
    }

    /// Switch to a preset, keeping `enabled`
    ///
    /// A named preset replaces the tone values with its own. `Custom` keeps
    /// the current values and only relabels them.
    #[must_use]
    pub fn with_preset(self, preset: CrossfeedPreset) -> Self {
        match preset {
            CrossfeedPreset::Custom => Self { preset, ..self },
            _ => Self {
                enabled: self.enabled,
                ..Self::from_preset(preset)
            },
        }
    }

    /// Same settings, enabled
    #[must_use]
    pub fn enabled(mut self) -> Self {
        self.enabled = true;
        self
    }

    /// Cross gain above the cutoff in 0.1 dB
    pub fn hf_gain(&self) -> i32 {
        self.cross_gain.saturating_add(self.hf_attenuation)
    }

    /// Check every value against its allowed range
    ///
    /// Rejects positive or inverted gains, which the shelf design cannot
    /// represent.
    pub fn validate(&self) -> Result<()> {
        check("direct gain", self.direct_gain, &DIRECT_GAIN_RANGE)?;
        check("cross gain", self.cross_gain, &CROSS_GAIN_RANGE)?;
        check("HF attenuation", self.hf_attenuation, &HF_ATTENUATION_RANGE)?;

        if !HF_CUTOFF_RANGE.contains(&self.hf_cutoff) {
            return Err(CrossfeedError::invalid_settings(format!(
                "HF cutoff {} Hz outside {}..={} Hz",
                self.hf_cutoff,
                HF_CUTOFF_RANGE.start(),
                HF_CUTOFF_RANGE.end()
            )));
        }

        Ok(())
    }

    /// Program a crossfeed's gain and shelf from these settings
    ///
    /// Does not validate and does not touch the attachment state.
    pub fn configure(&self, crossfeed: &mut Crossfeed, native_rate: SampleRate) {
        crossfeed.set_direct_gain(self.direct_gain);
        crossfeed.set_shelf_params(self.cross_gain, self.hf_gain(), self.hf_cutoff, native_rate);
    }

    /// Validate and apply to a pipeline's crossfeed stage
    ///
    /// Parameters are programmed first, then the stage is enabled or
    /// disabled to match `enabled`.
    pub fn apply(&self, pipeline: &mut DspPipeline) -> Result<()> {
        self.validate()?;

        let native_rate = pipeline.native_rate();
        let crossfeed = pipeline.crossfeed_mut().ok_or_else(|| {
            CrossfeedError::invalid_settings("pipeline has no crossfeed stage")
        })?;
        self.configure(crossfeed, native_rate);
        pipeline.enable_stage(StageId::CROSSFEED, self.enabled);

        info!(
            preset = %self.preset,
            enabled = self.enabled,
            direct_gain = self.direct_gain,
            cross_gain = self.cross_gain,
            hf_attenuation = self.hf_attenuation,
            hf_cutoff = self.hf_cutoff,
            "crossfeed settings applied"
        );
        Ok(())
    }
}

fn check(name: &str, value: i32, range: &RangeInclusive<i32>) -> Result<()> {
    if range.contains(&value) {
        return Ok(());
    }
    Err(CrossfeedError::invalid_settings(format!(
        "{} {:.1} dB outside {:.1}..={:.1} dB",
        name,
        f64::from(value) / 10.0,
        f64::from(*range.start()) / 10.0,
        f64::from(*range.end()) / 10.0
    )))
}
