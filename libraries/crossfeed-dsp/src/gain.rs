//! Logarithmic to linear gain conversion
//!
//! Gains arrive from settings as integers in tenths of a decibel. The
//! converter works in hundredths and produces an s7.24 linear factor, the
//! same representation ReplayGain adjustments use.
//!
//! # Range
//!
//! The decibel value is clamped to [-48 dB, +17 dB] before conversion, so the
//! result always lies in roughly [0.004, 7.08] and never reaches zero.

use crossfeed_core::fixed::GAIN_UNITY;

/// Lowest gain the converter represents, in dB
pub const MIN_GAIN_DB: f64 = -48.0;

/// Highest gain the converter represents, in dB
pub const MAX_GAIN_DB: f64 = 17.0;

/// Convert a gain in 0.01 dB units to a linear s7.24 factor
pub fn linear_gain(hundredths_db: i32) -> i32 {
    if hundredths_db == 0 {
        return GAIN_UNITY;
    }
    let db = (f64::from(hundredths_db) / 100.0).clamp(MIN_GAIN_DB, MAX_GAIN_DB);
    let linear = 10.0_f64.powf(db / 20.0);
    (linear * f64::from(GAIN_UNITY)).round() as i32
}

/// Convert a gain in 0.1 dB units to 0.01 dB units
///
/// Saturates instead of overflowing for absurd inputs; the converter clamps
/// them anyway.
#[inline]
pub fn tenths_to_hundredths(tenths_db: i32) -> i32 {
    tenths_db.saturating_mul(10)
}

/// Convert a linear s7.24 factor back to decibels (for display)
pub fn to_db(linear: i32) -> f64 {
    if linear <= 0 {
        return f64::NEG_INFINITY;
    }
    20.0 * (f64::from(linear) / f64::from(GAIN_UNITY)).log10()
}
