//! First-order shelving filter design
//!
//! Designs a one-pole/one-zero shelf through the bilinear transform, entirely
//! in fixed point. The resulting filter is
//!
//! ```text
//! y[n] = c0 * x[n] + c1 * x[n-1] + c2 * y[n-1]
//! ```
//!
//! with `[c0, c1, c2] = [b0/a0, b1/a0, -a1/a0]` in s4.27.

use crate::gain::{linear_gain, tenths_to_hundredths};
use crossfeed_core::fixed::{fp_div, fp_sincos, fracmul, fracmul_shl};

/// Fractional bits of the designed coefficients (s4.27)
pub const COEF_FRAC_BITS: u32 = 27;

/// Which side of the cutoff the shelf gain applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShelfKind {
    /// Gain applies below the cutoff; unity at Nyquist
    Low,
    /// Gain applies above the cutoff; unity at DC
    High,
}

/// Normalize a frequency in Hz against a sample rate
///
/// The result is a fraction of the sample rate with `2^32` representing the
/// sample rate itself, so Nyquist is `2^31`.
pub fn normalized_cutoff(cutoff_hz: u32, sample_rate_hz: u32) -> u32 {
    (u32::MAX / sample_rate_hz.max(1)).wrapping_mul(cutoff_hz)
}

/// Design a first-order shelving filter
///
/// # Arguments
/// * `cutoff` - Shelf midpoint as returned by [`normalized_cutoff`]
/// * `gain_tenths_db` - Shelf gain/attenuation in 0.1 dB, at most ±24 dB
/// * `kind` - Low or high shelf
///
/// Returns `[c0, c1, c2]` in s4.27. The coefficients are not scaled for any
/// particular processing format; callers rescale them as needed.
pub fn shelf_coefs(cutoff: u32, gain_tenths_db: i32, kind: ShelfKind) -> [i32; 3] {
    // 10^(dB/40) in s3.28
    let g = linear_gain(tenths_to_hundredths(gain_tenths_db).saturating_div(2)) << 4;

    let (sin, cos) = fp_sincos(cutoff / 2);

    // All four terms end up in s3.28
    let (b0, b1, a0, a1) = match kind {
        ShelfKind::Low => {
            let sin_div_g = fp_div(sin, g, 25);
            let sin_g = fracmul(sin, g);
            let cos = cos >> 3;
            (
                sin_g.wrapping_add(cos),
                sin_g.wrapping_sub(cos),
                sin_div_g.wrapping_add(cos),
                sin_div_g.wrapping_sub(cos),
            )
        }
        ShelfKind::High => {
            let cos_div_g = fp_div(cos, g, 25);
            let cos_g = fracmul(cos, g);
            let sin = sin >> 3;
            (
                sin.wrapping_add(cos_g),
                sin.wrapping_sub(cos_g),
                sin.wrapping_add(cos_div_g),
                sin.wrapping_sub(cos_div_g),
            )
        }
    };

    // 1 / a0 in s2.29
    let rcp_a0 = fp_div(1, a0, 57);

    [
        fracmul_shl(b0, rcp_a0, 1),
        fracmul_shl(b1, rcp_a0, 1),
        fracmul_shl(a1, rcp_a0, 1).wrapping_neg(),
    ]
}
