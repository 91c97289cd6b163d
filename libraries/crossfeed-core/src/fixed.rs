//! Fixed-point arithmetic
//!
//! Samples, gains and coefficients are carried as signed 32-bit fractions.
//! The notation `sI.F` means one sign bit, `I` integer bits and `F` fractional
//! bits, so `s0.31` (Q0.31) spans [-1.0, 1.0) and `s7.24` spans [-128.0, 128.0).
//!
//! Every helper here is total over its input domain: results that do not fit
//! the 32-bit destination wrap instead of panicking.

use std::f64::consts::TAU;

/// Largest positive Q0.31 value (just under 1.0)
pub const Q31_MAX: i32 = i32::MAX;

/// Fractional bits of a linear gain as returned by the gain converter (s7.24)
pub const GAIN_FRAC_BITS: u32 = 24;

/// Unity gain in s7.24
pub const GAIN_UNITY: i32 = 1 << GAIN_FRAC_BITS;

/// Fractional multiply of two Q0.31 values
///
/// Computes `a * b` in 64 bits and keeps the top word, truncating toward
/// negative infinity. Either operand may be in any `sI.F` format; the result
/// has the format of the other operand when one of them is Q0.31.
#[inline]
pub fn fracmul(a: i32, b: i32) -> i32 {
    ((i64::from(a) * i64::from(b)) >> 31) as i32
}

/// Fractional multiply followed by a left shift of `shift` bits
///
/// Equivalent to `fracmul(a, b) << shift` but keeps the `shift` extra bits of
/// precision that the plain multiply would discard.
#[inline]
pub fn fracmul_shl(a: i32, b: i32, shift: u32) -> i32 {
    debug_assert!(shift < 32);
    ((i64::from(a) * i64::from(b)) >> (31 - shift)) as i32
}

/// Fixed-point division: `(a << frac_bits) / b`
///
/// The quotient is computed in 64 bits and truncated toward zero. A zero
/// divisor saturates to the extreme matching the sign of `a`.
pub fn fp_div(a: i32, b: i32, frac_bits: u32) -> i32 {
    if b == 0 {
        return if a < 0 { i32::MIN } else { i32::MAX };
    }
    let num = i64::from(a).wrapping_shl(frac_bits);
    num.wrapping_div(i64::from(b)) as i32
}

/// Sine and cosine of a phase given as a fraction of a full turn
///
/// `phase` is unsigned with `2^32` representing `2π`. Both results are Q0.31
/// and saturate at [`Q31_MAX`] where the exact value would be 1.0.
pub fn fp_sincos(phase: u32) -> (i32, i32) {
    let angle = f64::from(phase) * (TAU / 4_294_967_296.0);
    (to_q31(angle.sin()), to_q31(angle.cos()))
}

/// Convert a float in [-1.0, 1.0] to Q0.31 with rounding and saturation
pub fn to_q31(value: f64) -> i32 {
    let scaled = (value * 2_147_483_648.0).round();
    scaled.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

/// Convert a fixed-point value with `frac_bits` fractional bits to a float
pub fn to_f64(value: i32, frac_bits: u32) -> f64 {
    f64::from(value) / (1u64 << frac_bits) as f64
}
