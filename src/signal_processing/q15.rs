//! Q15 fixed-point conversions.
//!
//! A Q15 value is an `i16` read as a fraction of 2^15, covering [-1.0, 1.0).

use crate::constants::Q15_SCALE;

/// Quantise a real value to Q15: scale by 2^15, round to nearest, saturate.
pub fn from_f32(value: f32) -> i16 {
    let scaled = (value * Q15_SCALE).round();
    scaled.clamp(i16::MIN as f32, i16::MAX as f32) as i16
}

/// Real value of a Q15 sample.
pub fn to_f32(value: i16) -> f32 {
    value as f32 / Q15_SCALE
}

/// Quantise a whole tap table.
pub fn quantize_taps<const N: usize>(taps: &[f32; N]) -> [i16; N] {
    taps.map(from_f32)
}

/// Multiply two Q15 values, truncating the product back to Q15.
pub fn mul(a: i16, b: i16) -> i16 {
    ((a as i32 * b as i32) >> 15) as i16
}

/// Saturating Q15 addition.
pub fn add_sat(a: i16, b: i16) -> i16 {
    a.saturating_add(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{FIXED_TAPS, FLOAT_TAPS};

    #[test]
    fn test_from_f32_rounds_to_nearest() {
        assert_eq!(from_f32(0.5), 16384);
        assert_eq!(from_f32(-0.004_289_844_3), -141);
        assert_eq!(from_f32(0.0), 0);
    }

    #[test]
    fn test_from_f32_saturates() {
        assert_eq!(from_f32(1.0), i16::MAX);
        assert_eq!(from_f32(4.0), i16::MAX);
        assert_eq!(from_f32(-1.0), i16::MIN);
        assert_eq!(from_f32(-2.5), i16::MIN);
    }

    #[test]
    fn test_reference_taps_quantise_to_fixed_table() {
        assert_eq!(quantize_taps(&FLOAT_TAPS), FIXED_TAPS);
    }

    #[test]
    fn test_mul_truncates_toward_negative_infinity() {
        assert_eq!(mul(16384, 16384), 8192); // 0.5 * 0.5
        assert_eq!(mul(-1, 1), -1); // -2^-30 floors to -2^-15
        assert_eq!(mul(1, 1), 0);
    }

    #[test]
    fn test_to_f32() {
        assert!((to_f32(16384) - 0.5).abs() < f32::EPSILON);
        assert!((to_f32(i16::MIN) + 1.0).abs() < f32::EPSILON);
    }
}
