//! Bit packing of the final placeholder value.
//!
//! Layout, most-significant to least-significant:
//!
//! ```text
//! ┌────────────────────────┬────┬─────┬─────┐
//! │ grid cells g0..g5      │ ll │ aaa │ bbb │
//! │ 2 bits each (12 bits)  │ 2  │ 3   │ 3   │
//! └────────────────────────┴────┴─────┴─────┘
//!   20 bits total, then biased by −2^19
//! ```
//!
//! The bias centers the 20-bit field inside a signed range so the value is
//! safe to inline as a CSS custom property (integer custom properties are
//! reliable within ±999999 across engines). A stylesheet decoder reverses
//! the layout above; this module only guarantees the forward direction.

use crate::color::BaseColor;
pub use crate::imaging::grid::GRID_CELLS;
use thiserror::Error;

/// Declared safe range for the encoded value.
pub const VALUE_MIN: i32 = -999_999;
pub const VALUE_MAX: i32 = 999_999;

/// Bias subtracted from the packed 20-bit field.
const BIAS: i32 = 1 << 19;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EncodeError {
    /// The packed value left the declared safe range. Unreachable for any
    /// in-domain input; surfacing it means the bit-width or bias constants
    /// are wrong, so it is a hard failure rather than a skip.
    #[error("encoded value {0} outside safe range [{VALUE_MIN}, {VALUE_MAX}]")]
    ValueOutOfRange(i32),
}

/// Relative luminance of a grid cell against the decoded base lightness,
/// centered at 0.5 for "same brightness" and clamped to [0, 1].
pub fn luminance_delta(cell_l: f32, base_l: f32) -> f32 {
    (0.5 + cell_l - base_l).clamp(0.0, 1.0)
}

/// Quantize a [0, 1] delta to a 2-bit field.
#[inline]
fn quantize_delta(value: f32) -> u32 {
    (value.clamp(0.0, 1.0) * 3.0).round() as u32
}

/// Pack six grid deltas and the base color into one signed integer.
pub fn encode(grid: &[f32; GRID_CELLS], base: BaseColor) -> Result<i32, EncodeError> {
    let mut bits: u32 = 0;
    for &delta in grid {
        bits = (bits << 2) | quantize_delta(delta);
    }
    bits = (bits << 2) | u32::from(base.ll & 0b11);
    bits = (bits << 3) | u32::from(base.aaa & 0b111);
    bits = (bits << 3) | u32::from(base.bbb & 0b111);

    let value = bits as i32 - BIAS;
    if !(VALUE_MIN..=VALUE_MAX).contains(&value) {
        return Err(EncodeError::ValueOutOfRange(value));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_zero_input_is_minimum_field() {
        let value = encode(&[0.0; 6], BaseColor { ll: 0, aaa: 0, bbb: 0 }).unwrap();
        assert_eq!(value, -BIAS);
    }

    #[test]
    fn all_max_input_is_maximum_field() {
        let value = encode(&[1.0; 6], BaseColor { ll: 3, aaa: 7, bbb: 7 }).unwrap();
        assert_eq!(value, (1 << 20) - 1 - BIAS);
    }

    #[test]
    fn solid_red_golden_value() {
        // Six mid-brightness cells (field 0b10) over base (2, 7, 5):
        // 0b10101010101010111101 = 699069, biased → 174781.
        let value = encode(&[0.5; 6], BaseColor { ll: 2, aaa: 7, bbb: 5 }).unwrap();
        assert_eq!(value, 174_781);
    }

    #[test]
    fn deltas_round_to_nearest_field() {
        // 0.0 → 0, 0.33 → 1, 0.5 → 2 (rounds up), 0.66 → 2, 1.0 → 3
        let base = BaseColor { ll: 0, aaa: 0, bbb: 0 };
        let value = encode(&[0.0, 0.33, 0.5, 0.66, 1.0, 0.0], base).unwrap();
        let bits = (value + BIAS) as u32 >> 8;
        assert_eq!(bits, 0b00_01_10_10_11_00);
    }

    #[test]
    fn out_of_domain_deltas_are_clamped() {
        let base = BaseColor { ll: 0, aaa: 0, bbb: 0 };
        let clamped = encode(&[-3.0, 7.0, 0.5, 0.5, 0.5, 0.5], base).unwrap();
        let explicit = encode(&[0.0, 1.0, 0.5, 0.5, 0.5, 0.5], base).unwrap();
        assert_eq!(clamped, explicit);
    }

    #[test]
    fn every_in_domain_input_is_in_safe_range() {
        // Exhaustive over base colors, with grid corner cases.
        let grids: [[f32; 6]; 4] = [
            [0.0; 6],
            [1.0; 6],
            [0.5; 6],
            [0.0, 1.0, 0.25, 0.75, 0.5, 1.0],
        ];
        for ll in 0..4 {
            for aaa in 0..8 {
                for bbb in 0..8 {
                    for grid in &grids {
                        let value = encode(grid, BaseColor { ll, aaa, bbb }).unwrap();
                        assert!((VALUE_MIN..=VALUE_MAX).contains(&value));
                    }
                }
            }
        }
    }

    #[test]
    fn base_color_occupies_low_bits() {
        let base = BaseColor { ll: 2, aaa: 5, bbb: 3 };
        let value = encode(&[0.0; 6], base).unwrap();
        let bits = (value + BIAS) as u32;
        assert_eq!(bits & 0b111, 3);
        assert_eq!((bits >> 3) & 0b111, 5);
        assert_eq!((bits >> 6) & 0b11, 2);
    }

    #[test]
    fn luminance_delta_centers_at_half() {
        assert_eq!(luminance_delta(0.6, 0.6), 0.5);
        assert!(luminance_delta(0.9, 0.6) > 0.5);
        assert!(luminance_delta(0.3, 0.6) < 0.5);
        // Clamped at the extremes.
        assert_eq!(luminance_delta(2.0, 0.0), 1.0);
        assert_eq!(luminance_delta(0.0, 2.0), 0.0);
    }
}
