//! Quantized base color: a fixed 4×8×8 lattice in OkLab space.
//!
//! The placeholder's base color is stored in 8 bits — 2 for lightness,
//! 3 each for the a/b chroma axes. This module maps between lattice
//! indices and their decoded OkLab values, and finds the nearest lattice
//! point to an arbitrary target color by exhaustive search (256 candidates,
//! brute force is cheaper than being clever).

use super::oklab::Oklab;

/// Number of lattice steps per axis.
pub const L_LEVELS: u8 = 4;
pub const A_LEVELS: u8 = 8;
pub const B_LEVELS: u8 = 8;

/// A base color as lattice indices: `ll` ∈ [0,3], `aaa` ∈ [0,7], `bbb` ∈ [0,7].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseColor {
    pub ll: u8,
    pub aaa: u8,
    pub bbb: u8,
}

impl BaseColor {
    /// Decode lattice indices back to their OkLab value.
    ///
    /// The `b` axis is offset by one step (`bbb + 1`), shifting its range
    /// to [-0.2625, 0.35]: the extra reach goes to the yellow side, where
    /// photographic content actually lives, and `bbb = 3` still decodes to
    /// exactly zero so grays stay representable.
    pub fn decode(self) -> Oklab {
        Oklab {
            l: (self.ll as f32 / 3.0) * 0.6 + 0.2,
            a: (self.aaa as f32 / 8.0) * 0.7 - 0.35,
            b: ((self.bbb as f32 + 1.0) / 8.0) * 0.7 - 0.35,
        }
    }
}

/// De-weight a chroma component for distance comparison.
///
/// Dividing by sqrt(chroma) compresses the distance contribution of highly
/// saturated colors, so the search does not over-favor near-gray matches
/// when the target is colorful (and vice versa).
#[inline]
fn scale_component(x: f32, chroma: f32) -> f32 {
    x / (1e-6 + chroma.sqrt())
}

/// Find the lattice point nearest to `target` under the chroma-aware metric.
///
/// Enumeration order is fixed (`ll` outer, then `aaa`, then `bbb`) and ties
/// keep the first minimum encountered, so results are bit-exact reproducible
/// across runs and platforms.
pub fn nearest(target: Oklab) -> BaseColor {
    let target_chroma = target.chroma();
    let target_a = scale_component(target.a, target_chroma);
    let target_b = scale_component(target.b, target_chroma);

    let mut best = BaseColor {
        ll: 0,
        aaa: 0,
        bbb: 0,
    };
    let mut best_distance = f32::INFINITY;

    for ll in 0..L_LEVELS {
        for aaa in 0..A_LEVELS {
            for bbb in 0..B_LEVELS {
                let candidate = BaseColor { ll, aaa, bbb };
                let lab = candidate.decode();
                let chroma = lab.chroma();

                let dl = target.l - lab.l;
                let da = target_a - scale_component(lab.a, chroma);
                let db = target_b - scale_component(lab.b, chroma);
                let distance = dl * dl + da * da + db * db;

                // Strict comparison: first minimum wins on exact ties.
                if distance < best_distance {
                    best_distance = distance;
                    best = candidate;
                }
            }
        }
    }

    best
}
