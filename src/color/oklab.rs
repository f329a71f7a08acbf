//! sRGB → OkLab conversion.
//!
//! OkLab is Björn Ottosson's perceptually uniform color space: Euclidean
//! distance between two OkLab values approximates how different the colors
//! look. That property is what makes both the dominant-color quantization
//! and the grid luminance deltas work on a fixed bit budget.
//!
//! Matrix constants are the published reference values — keep the author's
//! original digits, let the compiler truncate to f32. Changing them breaks
//! visual parity with every previously encoded placeholder.

/// A color in OkLab space.
///
/// `l` is lightness in [0, 1]; `a` (green–red) and `b` (blue–yellow) are
/// small signed values, roughly within ±0.4 for sRGB inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oklab {
    pub l: f32,
    pub a: f32,
    pub b: f32,
}

impl Oklab {
    pub const fn new(l: f32, a: f32, b: f32) -> Self {
        Self { l, a, b }
    }

    /// Colorfulness magnitude: the Euclidean norm of the (a, b) components.
    pub fn chroma(self) -> f32 {
        self.a.hypot(self.b)
    }
}

/// sRGB gamma → linear (single channel, 0..255 → 0.0..1.0).
#[inline]
fn srgb_to_linear(c: u8) -> f32 {
    let c = c as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Convert sRGB (0..255 per channel) to OkLab.
#[allow(clippy::excessive_precision)]
pub fn srgb_to_oklab(r: u8, g: u8, b: u8) -> Oklab {
    let r = srgb_to_linear(r);
    let g = srgb_to_linear(g);
    let b = srgb_to_linear(b);

    // Linear sRGB → LMS (Ottosson's M1 matrix)
    let l = 0.4122214708 * r + 0.5363325363 * g + 0.0514459929 * b;
    let m = 0.2119034982 * r + 0.6806995451 * g + 0.1073969566 * b;
    let s = 0.0883024619 * r + 0.2817188376 * g + 0.6299787005 * b;

    // Cube-root compression
    let l_ = l.cbrt();
    let m_ = m.cbrt();
    let s_ = s.cbrt();

    // LMS → OkLab (Ottosson's M2 matrix)
    Oklab {
        l: 0.2104542553 * l_ + 0.7936177850 * m_ - 0.0040720468 * s_,
        a: 1.9779984951 * l_ - 2.4285922050 * m_ + 0.4505937099 * s_,
        b: 0.0259040371 * l_ + 0.7827717662 * m_ - 0.8086757660 * s_,
    }
}
