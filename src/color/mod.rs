//! Color analysis — pure math, no I/O.
//!
//! The module is split into:
//! - **Oklab**: sRGB → OkLab conversion ([`srgb_to_oklab`])
//! - **Palette**: stride sampling + median-cut dominant color ([`dominant_color`])
//! - **Lattice**: the 4×8×8 quantized base-color lattice and its
//!   chroma-aware nearest-point search ([`lattice::nearest`])

pub mod lattice;
pub mod oklab;
pub mod palette;

pub use lattice::BaseColor;
pub use oklab::{Oklab, srgb_to_oklab};
pub use palette::{dominant_color, sample_pixels};
