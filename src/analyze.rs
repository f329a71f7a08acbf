//! Per-image analysis pipeline — the orchestrator.
//!
//! Given a resolved file path, runs the full chain:
//!
//! ```text
//! load → opacity gate → (palette + grid) → OkLab → lattice search → encode
//! ```
//!
//! Every recoverable condition (missing file, unsupported extension,
//! undecodable bytes, alpha, empty palette) is absorbed into a
//! [`Skip`](Outcome::Skipped) outcome —
//! a skipped image simply gets no placeholder, it never fails the batch.
//! The only hard error is the encoder's range check, which signals broken
//! bit-layout constants rather than bad input.
//!
//! Analyses are self-contained (one file read, in-memory math, one value
//! out) and share no mutable state, so the batch stage runs them freely in
//! parallel.

use crate::color::{self, lattice};
use crate::config::Config;
use crate::encode::{self, EncodeError, GRID_CELLS};
use crate::imaging::{self, ImageBackend};
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// A computed placeholder: the value the renderer inlines as `--lqip`,
/// plus orientation-corrected dimensions for the `width`/`height` attrs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placeholder {
    pub width: u32,
    pub height: u32,
    pub lqip: i32,
}

/// Why an image produced no placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The reference did not resolve to an existing file.
    NotFound,
    /// The file's extension has no compiled-in decoder (empty string when
    /// the file has no extension at all).
    UnsupportedFormat(String),
    /// The file exists but could not be decoded as an image.
    Undecodable(String),
    /// At least one pixel is not fully opaque. Policy, not an error: the
    /// CSS technique assumes no alpha blending in the placeholder.
    NotOpaque,
    /// Quantization produced no usable palette (degenerate image).
    EmptyPalette,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotFound => write!(f, "file not found"),
            SkipReason::UnsupportedFormat(ext) if ext.is_empty() => {
                write!(f, "no file extension")
            }
            SkipReason::UnsupportedFormat(ext) => write!(f, "no decoder for .{ext}"),
            SkipReason::Undecodable(detail) => write!(f, "decode failed: {detail}"),
            SkipReason::NotOpaque => write!(f, "image is not fully opaque"),
            SkipReason::EmptyPalette => write!(f, "no usable palette"),
        }
    }
}

/// Outcome of analyzing one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Annotated(Placeholder),
    Skipped(SkipReason),
}

/// Analyze the image at `path` and produce its placeholder or a skip.
///
/// Determinism: identical file bytes always yield the identical encoded
/// value — every stage (sampling, median cut, lattice search, packing) has
/// fixed iteration order and no randomness.
pub fn analyze_image(
    backend: &impl ImageBackend,
    path: &Path,
    config: &Config,
) -> Result<Outcome, EncodeError> {
    if !path.exists() {
        return Ok(Outcome::Skipped(SkipReason::NotFound));
    }

    // Extension gate before any decode attempt: a document can reference
    // anything, but only files with a compiled-in decoder are analyzable.
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    if !imaging::supported_input_extensions().contains(&extension.as_str()) {
        return Ok(Outcome::Skipped(SkipReason::UnsupportedFormat(extension)));
    }

    let decoded = match backend.load(path) {
        Ok(decoded) => decoded,
        Err(e) => return Ok(Outcome::Skipped(SkipReason::Undecodable(e.to_string()))),
    };

    if !decoded.fully_opaque {
        return Ok(Outcome::Skipped(SkipReason::NotOpaque));
    }

    // Palette and grid read the same decoded pixels independently.
    let rgba = decoded.pixels.to_rgba8();
    let samples = color::sample_pixels(rgba.as_raw(), config.stride, config.alpha_threshold);
    let Some(dominant) = color::dominant_color(&samples, config.palette_size) else {
        return Ok(Outcome::Skipped(SkipReason::EmptyPalette));
    };
    let grid = imaging::sample_grid(&decoded);

    // Quantize the dominant color onto the lattice; the *decoded* lattice
    // lightness is the brightness reference for the grid, so the encoder
    // and the stylesheet decoder agree on the base.
    let base = lattice::nearest(color::srgb_to_oklab(dominant[0], dominant[1], dominant[2]));
    let base_l = base.decode().l;

    let mut deltas = [0.0f32; GRID_CELLS];
    for (delta, cell) in deltas.iter_mut().zip(grid.cells.iter()) {
        let cell_l = color::srgb_to_oklab(cell[0], cell[1], cell[2]).l;
        *delta = encode::luminance_delta(cell_l, base_l);
    }

    let lqip = encode::encode(&deltas, base)?;
    Ok(Outcome::Annotated(Placeholder {
        width: grid.width,
        height: grid.height,
        lqip,
    }))
}
