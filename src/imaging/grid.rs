//! Low-resolution preview grid sampling.
//!
//! Downscales a decoded image to a 3×2 grid of RGB cells — the luminance
//! skeleton of the placeholder. The downscale uses Lanczos3 followed by a
//! light unsharp mask: at this resolution plain resampling washes out
//! color transitions, and the placeholder reads as a single mush.

use super::backend::DecodedImage;
use image::DynamicImage;
use image::imageops::FilterType;

/// Grid geometry: 3 columns × 2 rows, row-major.
pub const GRID_COLS: u32 = 3;
pub const GRID_ROWS: u32 = 2;
pub const GRID_CELLS: usize = (GRID_COLS * GRID_ROWS) as usize;

/// Unsharp-mask parameters applied after the downscale.
const SHARPEN_SIGMA: f32 = 0.5;
const SHARPEN_THRESHOLD: i32 = 0;

/// The sampled preview grid plus the image's display dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSample {
    /// Cell colors in row-major order (left-to-right, top-to-bottom).
    pub cells: [[u8; 3]; GRID_CELLS],
    /// Orientation-corrected dimensions.
    pub width: u32,
    pub height: u32,
}

/// Downscale to the preview grid and strip alpha.
///
/// Opacity is validated upstream, so dropping the alpha channel here loses
/// nothing.
pub fn sample(image: &DecodedImage) -> GridSample {
    let small: DynamicImage = image
        .pixels
        .resize_exact(GRID_COLS, GRID_ROWS, FilterType::Lanczos3);
    let sharpened =
        image::imageops::unsharpen(&small.to_rgb8(), SHARPEN_SIGMA, SHARPEN_THRESHOLD);

    let mut cells = [[0u8; 3]; GRID_CELLS];
    for (i, cell) in cells.iter_mut().enumerate() {
        let x = i as u32 % GRID_COLS;
        let y = i as u32 / GRID_COLS;
        *cell = sharpened.get_pixel(x, y).0;
    }

    GridSample {
        cells,
        width: image.width(),
        height: image.height(),
    }
}
