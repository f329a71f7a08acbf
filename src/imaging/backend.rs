//! Image loading backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the single injected capability the
//! analysis pipeline needs: path → decoded image. Keeping it a trait (and
//! not a free function) means the orchestrator never reaches into ambient
//! state, and tests can feed it synthetic pixels without touching disk.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend) — pure Rust `image`
//! crate decoders, statically linked.

use image::DynamicImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    DecodeFailed(String),
}

/// A decoded image ready for analysis.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Pixel data with EXIF orientation already applied, so `pixels.width()`
    /// and `pixels.height()` are the display dimensions.
    pub pixels: DynamicImage,
    /// True when every pixel is fully opaque (or the format has no alpha).
    pub fully_opaque: bool,
}

impl DecodedImage {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// Trait for image loading backends.
pub trait ImageBackend: Sync {
    /// Decode the image at `path`, applying orientation correction and
    /// computing opacity statistics.
    fn load(&self, path: &Path) -> Result<DecodedImage, BackendError>;
}
