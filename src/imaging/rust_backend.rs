//! Pure Rust image loading backend — zero external dependencies.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF, WebP, TIFF) | `image` crate (pure Rust decoders) |
//! | EXIF orientation | `ImageDecoder::orientation` + `DynamicImage::apply_orientation` |
//! | Opacity statistics | alpha-channel scan (see [`is_fully_opaque`]) |

use super::backend::{BackendError, DecodedImage, ImageBackend};
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use std::path::Path;
use std::sync::LazyLock;

/// Extensions whose decoders are compiled in and known to work.
const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("gif", ImageFormat::Gif),
    ("webp", ImageFormat::WebP),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Pure Rust backend using the `image` crate ecosystem.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Check whether every pixel of the image is fully opaque.
///
/// Formats without an alpha channel are opaque by definition. The common
/// 8-bit layouts are scanned directly; deeper layouts go through a 16-bit
/// view so near-opaque high-bit-depth alpha is not rounded up to opaque.
pub fn is_fully_opaque(img: &DynamicImage) -> bool {
    if !img.color().has_alpha() {
        return true;
    }
    match img {
        DynamicImage::ImageRgba8(pixels) => pixels.pixels().all(|p| p.0[3] == u8::MAX),
        DynamicImage::ImageLumaA8(pixels) => pixels.pixels().all(|p| p.0[1] == u8::MAX),
        _ => img.to_rgba16().pixels().all(|p| p.0[3] == u16::MAX),
    }
}

impl ImageBackend for RustBackend {
    fn load(&self, path: &Path) -> Result<DecodedImage, BackendError> {
        let mut decoder = ImageReader::open(path)
            .map_err(BackendError::Io)?
            .into_decoder()
            .map_err(|e| {
                BackendError::DecodeFailed(format!("{}: {}", path.display(), e))
            })?;

        // Orientation must be read before the pixels are consumed. Files
        // without EXIF report NoTransforms.
        let orientation = decoder
            .orientation()
            .unwrap_or(Orientation::NoTransforms);

        let mut pixels = DynamicImage::from_decoder(decoder).map_err(|e| {
            BackendError::DecodeFailed(format!("{}: {}", path.display(), e))
        })?;

        let fully_opaque = is_fully_opaque(&pixels);
        pixels.apply_orientation(orientation);

        Ok(DecodedImage {
            pixels,
            fully_opaque,
        })
    }
}
