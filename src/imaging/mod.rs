//! Image loading and sampling — pure Rust, zero external dependencies.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image` crate (JPEG, PNG, GIF, WebP, TIFF) |
//! | **Orientation** | EXIF via `ImageDecoder::orientation` |
//! | **Opacity check** | alpha-channel scan |
//! | **Grid downscale** | Lanczos3 + `unsharpen` |
//!
//! The module is split into:
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Grid**: 3×2 preview sampling ([`grid::sample`])

pub mod backend;
pub mod grid;
pub mod rust_backend;

pub use backend::{BackendError, DecodedImage, ImageBackend};
pub use grid::{GridSample, sample as sample_grid};
pub use rust_backend::{RustBackend, supported_input_extensions};
