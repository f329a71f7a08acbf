//! Pipeline configuration: `blurhint.toml` loading and defaults.
//!
//! The file is optional and every field has a default, so a bare content
//! directory works with zero setup:
//!
//! ```toml
//! # blurhint.toml
//! stride = 10            # sample every Nth pixel for the palette
//! palette_size = 4       # median-cut color count (first entry is used)
//! alpha_threshold = 125  # palette samples below this alpha are dropped
//! alias_prefix = "~/"    # root-relative image URL prefix
//! threads = 0            # 0 = one rayon worker per core
//! # lookup_dir = "originals"  # enable hashed-asset source inference
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config filename looked up in the content root.
pub const CONFIG_FILENAME: &str = "blurhint.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Palette sampling interval: every Nth pixel.
    pub stride: usize,
    /// Median-cut palette size; only the dominant entry feeds the encoder.
    pub palette_size: usize,
    /// Minimum alpha for a pixel to join the palette sample set.
    pub alpha_threshold: u8,
    /// Prefix marking root-relative image URLs.
    pub alias_prefix: String,
    /// Directory scanned to recover sources for hashed asset references.
    /// `None` disables inference entirely.
    pub lookup_dir: Option<PathBuf>,
    /// Rayon worker count; 0 means one per core.
    pub threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stride: crate::color::palette::DEFAULT_STRIDE,
            palette_size: crate::color::palette::DEFAULT_PALETTE_SIZE,
            alpha_threshold: crate::color::palette::DEFAULT_ALPHA_THRESHOLD,
            alias_prefix: "~/".to_string(),
            lookup_dir: None,
            threads: 0,
        }
    }
}

impl Config {
    /// Load `blurhint.toml` from the content root, or defaults when absent.
    pub fn load(content_root: &Path) -> Result<Self, ConfigError> {
        let path = content_root.join(CONFIG_FILENAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse { path, source })
    }
}
