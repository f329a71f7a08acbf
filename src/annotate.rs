//! Document scanning and batch annotation.
//!
//! Walks a content directory for markdown documents, extracts every local
//! image reference, analyzes the images in parallel, and produces a JSON
//! manifest the site renderer consumes:
//!
//! ```text
//! {
//!   "version": 1,
//!   "documents": [
//!     {
//!       "path": "posts/alps.md",
//!       "images": {
//!         "./hero.jpg": { "width": 3000, "height": 2000, "lqip": -171388 }
//!       }
//!     }
//!   ]
//! }
//! ```
//!
//! Images are keyed by the URL exactly as written in the document, so the
//! renderer can match nodes without re-resolving paths. Skipped images are
//! reported (with reasons) but never written to the manifest and never
//! fail the build.
//!
//! ## Parallel Processing
//!
//! All (document, image) jobs are flattened into one list and analyzed
//! with [rayon](https://docs.rs/rayon). Jobs share no mutable state and
//! results are regrouped in job order, so the manifest is byte-identical
//! run to run regardless of scheduling.

use crate::analyze::{self, Outcome, Placeholder};
use crate::config::Config;
use crate::encode::EncodeError;
use crate::imaging::ImageBackend;
use crate::resolve::{self, Inference, SourceLookup};
use pulldown_cmark::{Event, Parser, Tag};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnnotateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    // Invariant violation in the bit layout — the one condition that must
    // abort the batch instead of skipping.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Manifest written for the renderer. Only annotated images appear.
#[derive(Debug, Serialize)]
pub struct Manifest {
    pub version: u32,
    pub documents: Vec<DocumentEntry>,
}

pub const MANIFEST_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
pub struct DocumentEntry {
    /// Document path relative to the content root, `/`-separated.
    pub path: String,
    /// Reference URL as written in the document → placeholder.
    pub images: BTreeMap<String, Placeholder>,
}

/// Full per-image results, including skips, for CLI reporting.
#[derive(Debug)]
pub struct Report {
    pub documents: Vec<DocumentReport>,
}

#[derive(Debug)]
pub struct DocumentReport {
    pub path: String,
    pub images: Vec<(String, Outcome)>,
}

impl Report {
    pub fn annotated_count(&self) -> usize {
        self.outcomes()
            .filter(|o| matches!(o, Outcome::Annotated(_)))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes()
            .filter(|o| matches!(o, Outcome::Skipped(_)))
            .count()
    }

    fn outcomes(&self) -> impl Iterator<Item = &Outcome> {
        self.documents
            .iter()
            .flat_map(|d| d.images.iter().map(|(_, o)| o))
    }

    /// Build the renderer manifest: annotated images only.
    pub fn to_manifest(&self) -> Manifest {
        let documents = self
            .documents
            .iter()
            .filter_map(|doc| {
                let images: BTreeMap<String, Placeholder> = doc
                    .images
                    .iter()
                    .filter_map(|(url, outcome)| match outcome {
                        Outcome::Annotated(p) => Some((url.clone(), *p)),
                        Outcome::Skipped(_) => None,
                    })
                    .collect();
                (!images.is_empty()).then(|| DocumentEntry {
                    path: doc.path.clone(),
                    images,
                })
            })
            .collect();
        Manifest {
            version: MANIFEST_VERSION,
            documents,
        }
    }
}

/// Extract local image URLs from markdown, in document order, deduplicated.
fn image_urls(markdown: &str) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    for event in Parser::new(markdown) {
        if let Event::Start(Tag::Image { dest_url, .. }) = event {
            let url = dest_url.to_string();
            if !resolve::is_remote(&url) && !urls.contains(&url) {
                urls.push(url);
            }
        }
    }
    urls
}

/// Collect markdown documents under the content root, sorted by path so
/// manifest order is stable across filesystems.
fn collect_documents(content_root: &Path) -> Result<Vec<PathBuf>, AnnotateError> {
    let mut documents: Vec<PathBuf> = walkdir::WalkDir::new(content_root)
        .sort_by_file_name()
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AnnotateError::Io(e.into()))?
        .into_iter()
        .filter(|e| e.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("md") || e.eq_ignore_ascii_case("markdown"))
        })
        .collect();
    documents.sort();
    Ok(documents)
}

/// One (document, image reference) unit of work.
struct Job {
    doc_index: usize,
    url: String,
    path: PathBuf,
}

/// Analyze every image referenced by every document under `content_root`.
pub fn annotate(
    backend: &impl ImageBackend,
    content_root: &Path,
    config: &Config,
    lookup: &dyn SourceLookup,
) -> Result<Report, AnnotateError> {
    let documents = collect_documents(content_root)?;

    let mut doc_paths = Vec::with_capacity(documents.len());
    let mut jobs = Vec::new();
    for (doc_index, doc) in documents.iter().enumerate() {
        let markdown = std::fs::read_to_string(doc)?;
        let relative = doc
            .strip_prefix(content_root)
            .unwrap_or(doc)
            .to_string_lossy()
            .replace('\\', "/");
        doc_paths.push(relative);

        for url in image_urls(&markdown) {
            let mut path =
                resolve::resolve_image_path(&url, doc, &config.alias_prefix, content_root);
            if !path.exists() {
                if let Inference::Found(inferred) = lookup.infer(&url) {
                    path = inferred;
                }
            }
            jobs.push(Job {
                doc_index,
                url,
                path,
            });
        }
    }

    // Embarrassingly parallel: each job reads one file and owns its math.
    let outcomes: Vec<Outcome> = jobs
        .par_iter()
        .map(|job| analyze::analyze_image(backend, &job.path, config))
        .collect::<Result<Vec<_>, _>>()?;

    let mut reports: Vec<DocumentReport> = doc_paths
        .into_iter()
        .map(|path| DocumentReport {
            path,
            images: Vec::new(),
        })
        .collect();
    for (job, outcome) in jobs.into_iter().zip(outcomes) {
        reports[job.doc_index].images.push((job.url, outcome));
    }

    Ok(Report { documents: reports })
}

/// Serialize the manifest as pretty-printed JSON at `path`.
pub fn write_manifest(manifest: &Manifest, path: &Path) -> Result<(), AnnotateError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(path, json)?;
    Ok(())
}
