//! Image reference resolution.
//!
//! Markdown documents reference images three ways:
//!
//! - absolute paths — passed through untouched
//! - alias-prefixed paths (`~/images/hero.jpg`) — resolved against a
//!   configured alias root
//! - anything else — resolved relative to the referencing document's
//!   directory
//!
//! Remote URLs (`https://…`, protocol-relative `//…`) are filtered out
//! before resolution; the pipeline only reads local files.
//!
//! When a reference points at an optimized/hashed build artifact whose
//! source path is unrecoverable, an optional [`SourceLookup`] can scan a
//! directory for the original. That heuristic is best-effort by design and
//! answers [`Inference::NotInferred`] rather than guessing.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// True for URLs the pipeline must never touch: anything with a scheme
/// (`https://…`, `ftp://…`) or protocol-relative (`//cdn.example/x.png`).
pub fn is_remote(url: &str) -> bool {
    if url.starts_with("//") {
        return true;
    }
    match url.split_once("://") {
        Some((scheme, _)) => {
            !scheme.is_empty() && scheme.bytes().all(|b| b.is_ascii_lowercase())
        }
        None => false,
    }
}

/// Resolve an image URL to a filesystem path.
///
/// `doc_path` is the referencing document; `alias_root` anchors
/// `alias_prefix` references (typically the content root).
pub fn resolve_image_path(
    url: &str,
    doc_path: &Path,
    alias_prefix: &str,
    alias_root: &Path,
) -> PathBuf {
    let path = Path::new(url);
    if path.is_absolute() {
        return path.to_path_buf();
    }

    if let Some(rest) = url.strip_prefix(alias_prefix) {
        return alias_root.join(rest);
    }

    let doc_dir = doc_path.parent().unwrap_or(Path::new(""));
    doc_dir.join(url)
}

/// Result of a source-inference attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inference {
    Found(PathBuf),
    NotInferred,
}

/// Capability to recover a source image from an unresolvable reference.
pub trait SourceLookup: Sync {
    fn infer(&self, url: &str) -> Inference;
}

/// Lookup that never infers anything — the default.
pub struct NoLookup;

impl SourceLookup for NoLookup {
    fn infer(&self, _url: &str) -> Inference {
        Inference::NotInferred
    }
}

/// Scans a directory for a unique file whose stem starts with the
/// reference's stem, ignoring a trailing hash segment.
///
/// Example: `/assets/hero.CtL9mWoV.webp` infers `<dir>/hero.webp` when that
/// is the only candidate. Zero or multiple matches answer `NotInferred` —
/// ambiguity must never silently pick a file.
pub struct StemScanLookup {
    dir: PathBuf,
}

impl StemScanLookup {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Stem of the referenced file with at most one trailing dot-segment
    /// (the asset hash) removed: `hero.CtL9mWoV` → `hero`.
    fn reference_stem(url: &str) -> Option<String> {
        let name = url.rsplit('/').next()?;
        let stem = Path::new(name).file_stem()?.to_str()?;
        let stem = Path::new(stem)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(stem);
        (!stem.is_empty()).then(|| stem.to_string())
    }
}

impl SourceLookup for StemScanLookup {
    fn infer(&self, url: &str) -> Inference {
        let Some(stem) = Self::reference_stem(url) else {
            return Inference::NotInferred;
        };
        let extension = Path::new(url)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        let mut matches = Vec::new();
        for entry in WalkDir::new(&self.dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
        {
            let candidate_stem = entry.path().file_stem().and_then(|s| s.to_str());
            let candidate_ext = entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_lowercase);
            if candidate_stem == Some(stem.as_str()) && candidate_ext == extension {
                matches.push(entry.into_path());
            }
        }

        match matches.as_slice() {
            [single] => Inference::Found(single.clone()),
            _ => Inference::NotInferred,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_urls_are_detected() {
        assert!(is_remote("https://example.com/a.png"));
        assert!(is_remote("http://example.com/a.png"));
        assert!(is_remote("ftp://example.com/a.png"));
        assert!(is_remote("//cdn.example.com/a.png"));
    }

    #[test]
    fn local_urls_are_not_remote() {
        assert!(!is_remote("./images/a.png"));
        assert!(!is_remote("images/a.png"));
        assert!(!is_remote("/var/content/a.png"));
        assert!(!is_remote("~/images/a.png"));
    }

    #[test]
    fn absolute_paths_pass_through() {
        let resolved = resolve_image_path(
            "/data/images/a.png",
            Path::new("/content/posts/post.md"),
            "~/",
            Path::new("/content"),
        );
        assert_eq!(resolved, PathBuf::from("/data/images/a.png"));
    }

    #[test]
    fn alias_resolves_against_alias_root() {
        let resolved = resolve_image_path(
            "~/images/a.png",
            Path::new("/content/posts/post.md"),
            "~/",
            Path::new("/content"),
        );
        assert_eq!(resolved, PathBuf::from("/content/images/a.png"));
    }

    #[test]
    fn relative_resolves_against_document_dir() {
        let resolved = resolve_image_path(
            "./images/a.png",
            Path::new("/content/posts/post.md"),
            "~/",
            Path::new("/content"),
        );
        assert_eq!(resolved, PathBuf::from("/content/posts/./images/a.png"));

        let bare = resolve_image_path(
            "a.png",
            Path::new("/content/posts/post.md"),
            "~/",
            Path::new("/content"),
        );
        assert_eq!(bare, PathBuf::from("/content/posts/a.png"));
    }

    #[test]
    fn no_lookup_never_infers() {
        assert_eq!(NoLookup.infer("/assets/hero.abc123.webp"), Inference::NotInferred);
    }

    #[test]
    fn stem_scan_finds_unique_match() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(tmp.path().join("hero.webp"), b"x").unwrap();
        std::fs::write(tmp.path().join("other.webp"), b"x").unwrap();

        let lookup = StemScanLookup::new(tmp.path());
        assert_eq!(
            lookup.infer("/assets/hero.CtL9mWoV.webp"),
            Inference::Found(tmp.path().join("hero.webp"))
        );
    }

    #[test]
    fn stem_scan_refuses_ambiguous_match() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("a")).unwrap();
        std::fs::create_dir(tmp.path().join("b")).unwrap();
        std::fs::write(tmp.path().join("a/hero.webp"), b"x").unwrap();
        std::fs::write(tmp.path().join("b/hero.webp"), b"x").unwrap();

        let lookup = StemScanLookup::new(tmp.path());
        assert_eq!(lookup.infer("/assets/hero.abc.webp"), Inference::NotInferred);
    }

    #[test]
    fn stem_scan_misses_cleanly() {
        let tmp = tempfile::TempDir::new().unwrap();
        let lookup = StemScanLookup::new(tmp.path());
        assert_eq!(lookup.infer("/assets/hero.abc.webp"), Inference::NotInferred);
    }
}
