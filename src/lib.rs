//! # Blurhint
//!
//! A build-time LQIP (Low-Quality Image Placeholder) generator for
//! markdown-driven sites. Blurhint scans your content directory, analyzes
//! every locally-referenced image, and emits a JSON manifest mapping each
//! image to a single integer a stylesheet can expand into a blurred color
//! preview — shown while the real image loads.
//!
//! # Architecture: Analyze, Then Annotate
//!
//! ```text
//! 1. Annotate   content/*.md  →  image references  (pulldown-cmark)
//! 2. Analyze    image file    →  encoded integer   (per-image pipeline)
//! 3. Manifest   results       →  manifest.json     (renderer input)
//! ```
//!
//! The per-image pipeline is a straight line of pure stages:
//!
//! ```text
//! load → opacity gate → palette (median cut) ┐
//!                     → grid sample (3×2)    ┴→ OkLab → lattice → bits
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`annotate`] | Walks content, extracts image refs, batches analyses, writes the manifest |
//! | [`analyze`] | Per-image orchestrator — produces a placeholder or a well-defined skip |
//! | [`resolve`] | Reference → path resolution (absolute, alias, document-relative) |
//! | [`imaging`] | Decoding, orientation correction, opacity stats, 3×2 grid sampling |
//! | [`color`] | OkLab conversion, median-cut dominant color, 4×8×8 lattice search |
//! | [`encode`] | 20-bit packing + bias into the CSS-safe integer |
//! | [`config`] | Optional `blurhint.toml` (stride, palette size, alias prefix, threads) |
//!
//! # Design Decisions
//!
//! ## One Integer, Not A Data URI
//!
//! The whole placeholder is 20 bits: a base color quantized onto a 4×8×8
//! OkLab lattice (8 bits) plus six 2-bit luminance deltas on a 3×2 grid.
//! Biased by −2^19 it always fits ±999999, which every CSS engine accepts
//! as an integer custom property value. No base64 blobs, no extra
//! requests, no layout shift — `--lqip:174781` inlined on the `<img>` is
//! the entire payload.
//!
//! ## OkLab Over RGB Packing
//!
//! An earlier design packed three raw RGB samples into a hex value.
//! Quantizing in a perceptually uniform space at the same bit budget keeps
//! hue identity dramatically better — equal numeric steps are equal visual
//! steps, so the 3-bit chroma axes spend their few values where the eye
//! can tell the difference.
//!
//! ## Skips Are Outcomes, Not Errors
//!
//! Missing files, extensions without a decoder, undecodable bytes,
//! transparency, degenerate palettes:
//! each converts to a reported skip and the document simply renders that
//! image without a placeholder. A content mistake must never fail a site
//! build. The one hard error is the encoder's range check, which can only
//! fire if the bit-layout constants themselves are wrong.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding uses the `image` crate's pure Rust decoders — no ImageMagick,
//! no libvips, no system dependencies. The binary is fully self-contained
//! and the same bytes produce the same placeholder on any machine.

pub mod analyze;
pub mod annotate;
pub mod color;
pub mod config;
pub mod encode;
pub mod imaging;
pub mod resolve;
