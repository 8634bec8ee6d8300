//! # mdsection
//!
//! Normalize the raw output of a third-party OCR service into a structured,
//! chunked document representation ready for language-model analysis.
//!
//! ## Why this crate?
//!
//! OCR services that turn a PDF into Markdown leave the result in an awkward
//! shape for downstream prompting: a trailing references section full of
//! citation noise, image tags pointing at loose files on disk, and one
//! monolithic body too large to analyze section by section. This crate fixes
//! all three with a small deterministic pipeline.
//!
//! ## Pipeline Overview
//!
//! ```text
//! OCR output dir (doc.md + imgs/)
//!  │
//!  ├─ 1. Clean   strip the references/bibliography section, persist back
//!  ├─ 2. Build   resolve <img> tags, inline base64 payloads → Document
//!  └─ 3. Chunk   split on numbered section headings → DocumentChunk[]
//! ```
//!
//! Each stage consumes the previous stage's output; the split is lossless —
//! concatenating the chunks reproduces the document body byte-for-byte.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mdsection::{normalize_dir, NormalizeConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = NormalizeConfig::default();
//!     let out = normalize_dir("PDF_Extraction/my-paper", &config)?;
//!     println!("doc {} → {} chunks, {} images",
//!         out.document.doc_id,
//!         out.chunks.len(),
//!         out.document.images.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `mdsection` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! mdsection = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod document;
pub mod error;
pub mod normalize;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{MissingImagePolicy, NormalizeConfig, NormalizeConfigBuilder};
pub use document::{content_hash, Document, DocumentChunk, ImageData};
pub use error::NormalizeError;
pub use normalize::{normalize_dir, normalize_str, NormalizeStats, NormalizedDocument};
