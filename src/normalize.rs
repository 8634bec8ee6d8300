//! Top-level entry points wiring the three pipeline stages together.
//!
//! [`normalize_dir`] is the primary API: point it at one OCR output
//! directory (`doc.md` + `imgs/`) and get back the cleaned [`Document`],
//! its chunk sequence, and per-stage stats. [`normalize_str`] is the pure
//! variant for callers that already hold the text in memory — it never
//! touches the backing store.
//!
//! The whole pipeline is single-threaded and synchronous: every stage is a
//! transformation over already-materialized text and a bounded, pre-resolved
//! image directory. Parallelism across documents belongs to the caller, who
//! can invoke these functions concurrently as long as each call operates on
//! a distinct directory.

use crate::config::NormalizeConfig;
use crate::document::{Document, DocumentChunk};
use crate::error::NormalizeError;
use crate::pipeline::{build, chunk, clean, store};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Timing and volume statistics for one normalization run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizeStats {
    /// Whether the cleaner truncated a reference section.
    pub cleaned: bool,
    /// Bytes removed by the cleaner (0 when `!cleaned`).
    pub bytes_removed: usize,
    /// Number of images inlined into the document.
    pub image_count: usize,
    /// Number of chunks produced.
    pub chunk_count: usize,
    pub clean_duration_ms: u64,
    pub build_duration_ms: u64,
    pub chunk_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// The complete output of one normalization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedDocument {
    /// The cleaned, self-contained document.
    pub document: Document,
    /// Heading-delimited chunks in document order.
    pub chunks: Vec<DocumentChunk>,
    /// Per-stage timing and counts.
    pub stats: NormalizeStats,
}

/// Normalize one OCR output directory.
///
/// Loads `doc.md` from `dir`, strips the reference section (persisting the
/// truncation back to `doc.md` unless `config.persist` is off), inlines every
/// image referenced in the text, and chunks the result.
///
/// # Errors
/// - [`NormalizeError::DocNotFound`] / [`NormalizeError::MalformedInput`] —
///   `doc.md` missing or not valid UTF-8
/// - [`NormalizeError::ImageNotFound`] / [`NormalizeError::ImageUnreadable`]
///   — an image reference did not resolve (under the default fail-fast
///   policy; no partial document is returned)
/// - [`NormalizeError::PersistFailed`] — the cleaned content could not be
///   written back; the previous `doc.md` content is left intact
pub fn normalize_dir(
    dir: impl AsRef<Path>,
    config: &NormalizeConfig,
) -> Result<NormalizedDocument, NormalizeError> {
    let dir = dir.as_ref();
    let total_start = Instant::now();
    info!(dir = %dir.display(), "Normalizing OCR output");

    let raw = store::load_markdown(dir)?;

    let clean_start = Instant::now();
    let outcome = clean::clean_and_persist(&raw, dir, config)?;
    let clean_duration_ms = clean_start.elapsed().as_millis() as u64;

    run_stages(
        outcome.content,
        dir,
        config,
        NormalizeStats {
            cleaned: outcome.truncated,
            bytes_removed: outcome.bytes_removed,
            clean_duration_ms,
            ..NormalizeStats::default()
        },
        total_start,
    )
}

/// Normalize Markdown text already held in memory.
///
/// Identical semantics to [`normalize_dir`] except the text is taken from
/// the caller and nothing is ever written back — the cleaner's truncation
/// exists only in the returned document. Image references are resolved
/// against `image_dir`.
pub fn normalize_str(
    content: &str,
    image_dir: impl AsRef<Path>,
    config: &NormalizeConfig,
) -> Result<NormalizedDocument, NormalizeError> {
    let total_start = Instant::now();

    let clean_start = Instant::now();
    let outcome = clean::clean_text(content, config);
    let clean_duration_ms = clean_start.elapsed().as_millis() as u64;

    run_stages(
        outcome.content,
        image_dir.as_ref(),
        config,
        NormalizeStats {
            cleaned: outcome.truncated,
            bytes_removed: outcome.bytes_removed,
            clean_duration_ms,
            ..NormalizeStats::default()
        },
        total_start,
    )
}

/// Shared build + chunk tail of both entry points.
fn run_stages(
    cleaned: String,
    image_dir: &Path,
    config: &NormalizeConfig,
    mut stats: NormalizeStats,
    total_start: Instant,
) -> Result<NormalizedDocument, NormalizeError> {
    let build_start = Instant::now();
    let document = build::build_document(&cleaned, image_dir, config)?;
    stats.build_duration_ms = build_start.elapsed().as_millis() as u64;

    let chunk_start = Instant::now();
    let chunks = chunk::split_document(&document);
    stats.chunk_duration_ms = chunk_start.elapsed().as_millis() as u64;

    stats.image_count = document.images.len();
    stats.chunk_count = chunks.len();
    stats.total_duration_ms = total_start.elapsed().as_millis() as u64;

    info!(
        doc_id = %document.doc_id,
        images = stats.image_count,
        chunks = stats.chunk_count,
        cleaned = stats.cleaned,
        duration_ms = stats.total_duration_ms,
        "Normalization complete"
    );

    Ok(NormalizedDocument {
        document,
        chunks,
        stats,
    })
}
