//! Error types for the mdsection library.
//!
//! Every failure in this pipeline indicates an upstream data defect or a
//! filesystem problem, never a transient remote fault, so the taxonomy is
//! deliberately flat: one [`NormalizeError`] enum, surfaced fail-fast. Each
//! variant carries enough context (document path, failing image path, retry
//! count) to diagnose the problem without re-running OCR.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the mdsection library.
#[derive(Debug, Error)]
pub enum NormalizeError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// No `doc.md` at the expected location inside the OCR output directory.
    #[error("Markdown document not found: '{path}'\nExpected the OCR archival layer to have written doc.md here.")]
    DocNotFound { path: PathBuf },

    /// The Markdown file exists but could not be read as UTF-8 text.
    #[error("Malformed Markdown input at '{path}': {detail}")]
    MalformedInput { path: PathBuf, detail: String },

    // ── Image resolution errors ───────────────────────────────────────────
    /// An image referenced in the Markdown does not exist on disk.
    #[error("Image '{relative}' referenced in the document does not resolve (looked at '{resolved}')\nThis indicates an incomplete OCR archival run.")]
    ImageNotFound { relative: String, resolved: PathBuf },

    /// The image file exists but reading its bytes failed.
    #[error("Failed to read image '{path}': {source}")]
    ImageUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Persistence errors ────────────────────────────────────────────────
    /// Writing the cleaned content back to the backing store failed after
    /// bounded retries. The in-memory document remains valid; later re-loads
    /// will see the stale, uncleaned content.
    #[error("Failed to persist cleaned content to '{path}' after {attempts} attempt(s): {source}")]
    PersistFailed {
        path: PathBuf,
        attempts: u32,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
