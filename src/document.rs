//! Core document types shared by every pipeline stage.
//!
//! A [`Document`] is the self-contained unit produced by the builder: the
//! full Markdown body, every referenced image inlined as base64, and a
//! content-derived identifier. [`DocumentChunk`]s are derived, read-only
//! views produced by the chunking pass — they back-reference the owning
//! document via `doc_id` but never own image data themselves.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Compute the stable identifier for a document body.
///
/// SHA-256 over the exact bytes of `content`, lowercase hex. Two documents
/// with identical content always share a `doc_id`. The choice of hash is an
/// implementation detail, not a cross-version stability contract.
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// One inlined image extracted from a document's Markdown body.
///
/// Owned exclusively by the [`Document`] that embeds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageData {
    /// Base64-encoded image payload (standard alphabet, no data-URI prefix).
    pub data: String,
    /// Resolved filesystem location of the source image at build time.
    pub absolute_path: PathBuf,
    /// Path exactly as it appeared in the Markdown `src` attribute.
    pub relative_path: String,
}

/// A normalized OCR document: cleaned Markdown plus its inlined images.
///
/// Immutable after construction. The reference cleaner never mutates a
/// `Document` in place; it produces a new value with `doc_id` recomputed so
/// the identifier always matches the content it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Content-derived identifier; see [`content_hash`].
    pub doc_id: String,
    /// Full Markdown body (reference-cleaned, pre-chunking).
    pub content: String,
    /// Inlined images, in order of first appearance in `content`.
    pub images: Vec<ImageData>,
    /// Free-form metadata; empty at construction time.
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Document {
    /// Construct a document, deriving `doc_id` from `content`.
    pub fn new(content: String, images: Vec<ImageData>) -> Self {
        let doc_id = content_hash(&content);
        Self {
            doc_id,
            content,
            images,
            metadata: BTreeMap::new(),
        }
    }

    /// Return a new document with `content` replaced and `doc_id` recomputed.
    ///
    /// Images and metadata carry over unchanged. This is the only sanctioned
    /// way to rewrite a document body — it keeps the `doc_id`-is-a-function-
    /// of-`content` invariant intact.
    pub fn with_content(&self, content: String) -> Self {
        let doc_id = content_hash(&content);
        Self {
            doc_id,
            content,
            images: self.images.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

/// One heading-delimited span of a document's Markdown body.
///
/// Derived view: created fresh on each chunking pass, never persisted or
/// mutated. Concatenating a document's chunks in `chunk_index` order
/// reproduces its `content` byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentChunk {
    /// `doc_id` of the owning [`Document`] (back-reference, not ownership).
    pub doc_id: String,
    /// Zero-based position, contiguous in document order.
    pub chunk_index: usize,
    /// The Markdown span, including its own heading line when it has one.
    pub content: String,
}
