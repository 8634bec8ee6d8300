//! Image encoding: file bytes → base64 text payload.
//!
//! The inlined payload makes a [`crate::Document`](crate::document::Document)
//! self-contained: downstream consumers (multimodal LLM prompts, JSON
//! archives) receive the image without touching the filesystem again. The
//! standard base64 alphabet is used with no data-URI prefix; callers that
//! need `data:image/png;base64,…` framing add it themselves, since the MIME
//! type depends on how the payload is consumed.

use crate::error::NormalizeError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;
use tracing::debug;

/// Encode an image file as a base64 string.
///
/// Fails with [`NormalizeError::ImageUnreadable`] if the path does not exist
/// or its bytes cannot be read.
pub fn encode_image(path: &Path) -> Result<String, NormalizeError> {
    let bytes = std::fs::read(path).map_err(|e| NormalizeError::ImageUnreadable {
        path: path.to_path_buf(),
        source: e,
    })?;
    let b64 = STANDARD.encode(&bytes);
    debug!(
        path = %path.display(),
        raw_bytes = bytes.len(),
        encoded_bytes = b64.len(),
        "Encoded image"
    );
    Ok(b64)
}
