//! Reference cleaning: strip trailing bibliography sections from raw Markdown.
//!
//! OCR output of academic PDFs almost always ends with a references section
//! that is pure noise for downstream analysis — dozens of citation lines the
//! language model would happily summarize as content. The cleaner finds the
//! first level-2 heading whose text matches a recognized set ("References",
//! "参考文献", …) and drops that line and everything after it.
//!
//! Matching is exact on heading level: a `### References` sub-heading deep in
//! an appendix must not truncate the document. Only the first match in
//! document order wins — if a body section is legitimately titled
//! "References", everything after it is dropped; there is no way to tell a
//! false positive from the real thing without semantic understanding.

use crate::config::NormalizeConfig;
use crate::document::Document;
use crate::error::NormalizeError;
use crate::pipeline::store;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::{debug, info};

// Level-2 only: the third character after `##` must not be another `#`,
// which the mandatory whitespace after `##` enforces.
static RE_LEVEL2_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ {0,3}##[ \t]+(.+?)[ \t]*$").unwrap());

/// Result of one cleaning pass.
#[derive(Debug, Clone)]
pub struct CleanOutcome {
    /// Content after truncation (identical to the input when `!truncated`).
    pub content: String,
    /// Whether a recognized reference heading was found and cut.
    pub truncated: bool,
    /// Bytes removed by the truncation (0 when `!truncated`).
    pub bytes_removed: usize,
}

/// Find the byte offset at which the reference section starts, if any.
///
/// Scans line-by-line in a single forward pass; returns the offset of the
/// first level-2 heading whose trimmed text case-insensitively equals one of
/// `headings`. Everything before that offset is preserved verbatim by the
/// caller, line endings included.
pub fn find_cutoff(content: &str, headings: &[String]) -> Option<usize> {
    let lowered: Vec<String> = headings.iter().map(|h| h.trim().to_lowercase()).collect();
    let mut offset = 0usize;
    for line in content.split_inclusive('\n') {
        let text = line.strip_suffix('\n').unwrap_or(line);
        if let Some(caps) = RE_LEVEL2_HEADING.captures(text) {
            let title = caps[1].trim().to_lowercase();
            if lowered.iter().any(|h| *h == title) {
                return Some(offset);
            }
        }
        offset += line.len();
    }
    None
}

/// Strip the reference section from raw Markdown text.
///
/// Identity transform when no recognized heading is present.
pub fn clean_text(content: &str, config: &NormalizeConfig) -> CleanOutcome {
    match find_cutoff(content, &config.reference_headings) {
        Some(cutoff) => {
            let bytes_removed = content.len() - cutoff;
            info!(
                cutoff,
                bytes_removed, "Reference section found, truncating content"
            );
            CleanOutcome {
                content: content[..cutoff].to_string(),
                truncated: true,
                bytes_removed,
            }
        }
        None => {
            debug!("No reference heading found, content unchanged");
            CleanOutcome {
                content: content.to_string(),
                truncated: false,
                bytes_removed: 0,
            }
        }
    }
}

/// Clean a document, returning a new [`Document`] with `doc_id` recomputed.
///
/// The input document is never mutated; when nothing was truncated the
/// result is an identical clone with the same `doc_id`.
pub fn clean_document(document: &Document, config: &NormalizeConfig) -> Document {
    let outcome = clean_text(&document.content, config);
    if outcome.truncated {
        document.with_content(outcome.content)
    } else {
        document.clone()
    }
}

/// Clean raw Markdown and propagate the truncation to the backing store.
///
/// When the cleaner truncated and `config.persist` is set, the new content
/// is written back to `doc.md` in `dir` atomically. Callers must not assume
/// the uncleaned content is recoverable afterwards. A persist failure leaves
/// the previously stored content intact and surfaces as
/// [`NormalizeError::PersistFailed`]; the returned outcome is still valid
/// in memory in that case, but this function propagates the error so the
/// caller knows later re-loads would see stale content.
pub fn clean_and_persist(
    content: &str,
    dir: &Path,
    config: &NormalizeConfig,
) -> Result<CleanOutcome, NormalizeError> {
    let outcome = clean_text(content, config);
    if outcome.truncated && config.persist {
        store::persist_markdown(
            dir,
            &outcome.content,
            config.persist_retries,
            config.persist_backoff_ms,
        )?;
    }
    Ok(outcome)
}
