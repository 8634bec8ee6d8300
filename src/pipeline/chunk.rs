//! Chunking: split a document body along numbered top-level section headings.
//!
//! A boundary is a level-2 or level-3 heading whose text starts with an
//! integer, a literal period, then whitespace or end of line — `## 1.
//! Introduction`, `### 12. Appendix`. Multi-level numbering is explicitly
//! not a boundary: `## 1.1 Subsection` stays inside the chunk opened by
//! `## 1. …`. The anchoring "one integer, one period, then not a digit" is
//! the subtle correctness point here and gets its own boundary-case tests.
//!
//! The split is a lossless partition: no trimming, no dropped whitespace —
//! concatenating the chunks in index order reproduces the document body
//! byte-for-byte.

use crate::document::{Document, DocumentChunk};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

// `\d+\.` followed by whitespace or end-of-line; `1.1` fails the
// post-period check because a digit follows the period.
static RE_SECTION_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^ {0,3}#{2,3}[ \t]+\d+\.(?:[ \t]|$)").unwrap());

/// Split a document into heading-delimited chunks.
///
/// Content before the first boundary (when non-empty) becomes chunk 0 even
/// though it has no heading of its own. A document with no boundaries yields
/// exactly one chunk holding the entire content. `chunk_index` is contiguous
/// from 0 and every chunk carries the owning document's `doc_id`.
pub fn split_document(document: &Document) -> Vec<DocumentChunk> {
    let content = &document.content;
    let starts: Vec<usize> = RE_SECTION_BOUNDARY
        .find_iter(content)
        .map(|m| m.start())
        .collect();
    debug!(boundaries = starts.len(), "Scanned for section boundaries");

    let mut chunks: Vec<DocumentChunk> = Vec::with_capacity(starts.len() + 1);
    let mut push = |chunks: &mut Vec<DocumentChunk>, span: &str| {
        chunks.push(DocumentChunk {
            doc_id: document.doc_id.clone(),
            chunk_index: chunks.len(),
            content: span.to_string(),
        });
    };

    if starts.is_empty() {
        push(&mut chunks, content);
        info!(chunk_count = 1, "No section boundaries, single chunk");
        return chunks;
    }

    if starts[0] > 0 {
        push(&mut chunks, &content[..starts[0]]);
    }
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(content.len());
        push(&mut chunks, &content[start..end]);
    }

    info!(chunk_count = chunks.len(), "Chunking complete");
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(content: &str) -> Document {
        Document::new(content.to_string(), Vec::new())
    }

    fn reassemble(chunks: &[DocumentChunk]) -> String {
        chunks.iter().map(|c| c.content.as_str()).collect()
    }

    #[test]
    fn splits_on_numbered_level2_headings() {
        let d = doc("## 1. Intro\nbody A\n## 2. Next\nbody C");
        let chunks = split_document(&d);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, "## 1. Intro\nbody A\n");
        assert_eq!(chunks[1].content, "## 2. Next\nbody C");
    }

    #[test]
    fn nested_numbering_is_not_a_boundary() {
        let d = doc("## 1. Intro\nbody A\n## 1.1 Sub\nbody B\n## 2. Next\nbody C");
        let chunks = split_document(&d);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, "## 1. Intro\nbody A\n## 1.1 Sub\nbody B\n");
        assert_eq!(chunks[1].content, "## 2. Next\nbody C");
    }

    #[test]
    fn preamble_becomes_chunk_zero() {
        let d = doc("abstract text\n## 1. Intro\nbody");
        let chunks = split_document(&d);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, "abstract text\n");
        assert_eq!(chunks[0].chunk_index, 0);
        assert_eq!(chunks[1].chunk_index, 1);
    }

    #[test]
    fn no_boundary_yields_one_chunk() {
        let d = doc("just prose\nwith lines\n");
        let chunks = split_document(&d);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, d.content);
    }

    #[test]
    fn empty_content_yields_one_empty_chunk() {
        let chunks = split_document(&doc(""));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "");
    }

    #[test]
    fn partition_is_lossless() {
        let d = doc("  pre \n\n## 1. A\n\nbody  \n### 2. B\ntail\n\n## 2.1 not a boundary\nend");
        let chunks = split_document(&d);
        assert_eq!(reassemble(&chunks), d.content);
    }

    #[test]
    fn indices_are_contiguous_from_zero() {
        let d = doc("p\n## 1. A\n## 2. B\n## 3. C\nx");
        let chunks = split_document(&d);
        for (i, c) in chunks.iter().enumerate() {
            assert_eq!(c.chunk_index, i);
            assert_eq!(c.doc_id, d.doc_id);
        }
    }

    #[test]
    fn adjacent_boundaries_yield_heading_only_chunk() {
        let d = doc("## 1. A\n## 2. B\nbody");
        let chunks = split_document(&d);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, "## 1. A\n");
    }

    #[test]
    fn level3_numbered_heading_is_a_boundary() {
        let d = doc("pre\n### 3. Results\nbody");
        let chunks = split_document(&d);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].content, "### 3. Results\nbody");
    }

    #[test]
    fn level1_and_level4_headings_are_not_boundaries() {
        assert_eq!(split_document(&doc("# 1. Title\nbody")).len(), 1);
        assert_eq!(split_document(&doc("#### 1. Deep\nbody")).len(), 1);
    }

    #[test]
    fn unnumbered_heading_is_not_a_boundary() {
        assert_eq!(split_document(&doc("## Introduction\nbody")).len(), 1);
    }

    #[test]
    fn number_without_period_is_not_a_boundary() {
        assert_eq!(split_document(&doc("## 1 Intro\nbody")).len(), 1);
    }

    #[test]
    fn period_at_end_of_line_is_a_boundary() {
        let d = doc("pre\n## 4.\nbody");
        assert_eq!(split_document(&d).len(), 2);
    }

    #[test]
    fn multi_digit_section_numbers_match() {
        let d = doc("## 10. Conclusion\nbody");
        let chunks = split_document(&d);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "## 10. Conclusion\nbody");
        // And as a real boundary mid-document:
        let d = doc("pre\n## 10. Conclusion\nbody");
        assert_eq!(split_document(&d).len(), 2);
    }

    #[test]
    fn indented_boundary_keeps_indentation_in_chunk() {
        let d = doc("pre\n   ## 2. Indented\nbody");
        let chunks = split_document(&d);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].content, "   ## 2. Indented\nbody");
        assert_eq!(reassemble(&chunks), d.content);
    }
}
