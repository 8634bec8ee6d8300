//! Pipeline stages for OCR-output normalization.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable against literal Markdown
//! fixtures and lets us swap implementations without touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! clean ───────▶ build ──────────▶ chunk
//! (strip refs)   (inline images)   (split on headings)
//! ```
//!
//! 1. [`clean`]  — strip the trailing references/bibliography section and
//!    propagate the truncation to the backing store
//! 2. [`build`]  — resolve every `<img>` reference against the image
//!    directory and assemble the immutable [`Document`](crate::Document)
//! 3. [`chunk`]  — split the document body on numbered top-level section
//!    headings into an ordered, lossless chunk sequence
//!
//! [`encode`] is the image codec adapter consumed by `build`; [`store`] is
//! the backing-store access (`doc.md` load and atomic persist) consumed by
//! `clean` and the top-level entry points.

pub mod build;
pub mod chunk;
pub mod clean;
pub mod encode;
pub mod store;
