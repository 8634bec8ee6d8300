//! Document building: resolve and inline every image referenced in the text.
//!
//! The OCR service emits inline HTML image tags (`<img src="imgs/p1_0.png">`)
//! rather than Markdown image syntax, with paths relative to the per-PDF
//! output directory. The builder resolves each `src` against that directory,
//! base64-encodes the file via [`super::encode`], and assembles the final
//! immutable [`Document`].
//!
//! Ordering is the order of first appearance in the text; a `src` repeated
//! later in the document contributes a single [`ImageData`]. Building the
//! same text against the same directory twice yields identical `doc_id` and
//! identical image sequences.

use crate::config::{MissingImagePolicy, NormalizeConfig};
use crate::document::{Document, ImageData};
use crate::error::NormalizeError;
use crate::pipeline::encode;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

static RE_IMG_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<img[^>]+src=['"]([^'"]+)['"]"#).unwrap());

/// Build a [`Document`] from cleaned Markdown and an image directory.
///
/// Collects one [`ImageData`] per distinct image reference, in order of
/// first appearance. Under the default
/// [`MissingImagePolicy::FailFast`] a reference that does not resolve on
/// disk aborts the build with [`NormalizeError::ImageNotFound`] — no partial
/// document is returned. Under [`MissingImagePolicy::Skip`] the reference is
/// dropped with a warning.
pub fn build_document(
    content: &str,
    image_dir: &Path,
    config: &NormalizeConfig,
) -> Result<Document, NormalizeError> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut images: Vec<ImageData> = Vec::new();

    for caps in RE_IMG_TAG.captures_iter(content) {
        let relative = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        if relative.is_empty() || !seen.insert(relative) {
            continue;
        }

        let joined = image_dir.join(relative);
        if !joined.exists() {
            match config.missing_images {
                MissingImagePolicy::FailFast => {
                    return Err(NormalizeError::ImageNotFound {
                        relative: relative.to_string(),
                        resolved: joined,
                    });
                }
                MissingImagePolicy::Skip => {
                    warn!(
                        relative,
                        resolved = %joined.display(),
                        "Referenced image not found, skipping"
                    );
                    continue;
                }
            }
        }

        // canonicalize only succeeds on existing paths; keep the joined path
        // as a fallback for exotic filesystems.
        let absolute = std::fs::canonicalize(&joined).unwrap_or(joined);
        let data = encode::encode_image(&absolute)?;
        images.push(ImageData {
            data,
            absolute_path: absolute,
            relative_path: relative.to_string(),
        });
    }

    info!(image_count = images.len(), "Built document");
    Ok(Document::new(content.to_string(), images))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn dir_with_images(names: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("imgs")).unwrap();
        for name in names {
            fs::write(dir.path().join(name), b"fake image bytes").unwrap();
        }
        dir
    }

    #[test]
    fn resolves_single_image() {
        let dir = dir_with_images(&["imgs/a.png"]);
        let doc = build_document(
            r#"text <img src="imgs/a.png"> more"#,
            dir.path(),
            &NormalizeConfig::default(),
        )
        .unwrap();
        assert_eq!(doc.images.len(), 1);
        assert_eq!(doc.images[0].relative_path, "imgs/a.png");
        assert!(!doc.images[0].data.is_empty());
        assert!(doc.images[0].absolute_path.ends_with("imgs/a.png"));
    }

    #[test]
    fn preserves_reference_order() {
        let dir = dir_with_images(&["imgs/b.png", "imgs/a.png"]);
        let content = r#"<img src="imgs/b.png"> then <img src='imgs/a.png'>"#;
        let doc = build_document(content, dir.path(), &NormalizeConfig::default()).unwrap();
        let rels: Vec<&str> = doc.images.iter().map(|i| i.relative_path.as_str()).collect();
        assert_eq!(rels, ["imgs/b.png", "imgs/a.png"]);
    }

    #[test]
    fn deduplicates_repeated_src() {
        let dir = dir_with_images(&["imgs/a.png"]);
        let content = r#"<img src="imgs/a.png"> twice <img src="imgs/a.png">"#;
        let doc = build_document(content, dir.path(), &NormalizeConfig::default()).unwrap();
        assert_eq!(doc.images.len(), 1);
    }

    #[test]
    fn missing_image_fails_fast_by_default() {
        let dir = TempDir::new().unwrap();
        let err = build_document(
            r#"<img src="imgs/missing.png">"#,
            dir.path(),
            &NormalizeConfig::default(),
        )
        .unwrap_err();
        match err {
            NormalizeError::ImageNotFound { relative, .. } => {
                assert_eq!(relative, "imgs/missing.png");
            }
            other => panic!("expected ImageNotFound, got {other}"),
        }
    }

    #[test]
    fn skip_policy_builds_without_missing_image() {
        let dir = dir_with_images(&["imgs/a.png"]);
        let config = NormalizeConfig::builder()
            .missing_images(MissingImagePolicy::Skip)
            .build()
            .unwrap();
        let content = r#"<img src="imgs/a.png"> and <img src="imgs/gone.png">"#;
        let doc = build_document(content, dir.path(), &config).unwrap();
        assert_eq!(doc.images.len(), 1);
        assert_eq!(doc.images[0].relative_path, "imgs/a.png");
    }

    #[test]
    fn no_image_tags_yields_empty_images() {
        let dir = TempDir::new().unwrap();
        let doc = build_document("plain text only", dir.path(), &NormalizeConfig::default())
            .unwrap();
        assert!(doc.images.is_empty());
        assert_eq!(doc.content, "plain text only");
    }

    #[test]
    fn build_is_deterministic() {
        let dir = dir_with_images(&["imgs/a.png", "imgs/b.png"]);
        let content = r#"x <img src="imgs/a.png"> y <img src="imgs/b.png"> z"#;
        let config = NormalizeConfig::default();
        let first = build_document(content, dir.path(), &config).unwrap();
        let second = build_document(content, dir.path(), &config).unwrap();
        assert_eq!(first.doc_id, second.doc_id);
        assert_eq!(first.images, second.images);
    }

    #[test]
    fn tag_attributes_and_quote_styles_accepted() {
        let dir = dir_with_images(&["imgs/a.png"]);
        let content = r#"<IMG width="40" SRC='imgs/a.png' alt="fig">"#;
        let doc = build_document(content, dir.path(), &NormalizeConfig::default()).unwrap();
        assert_eq!(doc.images.len(), 1);
    }
}
