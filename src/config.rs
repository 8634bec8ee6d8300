//! Configuration for the normalization pipeline.
//!
//! All behaviour is controlled through [`NormalizeConfig`], built via its
//! [`NormalizeConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share a config across documents and to diff two runs when
//! their outputs differ.

use crate::error::NormalizeError;
use serde::{Deserialize, Serialize};

/// Default reference-section headings, matched case-insensitively at
/// heading level 2 only.
pub const DEFAULT_REFERENCE_HEADINGS: [&str; 3] = ["References", "Reference", "参考文献"];

/// What to do when an `<img>` tag references a file that does not exist.
///
/// A missing image normally indicates an incomplete OCR archival run, which
/// is an upstream defect worth surfacing immediately — hence the default.
/// `Skip` keeps the permissive behaviour some callers want for dirty corpora:
/// the image is dropped with a warning and the build continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MissingImagePolicy {
    /// Abort the build on the first unresolvable image (default).
    #[default]
    FailFast,
    /// Log a warning and continue without the image.
    Skip,
}

/// Configuration for a normalization run.
///
/// # Example
/// ```rust
/// use mdsection::NormalizeConfig;
///
/// let config = NormalizeConfig::builder()
///     .reference_heading("Bibliography")
///     .persist(false)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizeConfig {
    /// Headings that mark the start of a reference section. Compared
    /// case-insensitively after trimming, at heading level 2 only.
    pub reference_headings: Vec<String>,

    /// Policy for image references that do not resolve on disk.
    pub missing_images: MissingImagePolicy,

    /// Write the cleaned content back to `doc.md` when the cleaner truncated
    /// it. Default: true. Has no effect on the pure string entry point.
    pub persist: bool,

    /// Extra attempts after a transient persist failure. Default: 2.
    ///
    /// Only transient I/O errors are retried; a permission error or a full
    /// disk surfaces immediately.
    pub persist_retries: u32,

    /// Delay between persist attempts in milliseconds. Default: 100.
    pub persist_backoff_ms: u64,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            reference_headings: DEFAULT_REFERENCE_HEADINGS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            missing_images: MissingImagePolicy::default(),
            persist: true,
            persist_retries: 2,
            persist_backoff_ms: 100,
        }
    }
}

impl NormalizeConfig {
    /// Create a new builder for `NormalizeConfig`.
    pub fn builder() -> NormalizeConfigBuilder {
        NormalizeConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`NormalizeConfig`].
#[derive(Debug)]
pub struct NormalizeConfigBuilder {
    config: NormalizeConfig,
}

impl NormalizeConfigBuilder {
    /// Replace the recognized reference-heading set.
    pub fn reference_headings<I, S>(mut self, headings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.reference_headings = headings.into_iter().map(Into::into).collect();
        self
    }

    /// Add one heading to the recognized reference-heading set.
    pub fn reference_heading(mut self, heading: impl Into<String>) -> Self {
        self.config.reference_headings.push(heading.into());
        self
    }

    pub fn missing_images(mut self, policy: MissingImagePolicy) -> Self {
        self.config.missing_images = policy;
        self
    }

    pub fn persist(mut self, v: bool) -> Self {
        self.config.persist = v;
        self
    }

    pub fn persist_retries(mut self, n: u32) -> Self {
        self.config.persist_retries = n;
        self
    }

    pub fn persist_backoff_ms(mut self, ms: u64) -> Self {
        self.config.persist_backoff_ms = ms;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<NormalizeConfig, NormalizeError> {
        let c = &self.config;
        if c.reference_headings.is_empty() {
            return Err(NormalizeError::InvalidConfig(
                "At least one reference heading is required".into(),
            ));
        }
        if c.reference_headings.iter().any(|h| h.trim().is_empty()) {
            return Err(NormalizeError::InvalidConfig(
                "Reference headings must be non-empty after trimming".into(),
            ));
        }
        Ok(self.config)
    }
}
