//! Backing-store access for the per-PDF OCR output directory.
//!
//! The archival layer guarantees exactly one `doc.md` per directory by the
//! time this pipeline runs. Loading maps filesystem problems onto the error
//! taxonomy; persisting uses write-to-temp-then-rename so a failed write can
//! never leave `doc.md` half-written — the previously stored content stays
//! intact until the rename commits.

use crate::error::NormalizeError;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// File name of the normalized Markdown inside an OCR output directory.
pub const DOC_FILE_NAME: &str = "doc.md";

/// Path of `doc.md` inside `dir`.
pub fn doc_path(dir: &Path) -> PathBuf {
    dir.join(DOC_FILE_NAME)
}

/// Load the Markdown document from an OCR output directory.
pub fn load_markdown(dir: &Path) -> Result<String, NormalizeError> {
    let path = doc_path(dir);
    if !path.exists() {
        return Err(NormalizeError::DocNotFound { path });
    }
    std::fs::read_to_string(&path).map_err(|e| NormalizeError::MalformedInput {
        path,
        detail: e.to_string(),
    })
}

/// Persist `content` as `doc.md` in `dir`, atomically, with bounded retry.
///
/// Transient I/O errors are retried up to `retries` extra times with a
/// `backoff_ms` pause between attempts; anything else (permissions, missing
/// directory, full disk) surfaces immediately. Either way the error is a
/// [`NormalizeError::PersistFailed`] carrying the path and attempt count.
pub fn persist_markdown(
    dir: &Path,
    content: &str,
    retries: u32,
    backoff_ms: u64,
) -> Result<(), NormalizeError> {
    let path = doc_path(dir);
    let mut attempts = 0u32;
    loop {
        attempts += 1;
        match write_atomic(dir, &path, content) {
            Ok(()) => {
                debug!(path = %path.display(), attempts, "Persisted cleaned content");
                return Ok(());
            }
            Err(e) if is_transient(&e) && attempts <= retries => {
                warn!(
                    path = %path.display(),
                    attempt = attempts,
                    error = %e,
                    "Transient persist failure, retrying"
                );
                std::thread::sleep(Duration::from_millis(backoff_ms));
            }
            Err(e) => {
                return Err(NormalizeError::PersistFailed {
                    path,
                    attempts,
                    source: e,
                });
            }
        }
    }
}

/// Write to a temp file in the same directory, then rename over the target.
///
/// Same-directory placement keeps the rename on one filesystem, which is what
/// makes it atomic.
fn write_atomic(dir: &Path, path: &Path, content: &str) -> std::io::Result<()> {
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn is_transient(e: &std::io::Error) -> bool {
    use std::io::ErrorKind;
    matches!(
        e.kind(),
        ErrorKind::Interrupted | ErrorKind::TimedOut | ErrorKind::WouldBlock
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_reads_doc_md() {
        let dir = TempDir::new().unwrap();
        fs::write(doc_path(dir.path()), "hello\n").unwrap();
        assert_eq!(load_markdown(dir.path()).unwrap(), "hello\n");
    }

    #[test]
    fn load_missing_doc_is_doc_not_found() {
        let dir = TempDir::new().unwrap();
        let err = load_markdown(dir.path()).unwrap_err();
        assert!(matches!(err, NormalizeError::DocNotFound { .. }));
    }

    #[test]
    fn load_non_utf8_is_malformed_input() {
        let dir = TempDir::new().unwrap();
        fs::write(doc_path(dir.path()), [0xff, 0xfe, 0x00]).unwrap();
        let err = load_markdown(dir.path()).unwrap_err();
        assert!(matches!(err, NormalizeError::MalformedInput { .. }));
    }

    #[test]
    fn persist_overwrites_existing_content() {
        let dir = TempDir::new().unwrap();
        fs::write(doc_path(dir.path()), "old").unwrap();
        persist_markdown(dir.path(), "new content\n", 0, 0).unwrap();
        assert_eq!(fs::read_to_string(doc_path(dir.path())).unwrap(), "new content\n");
    }

    #[test]
    fn persist_creates_doc_when_absent() {
        let dir = TempDir::new().unwrap();
        persist_markdown(dir.path(), "fresh\n", 0, 0).unwrap();
        assert_eq!(fs::read_to_string(doc_path(dir.path())).unwrap(), "fresh\n");
    }

    #[test]
    fn persist_into_missing_dir_fails_without_retry() {
        let dir = TempDir::new().unwrap();
        let gone = dir.path().join("nope");
        let err = persist_markdown(&gone, "x", 5, 1).unwrap_err();
        match err {
            NormalizeError::PersistFailed { attempts, .. } => {
                // NotFound is not transient, so exactly one attempt was made.
                assert_eq!(attempts, 1);
            }
            other => panic!("expected PersistFailed, got {other}"),
        }
    }

    #[test]
    fn persist_leaves_no_temp_files_behind() {
        let dir = TempDir::new().unwrap();
        persist_markdown(dir.path(), "content", 0, 0).unwrap();
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1, "only doc.md should remain");
    }

    #[test]
    fn transient_classification() {
        use std::io::{Error, ErrorKind};
        assert!(is_transient(&Error::new(ErrorKind::Interrupted, "i")));
        assert!(is_transient(&Error::new(ErrorKind::TimedOut, "t")));
        assert!(!is_transient(&Error::new(ErrorKind::PermissionDenied, "p")));
        assert!(!is_transient(&Error::new(ErrorKind::NotFound, "n")));
    }
}
