//! Error types shared by the organizer and the merge pipeline.
//!
//! Skips (no prefix, already organized) are not errors; they travel in the
//! reports. Everything here is fatal for the operation or target it names.

use std::io;
use std::path::{Path, PathBuf};

/// Failure reported by a [`DocumentMerger`](crate::merge::pdf::DocumentMerger).
#[derive(Debug, thiserror::Error)]
pub enum MergeFailure {
    /// An input could not be opened or parsed as a document
    #[error("Failed to read {}: {reason}", path.display())]
    UnreadableInput { path: PathBuf, reason: String },

    /// The combined document could not be written
    #[error("Failed to write {}: {reason}", path.display())]
    WriteOutput { path: PathBuf, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum OrganizerError {
    #[error("Directory not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Output already exists, refusing to overwrite: {}", path.display())]
    OverwriteRefused { path: PathBuf },

    #[error("No PDFs found in {}", path.display())]
    NoInput { path: PathBuf },

    #[error("No PDFs found in {} or its immediate subfolders.", path.display())]
    NoMergeableContent { path: PathBuf },

    #[error("Merge failed: {0}")]
    Merge(#[from] MergeFailure),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid configuration {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    /// The front end was invoked without what the operation needs
    #[error("{0}")]
    Usage(String),
}

impl OrganizerError {
    /// Wrap an I/O error with the path that caused it
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        OrganizerError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn not_found(path: impl AsRef<Path>) -> Self {
        OrganizerError::NotFound {
            path: path.as_ref().to_path_buf(),
        }
    }
}

pub type Result<T> = std::result::Result<T, OrganizerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_path() {
        let err = OrganizerError::not_found("/tmp/missing");
        assert_eq!(err.to_string(), "Directory not found: /tmp/missing");

        let err = OrganizerError::OverwriteRefused {
            path: PathBuf::from("/tmp/x/x.pdf"),
        };
        assert!(err.to_string().contains("/tmp/x/x.pdf"));
    }

    #[test]
    fn test_merge_failure_converts() {
        let failure = MergeFailure::UnreadableInput {
            path: PathBuf::from("bad.pdf"),
            reason: "not a PDF".to_string(),
        };
        let err: OrganizerError = failure.into();
        assert!(matches!(
            err,
            OrganizerError::Merge(MergeFailure::UnreadableInput { .. })
        ));
        assert_eq!(err.to_string(), "Merge failed: Failed to read bad.pdf: not a PDF");
    }
}
