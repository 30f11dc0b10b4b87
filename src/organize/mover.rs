//! Non-destructive file relocation.
//!
//! A same-volume `rename` is tried first. When that fails (typically across
//! volumes) the file is copied beside the destination under a hidden staging
//! name, verified by checksum, renamed into place without clobbering, and
//! only then is the source removed. Any failure before that last step leaves
//! the source untouched and removes the staged copy.

use super::checksum;
use crate::error::{OrganizerError, Result};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;

/// How a file reached its destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveMethod {
    Renamed,
    CopiedAndRemoved,
}

/// Move `source` to `destination`, refusing to replace an existing file.
pub fn move_file(source: &Path, destination: &Path) -> Result<MoveMethod> {
    if !source.is_file() {
        return Err(OrganizerError::io(
            source,
            io::Error::new(io::ErrorKind::NotFound, "source file not found"),
        ));
    }

    if destination.exists() {
        return Err(OrganizerError::io(
            destination,
            io::Error::new(io::ErrorKind::AlreadyExists, "destination already exists"),
        ));
    }

    match fs::rename(source, destination) {
        Ok(()) => Ok(MoveMethod::Renamed),
        Err(e) => {
            tracing::debug!(
                source = %source.display(),
                error = %e,
                "Rename failed, falling back to copy"
            );
            copy_then_remove(source, destination)?;
            Ok(MoveMethod::CopiedAndRemoved)
        }
    }
}

/// Copy, verify, persist, then delete the source.
pub(crate) fn copy_then_remove(source: &Path, destination: &Path) -> Result<()> {
    let parent = destination.parent().ok_or_else(|| {
        OrganizerError::io(
            destination,
            io::Error::new(io::ErrorKind::InvalidInput, "destination has no parent"),
        )
    })?;

    let staged = tempfile::Builder::new()
        .prefix(".")
        .suffix(".partial")
        .tempfile_in(parent)
        .map_err(|e| OrganizerError::io(parent, e))?;

    fs::copy(source, staged.path()).map_err(|e| OrganizerError::io(source, e))?;

    let verified =
        checksum::same_content(source, staged.path()).map_err(|e| OrganizerError::io(source, e))?;
    if !verified {
        return Err(OrganizerError::io(
            destination,
            io::Error::new(io::ErrorKind::InvalidData, "copy does not match source"),
        ));
    }

    staged
        .persist_noclobber(destination)
        .map_err(|e| OrganizerError::io(destination, e.error))?;

    fs::remove_file(source).map_err(|e| OrganizerError::io(source, e))?;

    Ok(())
}
