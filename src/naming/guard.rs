//! Merge-candidate guard.
//!
//! Keeps a folder's own output and anything that looks like an earlier merge
//! result out of the next merge. The marker check is a substring heuristic:
//! a genuine source file named e.g. `merged-lecture.pdf` is excluded too.
//! That false exclusion is accepted in exchange for never re-merging output.

use crate::config::Settings;
use crate::models::Entry;
use std::path::Path;

/// Name of the combined file for `folder`: `<folder-name>.<ext>`.
///
/// Returns `None` when the path has no final component (e.g. `/`). Callers
/// canonicalize first so `.` resolves to a real name.
pub fn output_name(folder: &Path, settings: &Settings) -> Option<String> {
    folder
        .file_name()
        .map(|name| format!("{}.{}", name.to_string_lossy(), settings.extension))
}

/// Decide whether `entry` may be merged into `output_name`.
pub fn is_candidate(entry: &Entry, output_name: &str, settings: &Settings) -> bool {
    if !entry.is_file {
        return false;
    }

    let is_document = entry
        .extension
        .as_deref()
        .is_some_and(|ext| settings.matches_extension(ext));
    if !is_document {
        return false;
    }

    let stem = entry.stem().to_lowercase();
    let output_stem = Path::new(output_name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if stem == output_stem {
        return false;
    }

    !settings
        .merge_markers
        .iter()
        .any(|marker| stem.contains(&marker.to_lowercase()))
}
