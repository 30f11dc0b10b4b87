//! Merge target resolution.
//!
//! A folder with merge candidates directly inside it is merged as a whole and
//! never expanded. Only when it has none are its immediate subfolders
//! examined, each against its own output name. Resolution is fail-fast: the
//! first folder that is missing or has nothing to merge aborts the batch.

use crate::config::Settings;
use crate::error::{OrganizerError, Result};
use crate::models::{self, Entry};
use crate::naming::{is_candidate, natural_sort, output_name};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Merge candidates directly inside `folder`, in natural order.
///
/// `folder` should already be canonical so its name is meaningful.
pub fn merge_candidates(folder: &Path, settings: &Settings) -> Result<Vec<Entry>> {
    let output = require_output_name(folder, settings)?;
    let mut candidates: Vec<Entry> = models::scan_directory(folder)?
        .into_iter()
        .filter(|entry| is_candidate(entry, &output, settings))
        .collect();
    natural_sort(&mut candidates, |e| e.name.as_str());
    Ok(candidates)
}

/// Output file name for `folder`, or an error for nameless paths like `/`
pub(crate) fn require_output_name(folder: &Path, settings: &Settings) -> Result<String> {
    output_name(folder, settings).ok_or_else(|| OrganizerError::NoInput {
        path: folder.to_path_buf(),
    })
}

fn has_candidates(folder: &Path, settings: &Settings) -> Result<bool> {
    Ok(!merge_candidates(folder, settings)?.is_empty())
}

fn canonical_directory(folder: &Path) -> Result<PathBuf> {
    models::require_directory(folder)?;
    fs::canonicalize(folder).map_err(|e| OrganizerError::io(folder, e))
}

/// Targets for a single input folder: itself, or its eligible subfolders.
fn resolve_one(folder: &Path, settings: &Settings) -> Result<Vec<PathBuf>> {
    let folder = canonical_directory(folder)?;

    if has_candidates(&folder, settings)? {
        tracing::debug!(folder = %folder.display(), "Folder has direct candidates");
        return Ok(vec![folder]);
    }

    let mut subfolders: Vec<Entry> = models::scan_directory(&folder)?
        .into_iter()
        .filter(|entry| entry.is_directory)
        .collect();
    natural_sort(&mut subfolders, |e| e.name.as_str());

    let mut targets = Vec::new();
    for sub in subfolders {
        let sub_path = fs::canonicalize(&sub.path).map_err(|e| OrganizerError::io(&sub.path, e))?;
        if has_candidates(&sub_path, settings)? {
            targets.push(sub_path);
        } else {
            tracing::warn!("Skipping subfolder without PDFs: {}", sub_path.display());
        }
    }

    if targets.is_empty() {
        return Err(OrganizerError::NoMergeableContent { path: folder });
    }

    tracing::debug!(
        folder = %folder.display(),
        subfolders = targets.len(),
        "Expanded folder into subfolders"
    );
    Ok(targets)
}

/// Expand user-supplied folders into a duplicate-free list of merge targets.
pub fn resolve_targets<P: AsRef<Path>>(folders: &[P], settings: &Settings) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut targets = Vec::new();

    for folder in folders {
        for target in resolve_one(folder.as_ref(), settings)? {
            if seen.insert(target.clone()) {
                targets.push(target);
            }
        }
    }

    tracing::info!(inputs = folders.len(), targets = targets.len(), "Resolved merge targets");
    Ok(targets)
}
