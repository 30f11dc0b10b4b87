//! Merge Coordinator
//!
//! Merges one target folder into `<folder>/<folder-name>.<ext>`, and drives a
//! batch of targets where each target succeeds or fails on its own.
//!
//! The merged document is written to a hidden temporary file inside the
//! target and only renamed into place, without clobbering, once the backend
//! reports success. A failed merge therefore never leaves a discoverable
//! output behind, and an existing output is never replaced.

use super::pdf::DocumentMerger;
use super::resolver::{merge_candidates, require_output_name, resolve_targets};
use crate::config::Settings;
use crate::error::{OrganizerError, Result};
use crate::models;
use serde::Serialize;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Result of merging one target folder
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeReport {
    pub target: PathBuf,
    pub output: PathBuf,
    pub files_merged: usize,
    pub pages: usize,
}

impl fmt::Display for MergeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self
            .output
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        write!(f, "Combined {} PDFs into {}", self.files_merged, name)
    }
}

/// Per-target outcome inside a batch
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum TargetOutcome {
    Merged(MergeReport),
    Failed { target: PathBuf, message: String },
}

/// Outcome of `merge_all`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub targets: Vec<TargetOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &MergeReport> {
        self.targets.iter().filter_map(|outcome| match outcome {
            TargetOutcome::Merged(report) => Some(report),
            TargetOutcome::Failed { .. } => None,
        })
    }

    pub fn failed(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.targets.iter().filter_map(|outcome| match outcome {
            TargetOutcome::Failed { target, message } => Some((target.as_path(), message.as_str())),
            TargetOutcome::Merged(_) => None,
        })
    }

    pub fn is_success(&self) -> bool {
        self.failed().next().is_none()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.targets {
            match outcome {
                TargetOutcome::Merged(report) => writeln!(f, "{}", report)?,
                TargetOutcome::Failed { message, .. } => writeln!(f, "Error: {}", message)?,
            }
        }
        write!(
            f,
            "{} folder(s) combined, {} failed",
            self.succeeded().count(),
            self.failed().count()
        )
    }
}

/// Merge the candidates of one folder into its output file.
pub fn merge_folder(
    target: &Path,
    settings: &Settings,
    merger: &dyn DocumentMerger,
) -> Result<MergeReport> {
    models::require_directory(target)?;

    let output_file = require_output_name(target, settings)?;
    let output_path = target.join(&output_file);

    let inputs: Vec<PathBuf> = merge_candidates(target, settings)?
        .into_iter()
        .map(|entry| entry.path)
        .collect();
    if inputs.is_empty() {
        return Err(OrganizerError::NoInput {
            path: target.to_path_buf(),
        });
    }

    if output_path.exists() {
        return Err(OrganizerError::OverwriteRefused { path: output_path });
    }

    let staged = tempfile::Builder::new()
        .prefix(&format!(".{}.", output_file))
        .suffix(".partial")
        .tempfile_in(target)
        .map_err(|e| OrganizerError::io(target, e))?;

    tracing::debug!(
        folder = %target.display(),
        inputs = inputs.len(),
        staged = %staged.path().display(),
        "Merging"
    );

    // `staged` is removed on drop if anything below fails
    let stats = merger.merge(&inputs, staged.path())?;

    staged.persist_noclobber(&output_path).map_err(|e| {
        if e.error.kind() == io::ErrorKind::AlreadyExists {
            OrganizerError::OverwriteRefused {
                path: output_path.clone(),
            }
        } else {
            OrganizerError::io(&output_path, e.error)
        }
    })?;

    tracing::info!(
        files = stats.documents,
        pages = stats.pages,
        "Combined {} PDFs into {}",
        stats.documents,
        output_path.display()
    );

    Ok(MergeReport {
        target: target.to_path_buf(),
        output: output_path,
        files_merged: stats.documents,
        pages: stats.pages,
    })
}

/// Resolve `folders` into targets, then merge each target independently.
///
/// Resolution errors abort before any merge happens; per-target merge errors
/// are recorded in the report and do not stop the remaining targets.
pub fn merge_all<P: AsRef<Path>>(
    folders: &[P],
    settings: &Settings,
    merger: &dyn DocumentMerger,
) -> Result<BatchReport> {
    let targets = resolve_targets(folders, settings)?;

    let mut report = BatchReport::default();
    for target in targets {
        match merge_folder(&target, settings, merger) {
            Ok(merged) => report.targets.push(TargetOutcome::Merged(merged)),
            Err(e) => {
                tracing::warn!("Failed to combine {}: {}", target.display(), e);
                report.targets.push(TargetOutcome::Failed {
                    target,
                    message: e.to_string(),
                });
            }
        }
    }

    Ok(report)
}
