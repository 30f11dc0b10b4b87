//! Organizer
//!
//! Moves prefixed documents out of a directory into sibling folders named
//! `"<PREFIX> <label>"`. Only the directory's immediate files are considered.
//! Existing destinations are never overwritten; a file whose destination is
//! already taken is reported as already organized, so re-running is a no-op.

pub mod checksum;
pub mod mover;

use crate::config::Settings;
use crate::error::{OrganizerError, Result};
use crate::models::{self, Entry};
use crate::naming::{group_key, natural_sort};
use mover::MoveMethod;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Options for an organize run
#[derive(Debug, Clone, Copy, Default)]
pub struct OrganizeOptions {
    /// Plan only: no folders are created and no files are moved
    pub dry_run: bool,
}

/// A file that was moved (or would be, in a dry run)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovedFile {
    pub name: String,
    pub group: String,
    pub destination: PathBuf,
    /// `None` in a dry run
    pub method: Option<MoveMethod>,
}

/// Why a document was left in place
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkipReason {
    /// Name has no `letters+digits-` prefix
    NoPrefixMatch,
    /// A file of the same name is already in the destination folder
    AlreadyOrganized { destination: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedFile {
    pub name: String,
    pub reason: SkipReason,
}

/// Outcome of one organize run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizeReport {
    pub directory: PathBuf,
    pub moved: Vec<MovedFile>,
    pub skipped: Vec<SkippedFile>,
    pub folders_created: Vec<PathBuf>,
    pub dry_run: bool,
}

impl OrganizeReport {
    fn new(directory: &Path, dry_run: bool) -> Self {
        Self {
            directory: directory.to_path_buf(),
            moved: Vec::new(),
            skipped: Vec::new(),
            folders_created: Vec::new(),
            dry_run,
        }
    }
}

impl fmt::Display for OrganizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.dry_run { "Would move" } else { "Moving" };

        for skipped in &self.skipped {
            match &skipped.reason {
                SkipReason::NoPrefixMatch => {
                    writeln!(f, "Skipping (no prefix match): {}", skipped.name)?
                }
                SkipReason::AlreadyOrganized { destination } => {
                    writeln!(f, "Already exists, skipping: {}", destination.display())?
                }
            }
        }

        for moved in &self.moved {
            let folder = moved
                .destination
                .parent()
                .and_then(Path::file_name)
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            writeln!(f, "{} {} -> {}/", verb, moved.name, folder)?;
        }

        write!(
            f,
            "{} file(s) {}, {} skipped in {}",
            self.moved.len(),
            if self.dry_run { "to move" } else { "moved" },
            self.skipped.len(),
            self.directory.display()
        )
    }
}

/// Destination folder name for a group key
pub fn group_folder_name(key: &str, settings: &Settings) -> String {
    format!("{} {}", key, settings.folder_label)
}

/// Organize `directory` with default options.
pub fn organize(directory: &Path, settings: &Settings) -> Result<OrganizeReport> {
    organize_with_options(directory, settings, OrganizeOptions::default())
}

/// Organize `directory`, moving each prefixed document into its group folder.
pub fn organize_with_options(
    directory: &Path,
    settings: &Settings,
    options: OrganizeOptions,
) -> Result<OrganizeReport> {
    let mut entries = models::scan_directory(directory)?;
    natural_sort(&mut entries, |e| e.name.as_str());

    let mut report = OrganizeReport::new(directory, options.dry_run);

    for entry in entries.iter().filter(|e| is_document(e, settings)) {
        let Some(key) = group_key(&entry.name) else {
            tracing::info!("Skipping (no prefix match): {}", entry.name);
            report.skipped.push(SkippedFile {
                name: entry.name.clone(),
                reason: SkipReason::NoPrefixMatch,
            });
            continue;
        };

        let target_dir = directory.join(group_folder_name(key, settings));
        let destination = target_dir.join(&entry.file_name);

        if !options.dry_run && ensure_folder(&target_dir)? {
            report.folders_created.push(target_dir.clone());
        }

        if destination.exists() {
            tracing::info!("Already exists, skipping: {}", destination.display());
            report.skipped.push(SkippedFile {
                name: entry.name.clone(),
                reason: SkipReason::AlreadyOrganized { destination },
            });
            continue;
        }

        let method = if options.dry_run {
            tracing::debug!(file = %entry.name, group = key, "Planned move");
            None
        } else {
            let method = mover::move_file(&entry.path, &destination)?;
            tracing::info!(
                file = %entry.name,
                folder = %target_dir.display(),
                ?method,
                "Moved file"
            );
            Some(method)
        };

        report.moved.push(MovedFile {
            name: entry.name.clone(),
            group: key.to_string(),
            destination,
            method,
        });
    }

    tracing::info!(
        moved = report.moved.len(),
        skipped = report.skipped.len(),
        dry_run = options.dry_run,
        "Organize finished for {}",
        directory.display()
    );

    Ok(report)
}

fn is_document(entry: &Entry, settings: &Settings) -> bool {
    entry.is_file
        && entry
            .extension
            .as_deref()
            .is_some_and(|ext| settings.matches_extension(ext))
}

/// Create `path` if needed. Returns true when it was created by this call.
fn ensure_folder(path: &Path) -> Result<bool> {
    match fs::create_dir(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            if path.is_dir() {
                Ok(false)
            } else {
                Err(OrganizerError::io(
                    path,
                    io::Error::new(
                        io::ErrorKind::AlreadyExists,
                        "a non-directory occupies the destination folder name",
                    ),
                ))
            }
        }
        Err(e) => Err(OrganizerError::io(path, e)),
    }
}
