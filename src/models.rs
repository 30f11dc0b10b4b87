use crate::error::{OrganizerError, Result};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// One item observed while scanning a directory.
///
/// Built fresh for every scan; nothing is cached between operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: PathBuf,
    /// File name exactly as stored on disk
    pub file_name: OsString,
    /// Lossy UTF-8 rendering of `file_name`, for matching, sorting and display
    pub name: String,
    pub is_file: bool,
    pub is_directory: bool,
    /// Extension as written on disk, without the dot
    pub extension: Option<String>,
}

impl Entry {
    /// Describe `path`, following symlinks the way `Path::is_file` does.
    /// Broken links come back as neither file nor directory.
    pub fn from_path(path: &Path) -> Self {
        let (is_file, is_directory) = match fs::metadata(path) {
            Ok(metadata) => (metadata.is_file(), metadata.is_dir()),
            Err(_) => (false, false),
        };

        let file_name = path.file_name().map(OsString::from).unwrap_or_default();

        Self {
            path: path.to_path_buf(),
            name: file_name.to_string_lossy().to_string(),
            file_name,
            is_file,
            is_directory,
            extension: path.extension().map(|e| e.to_string_lossy().to_string()),
        }
    }

    /// File name without its final extension
    pub fn stem(&self) -> &str {
        match &self.extension {
            Some(ext) => self
                .name
                .strip_suffix(ext.as_str())
                .and_then(|rest| rest.strip_suffix('.'))
                .unwrap_or(&self.name),
            None => &self.name,
        }
    }

    #[cfg(test)]
    pub(crate) fn synthetic(path: PathBuf, is_file: bool) -> Self {
        let mut entry = Self::from_path(&path);
        entry.is_file = is_file;
        entry.is_directory = !is_file;
        entry
    }
}

/// Ensure `path` exists and is a directory
pub fn require_directory(path: &Path) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(OrganizerError::not_found(path))
    }
}

/// List the immediate children of `dir` (non-recursive, unordered).
pub fn scan_directory(dir: &Path) -> Result<Vec<Entry>> {
    require_directory(dir)?;

    let read_dir = fs::read_dir(dir).map_err(|e| OrganizerError::io(dir, e))?;

    let mut entries = Vec::new();
    for entry in read_dir {
        match entry {
            Ok(entry) => entries.push(Entry::from_path(&entry.path())),
            Err(e) => {
                // Entries that vanish mid-scan are not worth failing the whole scan
                tracing::warn!("Error reading entry in {}: {}", dir.display(), e);
            }
        }
    }

    Ok(entries)
}
