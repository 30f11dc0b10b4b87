//! Runtime settings: built-in defaults, an optional JSON file, then CLI flags.

use crate::error::{OrganizerError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const DEFAULT_EXTENSION: &str = "pdf";
const DEFAULT_FOLDER_LABEL: &str = "PDFs";
const DEFAULT_MERGE_MARKERS: &[&str] = &["combined", "merged"];

/// Settings consumed by the organizer and the merge pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Document extension, lowercase, without the leading dot
    pub extension: String,

    /// Suffix of destination folders: `"<PREFIX> <label>"`
    pub folder_label: String,

    /// Stem substrings that mark a file as an earlier merge result
    pub merge_markers: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            folder_label: DEFAULT_FOLDER_LABEL.to_string(),
            merge_markers: DEFAULT_MERGE_MARKERS
                .iter()
                .map(|m| (*m).to_string())
                .collect(),
        }
    }
}

/// On-disk shape of the settings file; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct PartialSettings {
    extension: Option<String>,
    folder_label: Option<String>,
    merge_markers: Option<Vec<String>>,
}

/// Values supplied on the command line; they win over the file
#[derive(Debug, Default, Clone)]
pub struct SettingsOverrides {
    pub extension: Option<String>,
    pub folder_label: Option<String>,
}

impl Settings {
    /// Build settings from an optional JSON file plus CLI overrides.
    pub fn load(config_path: Option<&Path>, overrides: SettingsOverrides) -> Result<Self> {
        let file = match config_path {
            Some(path) => load_config_file(path)?,
            None => PartialSettings::default(),
        };

        let defaults = Settings::default();

        let extension = overrides
            .extension
            .or(file.extension)
            .unwrap_or(defaults.extension);

        let folder_label = overrides
            .folder_label
            .or(file.folder_label)
            .unwrap_or(defaults.folder_label);

        let merge_markers = file.merge_markers.unwrap_or(defaults.merge_markers);

        let settings = Settings {
            extension: normalize_extension(&extension),
            folder_label: folder_label.trim().to_string(),
            merge_markers: merge_markers
                .into_iter()
                .map(|m| m.trim().to_lowercase())
                .collect(),
        };

        settings
            .validate()
            .map_err(|reason| OrganizerError::Config {
                path: config_path
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| "<command line>".into()),
                reason,
            })?;

        Ok(settings)
    }

    /// Reject values that would produce unusable folder or file names
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.extension.is_empty() {
            return Err("extension must not be empty".to_string());
        }
        if self.extension.contains(['/', '\\', '.']) {
            return Err(format!("invalid extension: {:?}", self.extension));
        }
        if self.folder_label.is_empty() {
            return Err("folder label must not be empty".to_string());
        }
        if self.folder_label.contains(['/', '\\']) {
            return Err(format!(
                "folder label must not contain a path separator: {:?}",
                self.folder_label
            ));
        }
        if self.merge_markers.iter().any(|m| m.is_empty()) {
            return Err("merge markers must not be empty strings".to_string());
        }
        Ok(())
    }

    /// True when `ext` (as returned by `Path::extension`) is the document type
    pub fn matches_extension(&self, ext: &str) -> bool {
        ext.eq_ignore_ascii_case(&self.extension)
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}

fn load_config_file(path: &Path) -> Result<PartialSettings> {
    let contents = fs::read_to_string(path).map_err(|e| OrganizerError::io(path, e))?;
    serde_json::from_str(&contents).map_err(|e| OrganizerError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
