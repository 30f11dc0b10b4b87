//! Command line front end.
//!
//! Collects folders from arguments (or a stdin prompt), runs the organizer or
//! the merge batch, and prints the resulting report as text or JSON.

use crate::config::{Settings, SettingsOverrides};
use crate::error::{OrganizerError, Result};
use crate::merge::{merge_all, LopdfMerger};
use crate::organize::{organize_with_options, OrganizeOptions};
use clap::Parser;
use serde::Serialize;
use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const DEFAULT_ORGANIZE_DIR: &str = ".";

#[derive(Debug, Parser)]
#[command(
    name = "pdf-organizer",
    version,
    about = "Organize prefixed PDFs into folders, or combine all PDFs in each folder into a single PDF."
)]
pub struct Cli {
    /// Folders to operate on. Required with --combine; optional for organizing.
    #[arg(value_name = "DIRECTORIES", value_hint = clap::ValueHint::DirPath)]
    pub directories: Vec<PathBuf>,

    /// Combine PDFs inside each provided folder into a single PDF named after that folder.
    /// Folders without PDFs of their own are expanded into their immediate subfolders.
    #[arg(long)]
    pub combine: bool,

    /// Write combined PDFs without compressing their streams
    #[arg(long, requires = "combine")]
    pub no_compress: bool,

    /// Report what organizing would move without touching any file
    #[arg(long, conflicts_with = "combine")]
    pub dry_run: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// JSON settings file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Document extension to act on
    #[arg(long, value_name = "EXT")]
    pub extension: Option<String>,

    /// Label appended to destination folder names ("<PREFIX> <LABEL>")
    #[arg(long, value_name = "LABEL")]
    pub label: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn settings(&self) -> Result<Settings> {
        Settings::load(
            self.config.as_deref(),
            SettingsOverrides {
                extension: self.extension.clone(),
                folder_label: self.label.clone(),
            },
        )
    }
}

/// Run the selected action. Returns true when everything succeeded.
pub fn execute(cli: &Cli) -> Result<bool> {
    let settings = cli.settings()?;

    if cli.combine {
        if cli.directories.is_empty() {
            return Err(OrganizerError::Usage(
                "Please provide one or more folders to combine with --combine.".to_string(),
            ));
        }

        let merger = if cli.no_compress {
            LopdfMerger::new().without_compression()
        } else {
            LopdfMerger::new()
        };
        let report = merge_all(&cli.directories, &settings, &merger)?;
        emit(&report, cli.json)?;
        return Ok(report.is_success());
    }

    let directory = match cli.directories.split_first() {
        Some((first, rest)) => {
            if !rest.is_empty() {
                tracing::warn!(
                    "Organizing only {}; ignoring {} extra folder(s)",
                    first.display(),
                    rest.len()
                );
            }
            first.clone()
        }
        None => prompt_directory(DEFAULT_ORGANIZE_DIR)?,
    };

    let options = OrganizeOptions {
        dry_run: cli.dry_run,
    };
    let report = organize_with_options(&directory, &settings, options)?;
    emit(&report, cli.json)?;
    Ok(true)
}

fn emit<T: Serialize + Display>(report: &T, json: bool) -> Result<()> {
    if json {
        let rendered = serde_json::to_string_pretty(report).map_err(|e| {
            OrganizerError::io("<stdout>", io::Error::other(e))
        })?;
        println!("{}", rendered);
    } else {
        println!("{}", report);
    }
    Ok(())
}

/// Ask for a folder on stdin; an empty answer picks `default`.
fn prompt_directory(default: &str) -> Result<PathBuf> {
    let mut stdout = io::stdout();
    write!(stdout, "Folder to organize [default: {}]: ", default)
        .and_then(|_| stdout.flush())
        .map_err(|e| OrganizerError::io("<stdout>", e))?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| OrganizerError::io("<stdin>", e))?;

    let answer = line.trim();
    Ok(PathBuf::from(if answer.is_empty() { default } else { answer }))
}
