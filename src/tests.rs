//! End-to-end scenarios across organizing and merging.

use crate::config::Settings;
use crate::error::OrganizerError;
use crate::merge::pdf::test_support::{write_pdf, ConcatMerger};
use crate::merge::{merge_all, merge_folder, LopdfMerger};
use crate::organize::{organize, SkipReason};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Relative path -> content for every file under `root`
fn snapshot(root: &Path) -> BTreeMap<String, Vec<u8>> {
    fn walk(root: &Path, dir: &Path, out: &mut BTreeMap<String, Vec<u8>>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let rel = path.strip_prefix(root).unwrap().to_string_lossy().to_string();
                out.insert(rel, fs::read(&path).unwrap());
            }
        }
    }
    let mut out = BTreeMap::new();
    walk(root, root, &mut out);
    out
}

fn seed_course(dir: &Path) {
    fs::write(dir.join("CS101-001.pdf"), b"<cs1>").unwrap();
    fs::write(dir.join("CS101-002.pdf"), b"<cs2>").unwrap();
    fs::write(dir.join("MATH200-a.pdf"), b"<math>").unwrap();
    fs::write(dir.join("notes.pdf"), b"<notes>").unwrap();
}

#[test]
fn test_organize_course_folder() {
    let dir = tempdir().unwrap();
    seed_course(dir.path());

    let report = organize(dir.path(), &Settings::default()).unwrap();

    let files: Vec<String> = snapshot(dir.path()).into_keys().collect();
    assert_eq!(
        files,
        vec![
            "CS101 PDFs/CS101-001.pdf",
            "CS101 PDFs/CS101-002.pdf",
            "MATH200 PDFs/MATH200-a.pdf",
            "notes.pdf",
        ]
    );
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].name, "notes.pdf");
    assert_eq!(report.skipped[0].reason, SkipReason::NoPrefixMatch);
}

#[test]
fn test_organize_is_idempotent() {
    let dir = tempdir().unwrap();
    seed_course(dir.path());
    // A copy left behind after an earlier run
    fs::create_dir(dir.path().join("CS101 PDFs")).unwrap();
    fs::write(dir.path().join("CS101 PDFs/CS101-001.pdf"), b"<cs1>").unwrap();

    organize(dir.path(), &Settings::default()).unwrap();
    let after_first = snapshot(dir.path());

    let second = organize(dir.path(), &Settings::default()).unwrap();

    assert_eq!(snapshot(dir.path()), after_first);
    assert!(second.moved.is_empty());
    assert!(second.folders_created.is_empty());
    // Only the duplicate still in the root and the unprefixed file are reported
    let already: Vec<_> = second
        .skipped
        .iter()
        .filter(|s| matches!(s.reason, SkipReason::AlreadyOrganized { .. }))
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(already, vec!["CS101-001.pdf"]);
}

#[test]
fn test_organize_then_combine_then_refuse() {
    let dir = tempdir().unwrap();
    seed_course(dir.path());
    organize(dir.path(), &Settings::default()).unwrap();

    let target = dir.path().join("CS101 PDFs");
    let report = merge_folder(&target, &Settings::default(), &ConcatMerger).unwrap();

    assert_eq!(report.files_merged, 2);
    let output = target.join("CS101 PDFs.pdf");
    assert_eq!(report.output, output);
    assert_eq!(fs::read(&output).unwrap(), b"<cs1><cs2>");

    let err = merge_folder(&target, &Settings::default(), &ConcatMerger).unwrap_err();
    assert!(matches!(err, OrganizerError::OverwriteRefused { .. }));
    assert_eq!(fs::read(&output).unwrap(), b"<cs1><cs2>");
}

#[test]
fn test_combine_parent_of_organized_folders() {
    let dir = tempdir().unwrap();
    let course = dir.path().join("Term");
    fs::create_dir(&course).unwrap();
    seed_course(&course);
    fs::remove_file(course.join("notes.pdf")).unwrap();
    organize(&course, &Settings::default()).unwrap();

    let batch = merge_all(&[&course], &Settings::default(), &ConcatMerger).unwrap();

    assert!(batch.is_success());
    assert_eq!(batch.succeeded().count(), 2);
    assert_eq!(
        fs::read(course.join("CS101 PDFs/CS101 PDFs.pdf")).unwrap(),
        b"<cs1><cs2>"
    );
    assert_eq!(
        fs::read(course.join("MATH200 PDFs/MATH200 PDFs.pdf")).unwrap(),
        b"<math>"
    );

    // Sources are still there, so the rerun resolves the same targets and
    // every one of them refuses to overwrite its existing output
    let rerun = merge_all(&[&course], &Settings::default(), &ConcatMerger).unwrap();
    assert_eq!(rerun.succeeded().count(), 0);
    assert_eq!(rerun.failed().count(), 2);
    assert!(rerun
        .failed()
        .all(|(_, message)| message.contains("refusing to overwrite")));
    assert_eq!(
        fs::read(course.join("CS101 PDFs/CS101 PDFs.pdf")).unwrap(),
        b"<cs1><cs2>"
    );
}

#[test]
fn test_folder_holding_only_outputs_is_not_remerged() {
    let dir = tempdir().unwrap();
    let course = dir.path().join("Term");
    let done = course.join("Week1");
    fs::create_dir_all(&done).unwrap();
    fs::write(done.join("Week1.pdf"), b"old output").unwrap();
    fs::write(done.join("week1-combined.pdf"), b"older output").unwrap();

    let err = merge_all(&[&course], &Settings::default(), &ConcatMerger).unwrap_err();

    assert!(matches!(err, OrganizerError::NoMergeableContent { .. }));
    assert_eq!(fs::read(done.join("Week1.pdf")).unwrap(), b"old output");
}

#[test]
fn test_real_pdfs_end_to_end() {
    let dir = tempdir().unwrap();
    write_pdf(&dir.path().join("BIO7-2.pdf"), 2);
    write_pdf(&dir.path().join("BIO7-10.pdf"), 1);
    write_pdf(&dir.path().join("BIO7-1.pdf"), 3);

    organize(dir.path(), &Settings::default()).unwrap();
    let target = dir.path().join("BIO7 PDFs");
    let report = merge_folder(&target, &Settings::default(), &LopdfMerger::new()).unwrap();

    assert_eq!(report.files_merged, 3);
    assert_eq!(report.pages, 6);
    let merged = lopdf::Document::load(target.join("BIO7 PDFs.pdf")).unwrap();
    assert_eq!(merged.get_pages().len(), 6);
}

#[test]
fn test_corrupt_pdf_fails_cleanly() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("Set");
    fs::create_dir(&target).unwrap();
    write_pdf(&target.join("a.pdf"), 1);
    fs::write(target.join("b.pdf"), b"garbage").unwrap();

    let err = merge_folder(&target, &Settings::default(), &LopdfMerger::new()).unwrap_err();

    assert!(matches!(err, OrganizerError::Merge(_)));
    let mut names: Vec<String> = fs::read_dir(&target)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    assert_eq!(names, vec!["a.pdf", "b.pdf"]);
}
