//! Spreadsheet-driven copy and move.
//!
//! Both operations take a list of filenames from a spreadsheet's first
//! column and apply it against a source folder: `copy` filters matching
//! PDFs into the output folder, `move` relocates them out of the source.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use crate::prelude::{println, *};
use arsiptools_core::{is_pdf_name, Outcome, RunLog};

use crate::{archive, inputs, sheet};

#[derive(Debug, clap::Args)]
pub struct CopyOptions {
    /// Folder with the candidate PDFs
    #[arg(long)]
    pub pdf_dir: PathBuf,

    /// Spreadsheet whose first column lists the wanted files; a sheet
    /// named like "Pending ..." is preferred when present
    #[arg(long)]
    pub list: PathBuf,

    /// Where copies and the log are written
    #[arg(long, default_value = "copied")]
    pub out_dir: PathBuf,
}

#[derive(Debug, clap::Args)]
pub struct MoveOptions {
    /// Folder the files are moved out of
    #[arg(long)]
    pub pdf_dir: PathBuf,

    /// Spreadsheet whose first column lists the files to move
    #[arg(long)]
    pub list: PathBuf,

    /// Where moved files and the log land
    #[arg(long, default_value = "moved")]
    pub out_dir: PathBuf,
}

pub async fn run_copy(options: CopyOptions, global: crate::Global) -> Result<()> {
    let wanted = sheet::first_column_prefer_pending(&options.list)?;
    if global.verbose {
        println!("Names listed in spreadsheet: {}", wanted.len());
    }

    let files = inputs::index_by_name(inputs::read_dir_files(&options.pdf_dir)?);
    let log = copy_listed(&wanted, &files, &options.out_dir)?;

    finish(&log, &options.out_dir, "log_copy.csv")
}

pub async fn run_move(options: MoveOptions, global: crate::Global) -> Result<()> {
    let wanted = sheet::first_column(&options.list)?;
    if global.verbose {
        println!("Names listed in spreadsheet: {}", wanted.len());
    }

    let log = move_listed(&wanted, &options.pdf_dir, &options.out_dir)?;

    finish(&log, &options.out_dir, "log_move.csv")
}

fn finish(log: &RunLog, out_dir: &Path, log_name: &str) -> Result<()> {
    fs::create_dir_all(out_dir)?;
    fs::write(
        out_dir.join(log_name),
        log.to_csv_with_status(["File Name", "Status", "Detail"])?,
    )?;

    let (successes, failures, incompletes) = log.counts();
    print_summary(successes, failures, incompletes);
    archive::zip_output_dir(out_dir)?;
    Ok(())
}

/// Listed stems get a `.pdf` extension unless they already carry one.
fn listed_pdf_name(value: &str) -> String {
    let trimmed = value.trim();
    if is_pdf_name(trimmed) {
        trimmed.to_string()
    } else {
        f!("{trimmed}.pdf")
    }
}

/// Copy every listed file that exists among the inputs into `out_dir`.
///
/// The list is deduplicated and processed in sorted order; names missing
/// from the inputs are logged as failures.
pub fn copy_listed(
    wanted: &[String],
    files: &HashMap<String, Vec<u8>>,
    out_dir: &Path,
) -> Result<RunLog> {
    fs::create_dir_all(out_dir)?;
    let mut log = RunLog::new();

    let names: BTreeSet<String> = wanted.iter().map(|v| listed_pdf_name(v)).collect();

    for name in names {
        match files.get(&name) {
            Some(bytes) => {
                inputs::write_output(out_dir, &name, bytes)?;
                log.append(&name, Outcome::Success, "copied");
            }
            None => log.append(&name, Outcome::Failure, "not found among input files"),
        }
    }

    Ok(log)
}

/// Move every listed file out of `src_dir` into `out_dir`.
///
/// Uses `fs::rename`, falling back to copy-then-delete across
/// filesystems. Listed names absent from the source folder are logged as
/// failures.
pub fn move_listed(wanted: &[String], src_dir: &Path, out_dir: &Path) -> Result<RunLog> {
    fs::create_dir_all(out_dir)?;
    let mut log = RunLog::new();

    let names: BTreeSet<String> = wanted.iter().map(|v| v.trim().to_string()).collect();

    for name in names {
        if name.is_empty() {
            continue;
        }
        let source = src_dir.join(&name);
        if !source.is_file() {
            log.append(&name, Outcome::Failure, "not found in source folder");
            continue;
        }

        let target = out_dir.join(&name);
        let moved = fs::rename(&source, &target).or_else(|_| {
            fs::copy(&source, &target)?;
            fs::remove_file(&source)
        });

        match moved {
            Ok(()) => log.append(&name, Outcome::Success, target.display().to_string()),
            Err(e) => log.append(&name, Outcome::Failure, e.to_string()),
        }
    }

    Ok(log)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(files: &[(&str, &[u8])]) -> HashMap<String, Vec<u8>> {
        files
            .iter()
            .map(|(name, bytes)| (name.to_string(), bytes.to_vec()))
            .collect()
    }

    fn rows(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn copies_listed_files_and_logs_missing_ones() {
        let out = tempfile::tempdir().unwrap();
        let files = index(&[("a.pdf", b"alpha")]);

        let log = copy_listed(&rows(&["a", "b"]), &files, out.path()).unwrap();
        assert_eq!(log.counts(), (1, 1, 0));
        assert_eq!(fs::read(out.path().join("a.pdf")).unwrap(), b"alpha");
        assert!(!out.path().join("b.pdf").exists());
    }

    #[test]
    fn listed_stems_gain_a_pdf_extension_once() {
        assert_eq!(listed_pdf_name("klaim"), "klaim.pdf");
        assert_eq!(listed_pdf_name("klaim.pdf"), "klaim.pdf");
        assert_eq!(listed_pdf_name("  klaim "), "klaim.pdf");
    }

    #[test]
    fn duplicate_list_entries_copy_once() {
        let out = tempfile::tempdir().unwrap();
        let files = index(&[("a.pdf", b"alpha")]);

        let log = copy_listed(&rows(&["a", "a.pdf", "a"]), &files, out.path()).unwrap();
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn moves_listed_files_out_of_the_source_folder() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        fs::write(src.path().join("x.pdf"), b"data").unwrap();
        fs::write(src.path().join("keep.pdf"), b"kept").unwrap();

        let log = move_listed(&rows(&["x.pdf"]), src.path(), out.path()).unwrap();
        assert_eq!(log.counts(), (1, 0, 0));
        assert!(!src.path().join("x.pdf").exists());
        assert_eq!(fs::read(out.path().join("x.pdf")).unwrap(), b"data");
        assert!(src.path().join("keep.pdf").exists());
    }

    #[test]
    fn missing_move_targets_are_logged_not_fatal() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();

        let log = move_listed(&rows(&["ghost.pdf"]), src.path(), out.path()).unwrap();
        assert_eq!(log.counts(), (0, 1, 0));
        assert_eq!(log.records()[0].detail, "not found in source folder");
    }
}
