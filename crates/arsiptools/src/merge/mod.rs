//! Filename-keyed merge batches.
//!
//! Three variants over the same engine: the 3-way merge (INDIVIDU +
//! RAWAT JALAN + BILLING), the symmetric 2-way merge, and the simple
//! 2-way merge that treats folder 1 as the reference set.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::prelude::{println, *};
use arsiptools_core::{plan, GroupKeys, Outcome, RunLog, UniverseMode};

use crate::{archive, inputs};

#[derive(Debug, clap::Parser)]
#[command(name = "merge")]
#[command(about = "Merge matching PDF sets across folders")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// 3-way merge: INDIVIDU + RAWAT JALAN + BILLING, matched by filename
    #[clap(name = "three")]
    Three(ThreeOptions),

    /// 2-way merge over the union of both folders, with completeness log
    #[clap(name = "giant")]
    Giant(GiantOptions),

    /// 2-way merge keyed on folder 1 only; extra folder-2 files are ignored
    #[clap(name = "simple")]
    Simple(SimpleOptions),
}

#[derive(Debug, clap::Args)]
pub struct ThreeOptions {
    /// Folder with the INDIVIDU PDFs (first in concatenation order)
    #[arg(long)]
    pub individu: PathBuf,

    /// Folder with the RAWAT JALAN PDFs (second)
    #[arg(long)]
    pub rawat: PathBuf,

    /// Folder with the BILLING PDFs (third)
    #[arg(long)]
    pub billing: PathBuf,

    /// Where merged PDFs and logs are written
    #[arg(long, default_value = "merged_three")]
    pub out_dir: PathBuf,
}

#[derive(Debug, clap::Args)]
pub struct GiantOptions {
    /// Folder 1 (first in concatenation order)
    #[arg(long)]
    pub folder1: PathBuf,

    /// Folder 2 (second)
    #[arg(long)]
    pub folder2: PathBuf,

    /// Where merged PDFs and logs are written
    #[arg(long, default_value = "merged_giant")]
    pub out_dir: PathBuf,
}

#[derive(Debug, clap::Args)]
pub struct SimpleOptions {
    /// Folder 1: the reference set and first in concatenation order
    #[arg(long)]
    pub folder1: PathBuf,

    /// Folder 2 (second)
    #[arg(long)]
    pub folder2: PathBuf,

    /// Where merged PDFs and logs are written
    #[arg(long, default_value = "merged_simple")]
    pub out_dir: PathBuf,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    match app.command {
        Commands::Three(options) => run_three(options, global).await,
        Commands::Giant(options) => run_giant(options, global).await,
        Commands::Simple(options) => run_simple(options, global).await,
    }
}

async fn run_three(options: ThreeOptions, global: crate::Global) -> Result<()> {
    let groups = vec![
        ("INDIVIDU".to_string(), load_group(&options.individu)?),
        ("RAWAT JALAN".to_string(), load_group(&options.rawat)?),
        ("BILLING".to_string(), load_group(&options.billing)?),
    ];

    if global.verbose {
        for (name, files) in &groups {
            println!("{name}: {} files", files.len());
        }
    }

    let report = merge_groups(&groups, UniverseMode::Union, &options.out_dir)?;
    finish(&report, &options.out_dir)
}

async fn run_giant(options: GiantOptions, global: crate::Global) -> Result<()> {
    let groups = vec![
        ("Folder 1".to_string(), load_group(&options.folder1)?),
        ("Folder 2".to_string(), load_group(&options.folder2)?),
    ];

    let report = merge_groups(&groups, UniverseMode::Union, &options.out_dir)?;
    finish(&report, &options.out_dir)
}

async fn run_simple(options: SimpleOptions, global: crate::Global) -> Result<()> {
    let groups = vec![
        ("Folder 1".to_string(), load_group(&options.folder1)?),
        ("Folder 2".to_string(), load_group(&options.folder2)?),
    ];

    let report = merge_groups(&groups, UniverseMode::FirstGroup, &options.out_dir)?;
    finish(&report, &options.out_dir)
}

fn load_group(dir: &Path) -> Result<HashMap<String, Vec<u8>>> {
    Ok(inputs::index_by_name(inputs::read_dir_files(dir)?))
}

/// Result of one merge batch: the per-key outcome log plus the counts the
/// summary needs.
pub struct MergeReport {
    pub log: RunLog,
    pub successes: usize,
    pub universe: usize,
}

/// Merge every complete key of the reconciliation universe, appending one
/// log record per failure or incomplete key.
///
/// With [`UniverseMode::FirstGroup`], missing counterparts are plain
/// failures (the simple variant's behavior); with [`UniverseMode::Union`]
/// they are recorded as incomplete with each missing group named.
pub fn merge_groups(
    groups: &[(String, HashMap<String, Vec<u8>>)],
    mode: UniverseMode,
    out_dir: &Path,
) -> Result<MergeReport> {
    let keys: Vec<GroupKeys> = groups
        .iter()
        .map(|(name, files)| GroupKeys::new(name.clone(), files.keys().cloned()))
        .collect();
    let plan = plan(&keys, mode);

    fs::create_dir_all(out_dir)?;
    let mut log = RunLog::new();
    let mut successes = 0;

    for entry in &plan.incomplete {
        let detail = f!("not found in {}", entry.missing_groups.join("; "));
        match mode {
            UniverseMode::Union => log.append(&entry.key, Outcome::Incomplete, detail),
            UniverseMode::FirstGroup => log.append(&entry.key, Outcome::Failure, detail),
        }
    }

    for key in &plan.complete {
        let sources: Vec<(String, Vec<u8>)> = groups
            .iter()
            .map(|(name, files)| (f!("{name}/{key}"), files[key].clone()))
            .collect();

        match pdf::merge::merge_documents(&sources) {
            Ok(bytes) => {
                inputs::write_output(out_dir, key, &bytes)?;
                successes += 1;
                log::debug!("merged {key}");
            }
            Err(e) => log.append(key, Outcome::Failure, e.to_string()),
        }
    }

    Ok(MergeReport {
        log,
        successes,
        universe: plan.universe_len(),
    })
}

fn finish(report: &MergeReport, out_dir: &Path) -> Result<()> {
    let failures = report.log.filtered(Outcome::Failure);
    if !failures.is_empty() {
        let bytes = failures.to_csv_pairs(["File Name", "Reason"])?;
        fs::write(out_dir.join("log_merge_failures.csv"), bytes)?;
    }

    let incomplete = report.log.filtered(Outcome::Incomplete);
    if !incomplete.is_empty() {
        let bytes = incomplete.to_csv_pairs(["File Name", "Missing Groups"])?;
        fs::write(out_dir.join("log_incomplete.csv"), bytes)?;
    }

    print_summary(report.successes, failures.len(), incomplete.len());
    archive::zip_output_dir(out_dir)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testpdf::pdf_with_text;

    fn group(files: &[(&str, Vec<u8>)]) -> HashMap<String, Vec<u8>> {
        files
            .iter()
            .map(|(name, bytes)| (name.to_string(), bytes.clone()))
            .collect()
    }

    #[test]
    fn complete_keys_are_merged_in_group_order() {
        let out = tempfile::tempdir().unwrap();
        let groups = vec![
            ("Folder 1".to_string(), group(&[("a.pdf", pdf_with_text("one"))])),
            ("Folder 2".to_string(), group(&[("a.pdf", pdf_with_text("two"))])),
        ];

        let report = merge_groups(&groups, UniverseMode::Union, out.path()).unwrap();
        assert_eq!(report.successes, 1);
        assert!(report.log.is_empty());

        let merged = fs::read(out.path().join("a.pdf")).unwrap();
        let doc = pdf::PdfFile::from_bytes(&merged).unwrap();
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.all_text().unwrap(), "one\ntwo");
    }

    #[test]
    fn union_mode_logs_incomplete_keys_without_output() {
        let out = tempfile::tempdir().unwrap();
        let groups = vec![
            ("INDIVIDU".to_string(), group(&[("x.pdf", pdf_with_text("i"))])),
            ("RAWAT JALAN".to_string(), group(&[("x.pdf", pdf_with_text("r"))])),
            ("BILLING".to_string(), group(&[])),
        ];

        let report = merge_groups(&groups, UniverseMode::Union, out.path()).unwrap();
        assert_eq!(report.successes, 0);
        assert_eq!(report.log.counts(), (0, 0, 1));

        let record = &report.log.records()[0];
        assert_eq!(record.subject, "x.pdf");
        assert!(record.detail.contains("BILLING"));
        assert!(!out.path().join("x.pdf").exists());
    }

    #[test]
    fn simple_mode_ignores_extra_folder2_files() {
        let out = tempfile::tempdir().unwrap();
        let groups = vec![
            ("Folder 1".to_string(), group(&[("a.pdf", pdf_with_text("1"))])),
            (
                "Folder 2".to_string(),
                group(&[("a.pdf", pdf_with_text("2")), ("b.pdf", pdf_with_text("x"))]),
            ),
        ];

        let report = merge_groups(&groups, UniverseMode::FirstGroup, out.path()).unwrap();
        assert_eq!(report.successes, 1);
        assert!(report.log.is_empty());
        assert!(!out.path().join("b.pdf").exists());
    }

    #[test]
    fn simple_mode_logs_missing_counterparts_as_failures() {
        let out = tempfile::tempdir().unwrap();
        let groups = vec![
            ("Folder 1".to_string(), group(&[("a.pdf", pdf_with_text("1"))])),
            ("Folder 2".to_string(), group(&[])),
        ];

        let report = merge_groups(&groups, UniverseMode::FirstGroup, out.path()).unwrap();
        assert_eq!(report.log.counts(), (0, 1, 0));
        assert!(report.log.records()[0].detail.contains("Folder 2"));
    }

    #[test]
    fn broken_sources_fail_without_aborting_the_batch() {
        let out = tempfile::tempdir().unwrap();
        let groups = vec![
            (
                "Folder 1".to_string(),
                group(&[("bad.pdf", b"garbage".to_vec()), ("good.pdf", pdf_with_text("g"))]),
            ),
            (
                "Folder 2".to_string(),
                group(&[("bad.pdf", pdf_with_text("b")), ("good.pdf", pdf_with_text("g2"))]),
            ),
        ];

        let report = merge_groups(&groups, UniverseMode::Union, out.path()).unwrap();
        assert_eq!(report.successes, 1);
        assert_eq!(report.log.counts(), (0, 1, 0));
        assert!(out.path().join("good.pdf").exists());
        assert!(!out.path().join("bad.pdf").exists());
    }

    #[test]
    fn universe_count_covers_both_partitions() {
        let out = tempfile::tempdir().unwrap();
        let groups = vec![
            (
                "Folder 1".to_string(),
                group(&[("a.pdf", pdf_with_text("1")), ("b.pdf", pdf_with_text("2"))]),
            ),
            ("Folder 2".to_string(), group(&[("a.pdf", pdf_with_text("3"))])),
        ];

        let report = merge_groups(&groups, UniverseMode::Union, out.path()).unwrap();
        assert_eq!(report.universe, 2);
        assert_eq!(report.successes + report.log.len(), report.universe);
    }
}
