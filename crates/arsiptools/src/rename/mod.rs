//! Batch renaming.
//!
//! `sep` extracts the SEP identifier from each PDF's text and resolves it
//! through a spreadsheet-derived mapping table; `strip-tail` is a pure
//! filename cleanup that drops the last space-separated word of the stem.

use std::fs;
use std::path::{Path, PathBuf};

use crate::prelude::{println, *};
use arsiptools_core::{
    extract_identifier, normalize_identifier, sanitize_filename, strip_tail, MappingTable,
    NameAllocator, Outcome, RunLog,
};
use pdf::PdfFile;

use crate::{archive, inputs, sheet};

#[derive(Debug, clap::Parser)]
#[command(name = "rename")]
#[command(about = "Rename PDFs by extracted identifier or by filename cleanup")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Rename by the Nomor SEP identifier found in each PDF's text
    #[clap(name = "sep")]
    Sep(SepOptions),

    /// Drop the text after the last space in each filename stem
    #[clap(name = "strip-tail")]
    StripTail(StripTailOptions),
}

/// Where to look for the identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Scope {
    /// Only the first page (fast; identifiers usually sit on page 1)
    FirstPage,
    /// Every page, concatenated in page order
    AllPages,
}

#[derive(Debug, clap::Args)]
pub struct SepOptions {
    /// Folder with the PDFs to rename
    #[arg(long)]
    pub pdf_dir: PathBuf,

    /// Mapping spreadsheet; column 1 holds the canonical names
    #[arg(long)]
    pub mapping: PathBuf,

    /// Pages searched for the identifier
    #[arg(long, value_enum, default_value = "first-page")]
    pub scope: Scope,

    /// Where renamed copies and logs are written
    #[arg(long, default_value = "renamed_sep")]
    pub out_dir: PathBuf,
}

#[derive(Debug, clap::Args)]
pub struct StripTailOptions {
    /// Folder with the PDFs to rename
    #[arg(long)]
    pub pdf_dir: PathBuf,

    /// Where renamed copies and the log are written
    #[arg(long, default_value = "renamed_strip_tail")]
    pub out_dir: PathBuf,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    match app.command {
        Commands::Sep(options) => run_sep(options, global).await,
        Commands::StripTail(options) => run_strip_tail(options, global).await,
    }
}

async fn run_sep(options: SepOptions, global: crate::Global) -> Result<()> {
    let rows = sheet::first_column(&options.mapping)?;
    let mapping = MappingTable::from_rows(rows.iter().map(String::as_str));
    if mapping.is_empty() {
        return Err(Error::Spreadsheet(f!(
            "mapping spreadsheet {} produced no entries",
            options.mapping.display()
        ))
        .into());
    }

    if global.verbose {
        println!("Mapping entries: {}", mapping.len());
    }

    let files = inputs::read_dir_files(&options.pdf_dir)?;
    let log = rename_by_identifier(&files, &mapping, options.scope, &options.out_dir)?;

    let successes = log.filtered(Outcome::Success);
    let failures = log.filtered(Outcome::Failure);
    fs::write(
        options.out_dir.join("log_rename_ok.csv"),
        successes.to_csv_pairs(["Original Name", "New Name"])?,
    )?;
    fs::write(
        options.out_dir.join("log_rename_failed.csv"),
        failures.to_csv_pairs(["File Name", "Reason"])?,
    )?;

    print_summary(successes.len(), failures.len(), 0);
    archive::zip_output_dir(&options.out_dir)?;
    Ok(())
}

async fn run_strip_tail(options: StripTailOptions, global: crate::Global) -> Result<()> {
    let files = inputs::read_dir_files(&options.pdf_dir)?;
    let log = rename_strip_tail(&files, &options.out_dir)?;

    fs::write(
        options.out_dir.join("log_rename_ok.csv"),
        log.to_csv_pairs(["Original Name", "New Name"])?,
    )?;

    print_summary(log.len(), 0, 0);
    archive::zip_output_dir(&options.out_dir)?;
    Ok(())
}

/// Rename each PDF to `{canonical}.pdf` by its extracted identifier.
///
/// The output is a byte-for-byte copy of the source under the new name.
/// Per-file failures (unreadable PDF, identifier missing, identifier not
/// in the table) are logged and skipped; the batch always drains its full
/// input list. Name collisions get `_2`, `_3`, ... suffixes.
pub fn rename_by_identifier(
    files: &[inputs::NamedFile],
    mapping: &MappingTable,
    scope: Scope,
    out_dir: &Path,
) -> Result<RunLog> {
    fs::create_dir_all(out_dir)?;
    let mut log = RunLog::new();
    let mut names = NameAllocator::new();

    for file in files {
        let text = match extract_text(&file.bytes, scope) {
            Ok(text) => text,
            Err(e) => {
                log.append(&file.name, Outcome::Failure, e.to_string());
                continue;
            }
        };

        let Some(raw) = extract_identifier(&text) else {
            log.append(&file.name, Outcome::Failure, "identifier not found");
            continue;
        };
        let id = normalize_identifier(&raw);

        let Some(canonical) = mapping.get(&id) else {
            log.append(
                &file.name,
                Outcome::Failure,
                f!("identifier '{id}' not in mapping table"),
            );
            continue;
        };

        let new_name = names.allocate(&sanitize_filename(&f!("{canonical}.pdf")));
        inputs::write_output(out_dir, &new_name, &file.bytes)?;
        log.append(&file.name, Outcome::Success, new_name);
    }

    Ok(log)
}

fn extract_text(bytes: &[u8], scope: Scope) -> Result<String, pdf::PdfError> {
    let doc = PdfFile::from_bytes(bytes)?;
    match scope {
        Scope::FirstPage => doc.first_page_text(),
        Scope::AllPages => doc.all_text(),
    }
}

/// Copy each file under its stem with the last space-separated word
/// removed. Never fails per-file; every input produces a Success record.
pub fn rename_strip_tail(files: &[inputs::NamedFile], out_dir: &Path) -> Result<RunLog> {
    fs::create_dir_all(out_dir)?;
    let mut log = RunLog::new();
    let mut names = NameAllocator::new();

    for file in files {
        let new_name = names.allocate(&strip_tail(&file.name));
        inputs::write_output(out_dir, &new_name, &file.bytes)?;
        log.append(&file.name, Outcome::Success, new_name);
    }

    Ok(log)
}
