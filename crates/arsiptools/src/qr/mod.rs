//! QR code generation and anchored stamping.
//!
//! `generate` renders a signature payload to a PNG; `insert` searches page
//! 1 of each PDF for an anchor string and stamps a QR image in a square
//! just below the first match.

use std::fs;
use std::path::{Path, PathBuf};

use crate::prelude::{println, *};
use arsiptools_core::{Outcome, RunLog};
use pdf::{PdfFile, Rect};

use crate::{archive, inputs};

#[derive(Debug, clap::Parser)]
#[command(name = "qr")]
#[command(about = "QR code generation and stamping")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Encode a text payload as a QR code PNG
    #[clap(name = "generate")]
    Generate(GenerateOptions),

    /// Stamp a QR image below an anchor text on page 1 of each PDF
    #[clap(name = "insert")]
    Insert(InsertOptions),
}

#[derive(Debug, clap::Args)]
pub struct GenerateOptions {
    /// Payload to encode; newlines are preserved
    #[arg(long)]
    pub data: String,

    /// Output PNG path
    #[arg(long, default_value = "qr.png")]
    pub out: PathBuf,
}

#[derive(Debug, clap::Args)]
pub struct InsertOptions {
    /// Folder with the target PDFs
    #[arg(long)]
    pub pdf_dir: PathBuf,

    /// QR image to stamp (PNG)
    #[arg(long)]
    pub qr: PathBuf,

    /// Anchor text searched on page 1; the stamp lands below its first
    /// occurrence
    #[arg(long)]
    pub anchor: String,

    /// Vertical distance from the anchor's bottom edge (negative moves up)
    #[arg(long, default_value = "0")]
    pub offset_y: f32,

    /// Side length of the square stamp, in points
    #[arg(long, default_value = "50")]
    pub side: f32,

    /// Where stamped PDFs and the log are written
    #[arg(long, default_value = "stamped")]
    pub out_dir: PathBuf,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    match app.command {
        Commands::Generate(options) => run_generate(options, global).await,
        Commands::Insert(options) => run_insert(options, global).await,
    }
}

async fn run_generate(options: GenerateOptions, _global: crate::Global) -> Result<()> {
    let png = pdf::qr::qr_png_bytes(&options.data)?;
    fs::write(&options.out, png)
        .wrap_err_with(|| f!("failed to write {}", options.out.display()))?;
    println!("QR code written to {}", options.out.display());
    Ok(())
}

async fn run_insert(options: InsertOptions, global: crate::Global) -> Result<()> {
    let png = fs::read(&options.qr)
        .wrap_err_with(|| f!("failed to read QR image {}", options.qr.display()))?;
    let files = inputs::read_dir_files(&options.pdf_dir)?;

    if global.verbose {
        println!("Stamping below '{}' in {} files", options.anchor, files.len());
    }

    let log = insert_qr(
        &files,
        &png,
        &options.anchor,
        options.offset_y,
        options.side,
        &options.out_dir,
    )?;

    fs::write(
        options.out_dir.join("log_qr_insert.csv"),
        log.to_csv_with_status(["File Name", "Status", "Detail"])?,
    )?;

    let (successes, failures, incompletes) = log.counts();
    print_summary(successes, failures, incompletes);
    archive::zip_output_dir(&options.out_dir)?;
    Ok(())
}

/// Stamp `png` below the first page-1 occurrence of `anchor` in each PDF.
///
/// Files whose first page lacks the anchor produce no output file, only a
/// failure record. Per-file errors never abort the batch.
pub fn insert_qr(
    files: &[inputs::NamedFile],
    png: &[u8],
    anchor: &str,
    offset_y: f32,
    side: f32,
    out_dir: &Path,
) -> Result<RunLog> {
    fs::create_dir_all(out_dir)?;
    let mut log = RunLog::new();

    for file in files {
        match stamp_one(&file.bytes, png, anchor, offset_y, side) {
            Ok(Some(bytes)) => {
                inputs::write_output(out_dir, &file.name, &bytes)?;
                log.append(&file.name, Outcome::Success, "stamped on page 1");
            }
            Ok(None) => log.append(
                &file.name,
                Outcome::Failure,
                f!("anchor '{anchor}' not found on page 1"),
            ),
            Err(e) => log.append(&file.name, Outcome::Failure, e.to_string()),
        }
    }

    Ok(log)
}

/// Returns the stamped document, or `None` when the anchor is absent.
fn stamp_one(
    bytes: &[u8],
    png: &[u8],
    anchor: &str,
    offset_y: f32,
    side: f32,
) -> Result<Option<Vec<u8>>, pdf::PdfError> {
    let mut doc = PdfFile::from_bytes(bytes)?;

    let hits = doc.search_first_page(anchor)?;
    let Some(first) = hits.first() else {
        return Ok(None);
    };

    let placement = Rect {
        x0: first.x0,
        y0: first.y1 + offset_y,
        x1: first.x0 + side,
        y1: first.y1 + offset_y + side,
    };

    doc.stamp_first_page(png, placement)?;
    Ok(Some(doc.save_to_bytes()?))
}
