//! Result packaging.
//!
//! Every batch run ends by zipping its output directory so the whole
//! result set travels as one file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::prelude::{eprintln, *};

/// Zip every file directly under `dir` into `<dir>.zip` next to it.
///
/// Returns the archive path, or `None` (with a warning) when the
/// directory is missing or empty.
pub fn zip_output_dir(dir: &Path) -> Result<Option<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => {
            eprintln!(
                "⚠ Output folder '{}' is empty. No files were produced.",
                dir.display()
            );
            return Ok(None);
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    if files.is_empty() {
        eprintln!(
            "⚠ Output folder '{}' is empty. No files were produced.",
            dir.display()
        );
        return Ok(None);
    }

    let zip_path = dir.with_extension("zip");
    let file = fs::File::create(&zip_path)
        .wrap_err_with(|| f!("failed to create {}", zip_path.display()))?;

    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);

    for path in &files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::Archive(f!("file without a name under {}", dir.display())))?;
        zip.start_file(name, options)
            .map_err(|e| Error::Archive(f!("failed to create zip entry: {e}")))?;
        zip.write_all(&fs::read(path)?)?;
    }

    zip.finish()
        .map_err(|e| Error::Archive(f!("failed to finish zip: {e}")))?;
    log::info!("archived {} files into {}", files.len(), zip_path.display());
    Ok(Some(zip_path))
}
