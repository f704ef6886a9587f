//! Input collection from directories.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::prelude::*;
use arsiptools_core::sanitize_filename;

/// One input file read fully into memory.
#[derive(Debug, Clone)]
pub struct NamedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Read every regular file directly under `dir`, sorted by filename.
/// Subdirectories are skipped.
pub fn read_dir_files(dir: &Path) -> Result<Vec<NamedFile>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)
        .wrap_err_with(|| f!("failed to read directory {}", dir.display()))?
    {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let bytes = fs::read(entry.path())
            .wrap_err_with(|| f!("failed to read {}", entry.path().display()))?;
        files.push(NamedFile { name, bytes });
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

/// Index files by name. Last write wins on duplicate names.
pub fn index_by_name(files: Vec<NamedFile>) -> HashMap<String, Vec<u8>> {
    files.into_iter().map(|file| (file.name, file.bytes)).collect()
}

/// Write `bytes` under a sanitized version of `name` inside `dir`,
/// creating the directory if needed.
pub fn write_output(dir: &Path, name: &str, bytes: &[u8]) -> Result<()> {
    fs::create_dir_all(dir)?;
    let path = dir.join(sanitize_filename(name));
    fs::write(&path, bytes).wrap_err_with(|| f!("failed to write {}", path.display()))?;
    Ok(())
}
