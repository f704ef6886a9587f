//! Filename handling shared across batch operations.

use std::collections::HashSet;

/// Replace characters that are unsafe in a filename with `_`.
///
/// Alphanumerics, spaces, dots, underscores, and dashes pass through
/// unchanged; everything else is replaced.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Does the name carry a `.pdf` extension (case-insensitive)?
pub fn is_pdf_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.ends_with(".pdf") && lower.len() > 4
}

/// Remove the text after the last space in the filename stem.
///
/// `"Report Final Draft 2024.pdf"` becomes `"Report Final Draft.pdf"`.
/// Names without an internal space are returned unchanged.
pub fn strip_tail(name: &str) -> String {
    let (stem, ext) = match name.rfind('.') {
        Some(pos) if pos > 0 => (&name[..pos], &name[pos..]),
        _ => (name, ""),
    };
    match stem.rfind(' ') {
        Some(pos) => format!("{}{}", &stem[..pos], ext),
        None => name.to_string(),
    }
}

/// Allocates output filenames, disambiguating collisions deterministically.
///
/// The first request for a name keeps it bare; subsequent requests receive
/// `_2`, `_3`, ... suffixes inserted before the extension.
#[derive(Debug, Default)]
pub struct NameAllocator {
    used: HashSet<String>,
}

impl NameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a unique output name for `wanted`.
    pub fn allocate(&mut self, wanted: &str) -> String {
        if self.used.insert(wanted.to_string()) {
            return wanted.to_string();
        }

        let (stem, ext) = match wanted.rfind('.') {
            Some(pos) if pos > 0 => (&wanted[..pos], &wanted[pos..]),
            _ => (wanted, ""),
        };

        let mut n = 2usize;
        loop {
            let candidate = format!("{}_{}{}", stem, n, ext);
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}
