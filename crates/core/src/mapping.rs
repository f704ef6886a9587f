//! Mapping tables from spreadsheet rows to canonical display names.
//!
//! Rename runs are driven by a spreadsheet whose first column carries either
//! `<prefix> <identifier>` or a bare `<identifier>` per row. The table maps
//! the normalized identifier to the full row value, so the output filename
//! keeps the human-readable prefix.

use std::collections::HashMap;

use crate::identifier::normalize_identifier;

/// A lookup table from normalized identifier to canonical display name.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    entries: HashMap<String, String>,
}

impl MappingTable {
    /// Build a table from stringified first-column cell values.
    ///
    /// Each row splits on its first whitespace run into at most two parts:
    /// the identifier source is the remainder when a split happens, or the
    /// whole value otherwise. The stored value is the original row with
    /// leading/trailing whitespace trimmed. Later rows overwrite earlier
    /// rows on key collision.
    pub fn from_rows<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries = HashMap::new();

        for row in rows {
            // Trim before splitting so leading whitespace never counts as
            // the first run.
            let value = row.as_ref().trim();
            let source = match value.split_once(char::is_whitespace) {
                Some((_, rest)) => rest.trim_start(),
                None => value,
            };
            let key = normalize_identifier(source);
            if key.is_empty() {
                continue;
            }
            entries.insert(key, value.to_string());
        }

        MappingTable { entries }
    }

    /// Look up a canonical name by normalized identifier.
    pub fn get(&self, normalized: &str) -> Option<&str> {
        self.entries.get(normalized).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
