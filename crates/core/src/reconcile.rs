//! Filename-keyed set reconciliation for merge batches.
//!
//! Each merge variant uploads two or three file groups that are matched by
//! exact filename. This module computes which keys are complete (present in
//! every required group) and which are not, without touching the file
//! contents. Traversal is sorted by filename so output and log ordering is
//! deterministic across runs.

use std::collections::BTreeSet;

use crate::names::is_pdf_name;

/// How the reconciliation universe is formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniverseMode {
    /// Every filename seen in any group is checked for completeness.
    Union,
    /// Only the first group's filenames are considered; extra files in the
    /// other groups are silently ignored.
    FirstGroup,
}

/// One logical input group: a display name plus its set of filenames.
#[derive(Debug, Clone)]
pub struct GroupKeys {
    pub name: String,
    keys: BTreeSet<String>,
}

impl GroupKeys {
    /// Build a group from a display name and its filenames.
    ///
    /// Names that do not carry a `.pdf` extension are dropped here, so they
    /// never enter any universe.
    pub fn new<I, S>(name: impl Into<String>, filenames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys = filenames
            .into_iter()
            .map(Into::into)
            .filter(|n| is_pdf_name(n))
            .collect();
        GroupKeys {
            name: name.into(),
            keys,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// A key that cannot be merged, with the groups it is missing from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingEntry {
    pub key: String,
    pub missing_groups: Vec<String>,
}

/// Partition of the universe into mergeable and unmergeable keys.
#[derive(Debug, Clone, Default)]
pub struct ReconciliationPlan {
    /// Keys present in every group, sorted by filename.
    pub complete: Vec<String>,
    /// Keys missing from at least one group, sorted by filename.
    pub incomplete: Vec<MissingEntry>,
}

impl ReconciliationPlan {
    pub fn universe_len(&self) -> usize {
        self.complete.len() + self.incomplete.len()
    }
}

/// Partition the universe of filenames across `groups`.
///
/// Every key in the universe lands in exactly one of `complete` or
/// `incomplete`; the two partitions are disjoint by construction.
pub fn plan(groups: &[GroupKeys], mode: UniverseMode) -> ReconciliationPlan {
    let universe: BTreeSet<&String> = match mode {
        UniverseMode::Union => groups.iter().flat_map(|g| g.keys.iter()).collect(),
        UniverseMode::FirstGroup => groups
            .first()
            .map(|g| g.keys.iter().collect())
            .unwrap_or_default(),
    };

    let mut result = ReconciliationPlan::default();

    for key in universe {
        let missing: Vec<String> = groups
            .iter()
            .filter(|g| !g.contains(key))
            .map(|g| g.name.clone())
            .collect();

        if missing.is_empty() {
            result.complete.push(key.clone());
        } else {
            result.incomplete.push(MissingEntry {
                key: key.clone(),
                missing_groups: missing,
            });
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(name: &str, files: &[&str]) -> GroupKeys {
        GroupKeys::new(name, files.iter().copied())
    }

    #[test]
    fn union_universe_partitions_every_key() {
        let groups = [
            group("Folder 1", &["a.pdf", "b.pdf"]),
            group("Folder 2", &["b.pdf", "c.pdf"]),
        ];
        let plan = plan(&groups, UniverseMode::Union);

        assert_eq!(plan.complete, vec!["b.pdf"]);
        let incomplete: Vec<&str> = plan.incomplete.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(incomplete, vec!["a.pdf", "c.pdf"]);
        assert_eq!(plan.universe_len(), 3);
    }

    #[test]
    fn incomplete_entries_name_each_missing_group() {
        let groups = [
            group("INDIVIDU", &["x.pdf"]),
            group("RAWAT JALAN", &["x.pdf"]),
            group("BILLING", &[]),
        ];
        let plan = plan(&groups, UniverseMode::Union);

        assert!(plan.complete.is_empty());
        assert_eq!(plan.incomplete.len(), 1);
        assert_eq!(plan.incomplete[0].key, "x.pdf");
        assert_eq!(plan.incomplete[0].missing_groups, vec!["BILLING"]);
    }

    #[test]
    fn first_group_universe_ignores_extra_files() {
        let groups = [
            group("Folder 1", &["a.pdf"]),
            group("Folder 2", &["a.pdf", "b.pdf"]),
        ];
        let plan = plan(&groups, UniverseMode::FirstGroup);

        assert_eq!(plan.complete, vec!["a.pdf"]);
        assert!(plan.incomplete.is_empty());
        // b.pdf appears nowhere.
        assert_eq!(plan.universe_len(), 1);
    }

    #[test]
    fn first_group_universe_reports_missing_counterparts() {
        let groups = [
            group("Folder 1", &["a.pdf", "b.pdf"]),
            group("Folder 2", &["a.pdf"]),
        ];
        let plan = plan(&groups, UniverseMode::FirstGroup);

        assert_eq!(plan.complete, vec!["a.pdf"]);
        assert_eq!(plan.incomplete.len(), 1);
        assert_eq!(plan.incomplete[0].key, "b.pdf");
        assert_eq!(plan.incomplete[0].missing_groups, vec!["Folder 2"]);
    }

    #[test]
    fn non_pdf_names_never_enter_the_universe() {
        let groups = [
            group("Folder 1", &["a.pdf", "readme.txt"]),
            group("Folder 2", &["a.pdf", "readme.txt"]),
        ];
        let plan = plan(&groups, UniverseMode::Union);

        assert_eq!(plan.complete, vec!["a.pdf"]);
        assert!(plan.incomplete.is_empty());
    }

    #[test]
    fn traversal_is_sorted_by_filename() {
        let groups = [
            group("Folder 1", &["c.pdf", "a.pdf", "b.pdf"]),
            group("Folder 2", &["c.pdf", "a.pdf", "b.pdf"]),
        ];
        let plan = plan(&groups, UniverseMode::Union);
        assert_eq!(plan.complete, vec!["a.pdf", "b.pdf", "c.pdf"]);
    }

    #[test]
    fn empty_groups_produce_empty_plan() {
        let plan = plan(&[], UniverseMode::Union);
        assert_eq!(plan.universe_len(), 0);
    }
}
