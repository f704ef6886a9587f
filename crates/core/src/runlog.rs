//! Per-run outcome accumulation.
//!
//! Every batch operation appends one [`OutcomeRecord`] per noteworthy item
//! and materializes the accumulated log as a CSV artifact at the end of the
//! run. The log is purely additive in memory; nothing persists across runs.

use serde::Serialize;

/// Classification of a single item's outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Success,
    Failure,
    Incomplete,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Success => write!(f, "Success"),
            Outcome::Failure => write!(f, "Failure"),
            Outcome::Incomplete => write!(f, "Incomplete"),
        }
    }
}

/// One item's outcome: the subject filename, its status, and a detail line.
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeRecord {
    pub subject: String,
    pub outcome: Outcome,
    pub detail: String,
}

/// Append-only record list for one batch run, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct RunLog {
    records: Vec<OutcomeRecord>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, subject: impl Into<String>, outcome: Outcome, detail: impl Into<String>) {
        self.records.push(OutcomeRecord {
            subject: subject.into(),
            outcome,
            detail: detail.into(),
        });
    }

    pub fn records(&self) -> &[OutcomeRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Count records per status: `(successes, failures, incompletes)`.
    pub fn counts(&self) -> (usize, usize, usize) {
        let mut counts = (0, 0, 0);
        for record in &self.records {
            match record.outcome {
                Outcome::Success => counts.0 += 1,
                Outcome::Failure => counts.1 += 1,
                Outcome::Incomplete => counts.2 += 1,
            }
        }
        counts
    }

    /// Records with the given status, preserving insertion order.
    pub fn with_outcome(&self, outcome: Outcome) -> impl Iterator<Item = &OutcomeRecord> {
        self.records.iter().filter(move |r| r.outcome == outcome)
    }

    /// A new log holding only the records with the given status.
    pub fn filtered(&self, outcome: Outcome) -> RunLog {
        RunLog {
            records: self.with_outcome(outcome).cloned().collect(),
        }
    }

    /// Materialize a two-column CSV artifact (subject, detail).
    ///
    /// Zero records produce a headers-only artifact; this never fails on
    /// empty input.
    pub fn to_csv_pairs(&self, headers: [&str; 2]) -> Result<Vec<u8>, csv::Error> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(headers)?;
        for record in &self.records {
            writer.write_record([record.subject.as_str(), record.detail.as_str()])?;
        }
        writer
            .into_inner()
            .map_err(|e| csv::Error::from(std::io::Error::other(e.to_string())))
    }

    /// Materialize a three-column CSV artifact (subject, status, detail).
    pub fn to_csv_with_status(&self, headers: [&str; 3]) -> Result<Vec<u8>, csv::Error> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(headers)?;
        for record in &self.records {
            writer.write_record([
                record.subject.as_str(),
                &record.outcome.to_string(),
                record.detail.as_str(),
            ])?;
        }
        writer
            .into_inner()
            .map_err(|e| csv::Error::from(std::io::Error::other(e.to_string())))
    }
}
