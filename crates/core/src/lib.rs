//! Core library for arsiptools
//!
//! This crate implements the **Functional Core** of the arsiptools
//! application, following the Functional Core - Imperative Shell
//! architectural pattern.
//!
//! # Architecture Overview
//!
//! The arsiptools project uses a split-crate architecture to enforce
//! separation of concerns:
//!
//! - **`arsiptools_core`** (this crate): Pure transformation functions with
//!   zero I/O
//! - **`pdf`**: byte-level PDF plumbing (parsing, merging, stamping)
//! - **`arsiptools`**: I/O operations and orchestration (the Imperative Shell)
//!
//! All functions in this crate adhere to these principles:
//!
//! - **Pure functions**: Same input always produces the same output
//! - **No side effects**: No I/O operations, no external state mutations
//! - **Deterministic**: Behavior is predictable and reproducible
//! - **Testable**: Can be tested with simple fixture data, no mocking required
//!
//! # Module Organization
//!
//! - [`identifier`]: labeled-identifier extraction and normalization
//! - [`mapping`]: spreadsheet-row to canonical-name mapping tables
//! - [`names`]: filename sanitization, classification, and collision handling
//! - [`reconcile`]: filename-keyed set reconciliation for merge batches
//! - [`runlog`]: per-run outcome accumulation and tabular materialization

pub mod identifier;
pub mod mapping;
pub mod names;
pub mod reconcile;
pub mod runlog;

pub use identifier::{extract_identifier, normalize_identifier};
pub use mapping::MappingTable;
pub use names::{is_pdf_name, sanitize_filename, strip_tail, NameAllocator};
pub use reconcile::{plan, GroupKeys, MissingEntry, ReconciliationPlan, UniverseMode};
pub use runlog::{Outcome, OutcomeRecord, RunLog};
