//! # record-dedup
//!
//! Removes duplicate records from JSON array files.
//!
//! ## Features
//!
//! - **Keyed deduplication**: records are identified by one configurable field
//! - **First occurrence wins**: retained records keep their input order
//! - **Field profiles**: the key field is picked from the file name, with
//!   built-in profiles for station (`gare.json`) and municipality
//!   (`output.json`) registries
//! - **Encoding detection**: BOM and legacy charsets are transcoded to UTF-8
//! - **Reports**: counts, reduction percentage and a preview of dropped records
//!
//! ## Usage
//!
//! ```bash
//! # Clean public/gare.json and public/output.json
//! record-dedup
//!
//! # Clean any file with an explicit key
//! record-dedup stops.json --key stop_id --display stop_name
//! ```
//!
//! ## Example
//!
//! ```rust
//! use record_dedup::dedup::{deduplicate, Record};
//!
//! let records: Vec<Record> = serde_json::from_str(
//!     r#"[{"Code UIC": "1", "Nom Gare": "A"}, {"Code UIC": "1", "Nom Gare": "A2"}]"#,
//! ).unwrap();
//!
//! let outcome = deduplicate(records, "Code UIC", "Nom Gare");
//! assert_eq!(outcome.unique.len(), 1);
//! assert_eq!(outcome.duplicates[0].dropped, "A2");
//! ```

pub mod cli;
pub mod dedup;
pub mod encoding;
pub mod error;
pub mod output;
pub mod processor;
pub mod profile;
pub mod progress;

pub use cli::Args;
pub use dedup::{deduplicate, DedupOutcome, Deduplicator, DuplicateEntry, Record};
pub use error::CleanError;
pub use processor::{BatchReport, Processor, ProcessorConfig};
pub use profile::{FieldProfile, ProfileTable};
