//! # checkin-import
//!
//! CSV bulk-import pipeline for checkinlog.
//!
//! Takes an uploaded CSV file of unknown charset (UTF-8 or Shift_JIS),
//! validates every row, resolves tag references, and persists valid rows
//! inside one all-or-nothing transaction. Row-level failures are collected
//! into an ordered, line-addressed error report; a non-empty report means
//! nothing was persisted.
//!
//! ## Example
//!
//! ```rust,ignore
//! use checkin_import::CheckinCsvImporter;
//!
//! let importer = CheckinCsvImporter::new(db.import.clone(), user_id, "upload.csv");
//! match importer.execute().await {
//!     Ok(summary) => println!("imported {} check-ins", summary.rows),
//!     Err(e) => {
//!         for message in e.messages() {
//!             println!("{}", message);
//!         }
//!     }
//! }
//! ```

pub mod charset;
pub mod config;
pub mod importer;
pub mod report;

mod reader;
mod tags;
mod validate;

pub use charset::{detect_charset, CharsetError, DetectedEncoding};
pub use config::CsvColumns;
pub use importer::{CheckinCsvImporter, ImportSummary};
pub use report::{CsvImportError, ImportIssue};
