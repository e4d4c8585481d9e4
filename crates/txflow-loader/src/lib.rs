//! txflow Transaction Loader
//!
//! Reads raw transaction tables into [`TransactionRecord`]s and memoizes them
//! for a session.
//!
//! # Sources
//!
//! - `.csv` files with a header row
//! - `.json` files holding an array of row objects
//! - `.xlsx` workbooks, read from the first sheet with its first row as header
//!
//! Names and banks are taken verbatim; only headers and amounts are trimmed.
//!
//! Required columns: `type`, `debitor_name`, `debitor_bank`,
//! `sender_recipient_name`, `sender_recipient_bank`, `amount_tx_idr`, `trx`.
//! Extra columns are ignored. Exact duplicate rows are dropped on load.
//!
//! # Examples
//!
//! ```no_run
//! use txflow_loader::{FileSource, RecordCache};
//!
//! let mut cache = RecordCache::new(FileSource::new("transactions.csv"));
//! match cache.get_or_load() {
//!     Ok(records) => println!("{} records", records.len()),
//!     Err(e) => eprintln!("{}", e), // degrade to an empty state
//! }
//! ```
//!
//! [`TransactionRecord`]: txflow_domain::TransactionRecord

#![warn(missing_docs)]

mod auxiliary;
mod cache;
mod error;
mod source;

pub use auxiliary::{read_auxiliary_tables, AuxiliaryTable, AUXILIARY_TABLES};
pub use cache::RecordCache;
pub use error::LoaderError;
pub use source::{load_records, FileSource, SourceFormat, REQUIRED_COLUMNS};
