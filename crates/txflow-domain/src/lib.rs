//! txflow Domain Layer
//!
//! This crate contains the core vocabulary of transaction network analysis.
//! It has no external dependencies and defines the records, node identities,
//! direction rule, filters, and metric selection that all other crates build on.
//!
//! ## Key Concepts
//!
//! - **TransactionRecord**: One raw row of the transaction table
//! - **NodeKey**: Counterparty identity, the pair (name, bank)
//! - **DirectedEdgeFact**: A record resolved into a directed money flow
//! - **FilterCriteria**: Amount range, type set, and bank set predicates
//! - **MetricKind**: The six node-level scores the analysis can compute
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Pure functions only; every operation takes its inputs explicitly
//! - I/O lives in `txflow-loader`, graph algorithms in `txflow-analysis`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod direction;
pub mod filter;
pub mod metric;
pub mod node;
pub mod record;
pub mod traits;

// Re-exports for convenience
pub use direction::{direct, DirectedEdgeFact};
pub use filter::{distinct_banks, distinct_types, filter, AmountRange, FilterCriteria};
pub use metric::MetricKind;
pub use node::NodeKey;
pub use record::{dedup_records, TransactionRecord, TransactionType};
pub use traits::TransactionSource;
