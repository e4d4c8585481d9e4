//! Trait definitions for external interactions
//!
//! These traits define the boundary between the pure analysis core and the
//! infrastructure that produces its inputs.

use crate::TransactionRecord;

/// A source of raw transaction records
///
/// Implemented by the infrastructure layer (txflow-loader). Implementations
/// return records already deduplicated; callers memoize the result.
pub trait TransactionSource {
    /// Error type for load operations
    type Error;

    /// Human-readable description of where records come from
    fn describe(&self) -> String;

    /// Read every record from the source
    fn load(&self) -> Result<Vec<TransactionRecord>, Self::Error>;
}
