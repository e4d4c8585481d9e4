//! Edge direction module
//!
//! Resolves a record's `type` flag into a directed money flow between two nodes.

use crate::{NodeKey, TransactionRecord, TransactionType};

/// A transaction resolved into a directed edge
#[derive(Debug, Clone, PartialEq)]
pub struct DirectedEdgeFact {
    /// Node the money leaves
    pub source: NodeKey,

    /// Node the money arrives at
    pub target: NodeKey,

    /// Transaction amount in IDR
    pub amount_tx_idr: f64,

    /// Transaction count or identifier
    pub trx: String,

    /// Raw type value of the originating record
    pub tx_type: String,
}

/// Derive the directed edge for a record
///
/// - `INCOMING`: sender/recipient → debitor
/// - `OUTGOING`: debitor → sender/recipient
/// - anything else: `None`, the record takes no part in the graph
///
/// # Examples
///
/// ```
/// use txflow_domain::{direct, NodeKey, TransactionRecord};
///
/// let record = TransactionRecord::new(
///     NodeKey::new("X", "B1"),
///     NodeKey::new("Z", "B3"),
///     50.0,
///     "1",
///     "incoming",
/// );
/// let edge = direct(&record).unwrap();
/// assert_eq!(edge.source, NodeKey::new("Z", "B3"));
/// assert_eq!(edge.target, NodeKey::new("X", "B1"));
/// ```
pub fn direct(record: &TransactionRecord) -> Option<DirectedEdgeFact> {
    let (source, target) = match record.transaction_type()? {
        TransactionType::Incoming => (record.counterparty_key(), record.debitor_key()),
        TransactionType::Outgoing => (record.debitor_key(), record.counterparty_key()),
    };

    Some(DirectedEdgeFact {
        source,
        target,
        amount_tx_idr: record.amount_tx_idr,
        trx: record.trx.clone(),
        tx_type: record.tx_type.clone(),
    })
}
