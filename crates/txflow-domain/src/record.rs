//! Transaction record module - one raw row of the transaction table

use crate::NodeKey;
use std::collections::HashSet;

/// Direction discriminator carried by the `type` column
///
/// Only `INCOMING` and `OUTGOING` produce graph edges. Any other value is kept
/// verbatim on the record so tabular views can still show it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    /// Money arrives at the debitor's account from the counterparty
    Incoming,

    /// Money leaves the debitor's account towards the counterparty
    Outgoing,
}

impl TransactionType {
    /// Get the canonical type name
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Incoming => "INCOMING",
            TransactionType::Outgoing => "OUTGOING",
        }
    }

    /// Parse a type value, ignoring case and surrounding whitespace
    ///
    /// Returns `None` for unrecognized values.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "INCOMING" => Some(TransactionType::Incoming),
            "OUTGOING" => Some(TransactionType::Outgoing),
            _ => None,
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid transaction type: {}", s))
    }
}

/// One raw transaction row
///
/// Records are immutable once loaded. The `tx_type` field holds the raw value of
/// the `type` column; use [`TransactionRecord::transaction_type`] to interpret it.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    /// Account holder whose statement the row comes from
    pub debitor_name: String,

    /// Bank of the account holder
    pub debitor_bank: String,

    /// The other party of the transfer
    pub sender_recipient_name: String,

    /// Bank of the other party
    pub sender_recipient_bank: String,

    /// Transaction amount in IDR (non-negative)
    pub amount_tx_idr: f64,

    /// Transaction count or identifier, kept as text
    pub trx: String,

    /// Raw value of the `type` column
    pub tx_type: String,
}

impl TransactionRecord {
    /// Create a new record
    pub fn new(
        debitor: NodeKey,
        counterparty: NodeKey,
        amount_tx_idr: f64,
        trx: impl Into<String>,
        tx_type: impl Into<String>,
    ) -> Self {
        Self {
            debitor_name: debitor.name,
            debitor_bank: debitor.bank,
            sender_recipient_name: counterparty.name,
            sender_recipient_bank: counterparty.bank,
            amount_tx_idr,
            trx: trx.into(),
            tx_type: tx_type.into(),
        }
    }

    /// Node key of the account holder
    pub fn debitor_key(&self) -> NodeKey {
        NodeKey::new(&self.debitor_name, &self.debitor_bank)
    }

    /// Node key of the counterparty
    pub fn counterparty_key(&self) -> NodeKey {
        NodeKey::new(&self.sender_recipient_name, &self.sender_recipient_bank)
    }

    /// Interpreted direction, `None` when the type is unrecognized
    pub fn transaction_type(&self) -> Option<TransactionType> {
        TransactionType::parse(&self.tx_type)
    }

    /// Whether either side of the transfer banks with `bank`
    pub fn involves_bank(&self, bank: &str) -> bool {
        self.debitor_bank == bank || self.sender_recipient_bank == bank
    }

    fn identity(&self) -> RecordIdentity<'_> {
        (
            self.debitor_name.as_str(),
            self.debitor_bank.as_str(),
            self.sender_recipient_name.as_str(),
            self.sender_recipient_bank.as_str(),
            self.amount_tx_idr.to_bits(),
            self.trx.as_str(),
            self.tx_type.as_str(),
        )
    }
}

type RecordIdentity<'a> = (&'a str, &'a str, &'a str, &'a str, u64, &'a str, &'a str);

/// Remove exact-duplicate records, keeping the first occurrence
///
/// Two records are duplicates when every field is equal (amounts compared
/// bit-for-bit). Relative order of the survivors is preserved.
///
/// # Examples
///
/// ```
/// use txflow_domain::{dedup_records, NodeKey, TransactionRecord};
///
/// let row = TransactionRecord::new(
///     NodeKey::new("X", "B1"),
///     NodeKey::new("Y", "B2"),
///     100.0,
///     "1",
///     "OUTGOING",
/// );
/// let deduped = dedup_records(vec![row.clone(), row]);
/// assert_eq!(deduped.len(), 1);
/// ```
pub fn dedup_records(records: Vec<TransactionRecord>) -> Vec<TransactionRecord> {
    let keep: Vec<bool> = {
        let mut seen: HashSet<RecordIdentity<'_>> = HashSet::with_capacity(records.len());
        records.iter().map(|r| seen.insert(r.identity())).collect()
    };

    records
        .into_iter()
        .zip(keep)
        .filter_map(|(record, keep)| keep.then_some(record))
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_record() -> impl Strategy<Value = TransactionRecord> {
        (
            prop::sample::select(vec!["A", "B", "C"]),
            prop::sample::select(vec!["B1", "B2"]),
            prop::sample::select(vec!["X", "Y"]),
            0u32..4,
            prop::sample::select(vec!["INCOMING", "OUTGOING", "OTHER"]),
        )
            .prop_map(|(name, bank, counterparty, amount, tx_type)| {
                TransactionRecord::new(
                    NodeKey::new(name, bank),
                    NodeKey::new(counterparty, "B3"),
                    amount as f64 * 50.0,
                    "1",
                    tx_type,
                )
            })
    }

    proptest! {
        /// Property: deduplicating twice equals deduplicating once
        #[test]
        fn test_dedup_idempotent(records in prop::collection::vec(arb_record(), 0..40)) {
            let once = dedup_records(records);
            let twice = dedup_records(once.clone());
            prop_assert_eq!(once, twice);
        }

        /// Property: loading the same source twice dedupes to the single-load set
        #[test]
        fn test_dedup_of_doubled_source(records in prop::collection::vec(arb_record(), 0..40)) {
            let once = dedup_records(records.clone());
            let mut doubled = records.clone();
            doubled.extend(records);
            prop_assert_eq!(dedup_records(doubled), once);
        }
    }
}
