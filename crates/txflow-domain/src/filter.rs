//! Filter module - predicates applied to records before graph construction

use crate::TransactionRecord;
use std::collections::BTreeSet;

/// Inclusive bounds on `amount_tx_idr`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmountRange {
    /// Lower bound (inclusive)
    pub min: f64,

    /// Upper bound (inclusive)
    pub max: f64,
}

impl AmountRange {
    /// Create a new range
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// A range that admits every non-negative amount
    pub fn unbounded() -> Self {
        Self::new(0.0, f64::INFINITY)
    }

    /// The tightest range covering every record's amount
    ///
    /// Returns `None` for an empty slice.
    pub fn spanning(records: &[TransactionRecord]) -> Option<Self> {
        let mut amounts = records.iter().map(|r| r.amount_tx_idr);
        let first = amounts.next()?;
        let (min, max) = amounts.fold((first, first), |(lo, hi), a| (lo.min(a), hi.max(a)));
        Some(Self::new(min, max))
    }

    /// Whether `amount` lies within the bounds
    pub fn contains(&self, amount: f64) -> bool {
        amount >= self.min && amount <= self.max
    }

    /// Bounds are numbers and `min <= max`
    pub fn is_valid(&self) -> bool {
        !self.min.is_nan() && !self.max.is_nan() && self.min <= self.max
    }
}

/// User-selected predicates over the transaction table
///
/// All active predicates must hold (AND semantics). The two set predicates
/// treat emptiness differently:
/// - an empty `allowed_types` admits nothing;
/// - an empty `allowed_banks` disables the bank predicate entirely.
///
/// Type matching deliberately ignores case and surrounding whitespace, so
/// `incoming` selects `INCOMING ` rows; it is not an exact string match.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    /// Inclusive amount bounds
    pub amount_range: AmountRange,

    /// Transaction types to keep, matched ignoring case and surrounding whitespace
    pub allowed_types: BTreeSet<String>,

    /// Banks to keep; a record passes if either of its banks is listed
    pub allowed_banks: BTreeSet<String>,
}

impl FilterCriteria {
    /// Create criteria from explicit predicates
    pub fn new<T, B>(amount_range: AmountRange, allowed_types: T, allowed_banks: B) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
        B: IntoIterator,
        B::Item: Into<String>,
    {
        Self {
            amount_range,
            allowed_types: allowed_types.into_iter().map(Into::into).collect(),
            allowed_banks: allowed_banks.into_iter().map(Into::into).collect(),
        }
    }

    /// Criteria that keep every record of `records`
    ///
    /// Amount range spans the data, every type present is allowed, and no
    /// bank constraint is applied.
    pub fn permissive(records: &[TransactionRecord]) -> Self {
        Self::new(
            AmountRange::spanning(records).unwrap_or_else(AmountRange::unbounded),
            distinct_types(records),
            Vec::<String>::new(),
        )
    }

    /// Whether a single record satisfies every active predicate
    pub fn matches(&self, record: &TransactionRecord) -> bool {
        self.matches_normalized(record, &normalize_types(&self.allowed_types))
    }

    fn matches_normalized(&self, record: &TransactionRecord, types: &BTreeSet<String>) -> bool {
        if !self.amount_range.contains(record.amount_tx_idr) {
            return false;
        }

        if !types.contains(&normalize_type(&record.tx_type)) {
            return false;
        }

        self.allowed_banks.is_empty()
            || self.allowed_banks.iter().any(|bank| record.involves_bank(bank))
    }
}

/// Keep the records satisfying `criteria`, preserving order
///
/// # Examples
///
/// ```
/// use txflow_domain::{filter, AmountRange, FilterCriteria, NodeKey, TransactionRecord};
///
/// let records = vec![TransactionRecord::new(
///     NodeKey::new("X", "B1"),
///     NodeKey::new("Y", "B2"),
///     100.0,
///     "1",
///     "OUTGOING",
/// )];
///
/// let none = FilterCriteria::new(AmountRange::unbounded(), Vec::<String>::new(), Vec::<String>::new());
/// assert!(filter(&records, &none).is_empty());
///
/// let all = FilterCriteria::permissive(&records);
/// assert_eq!(filter(&records, &all).len(), 1);
/// ```
pub fn filter(records: &[TransactionRecord], criteria: &FilterCriteria) -> Vec<TransactionRecord> {
    let types = normalize_types(&criteria.allowed_types);
    records
        .iter()
        .filter(|r| criteria.matches_normalized(r, &types))
        .cloned()
        .collect()
}

/// Distinct raw type values in order of first appearance
pub fn distinct_types(records: &[TransactionRecord]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    records
        .iter()
        .filter(|r| seen.insert(r.tx_type.as_str()))
        .map(|r| r.tx_type.clone())
        .collect()
}

/// Distinct banks on either side of a transfer, in order of first appearance
pub fn distinct_banks(records: &[TransactionRecord]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut banks = Vec::new();
    for record in records {
        for bank in [&record.debitor_bank, &record.sender_recipient_bank] {
            if seen.insert(bank.as_str()) {
                banks.push(bank.clone());
            }
        }
    }
    banks
}

fn normalize_type(value: &str) -> String {
    value.trim().to_uppercase()
}

fn normalize_types(types: &BTreeSet<String>) -> BTreeSet<String> {
    types.iter().map(|t| normalize_type(t)).collect()
}
