//! Record-level insights: amount totals, type mix, histogram, largest transactions

use crate::config::AnalysisConfig;
use std::collections::HashMap;
use txflow_domain::TransactionRecord;

/// Number of records carrying one raw type value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCount {
    /// Raw type value as loaded
    pub tx_type: String,

    /// Records with that value
    pub count: usize,
}

/// One equal-width bucket of the amount histogram
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    /// Inclusive lower edge
    pub lower: f64,

    /// Upper edge; inclusive only for the last bin
    pub upper: f64,

    /// Records whose amount falls in the bin
    pub count: usize,
}

/// Descriptive statistics over a set of records
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionInsights {
    /// Number of records
    pub record_count: usize,

    /// Sum of all amounts
    pub total_amount: f64,

    /// Counts per raw type
    pub type_distribution: Vec<TypeCount>,

    /// Amount histogram
    pub histogram: Vec<HistogramBin>,

    /// Largest transactions, biggest first
    pub top_transactions: Vec<TransactionRecord>,
}

impl TransactionInsights {
    /// Compute every insight for `records`
    pub fn of(records: &[TransactionRecord], config: &AnalysisConfig) -> Self {
        Self {
            record_count: records.len(),
            total_amount: records.iter().map(|r| r.amount_tx_idr).sum(),
            type_distribution: type_distribution(records),
            histogram: amount_histogram(records, config.histogram_bins),
            top_transactions: top_transactions(records, config.top_transactions),
        }
    }
}

/// Record count per raw type, most frequent first; ties keep first appearance
pub fn type_distribution(records: &[TransactionRecord]) -> Vec<TypeCount> {
    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<TypeCount> = Vec::new();

    for record in records {
        let slot = *position.entry(record.tx_type.as_str()).or_insert_with(|| {
            counts.push(TypeCount {
                tx_type: record.tx_type.clone(),
                count: 0,
            });
            counts.len() - 1
        });
        counts[slot].count += 1;
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Equal-width histogram of amounts over `[min, max]`
///
/// No records or zero bins give an empty histogram. When every amount is
/// equal a single bin holds them all.
pub fn amount_histogram(records: &[TransactionRecord], bins: usize) -> Vec<HistogramBin> {
    if records.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = records.iter().map(|r| r.amount_tx_idr).fold(f64::INFINITY, f64::min);
    let max = records.iter().map(|r| r.amount_tx_idr).fold(f64::NEG_INFINITY, f64::max);

    if max <= min {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: records.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut histogram: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for record in records {
        let slot = (((record.amount_tx_idr - min) / width) as usize).min(bins - 1);
        histogram[slot].count += 1;
    }

    histogram
}

/// The `limit` largest transactions, biggest first; ties keep record order
pub fn top_transactions(records: &[TransactionRecord], limit: usize) -> Vec<TransactionRecord> {
    let mut sorted: Vec<&TransactionRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.amount_tx_idr.total_cmp(&a.amount_tx_idr));
    sorted.into_iter().take(limit).cloned().collect()
}
