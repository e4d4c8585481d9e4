//! Tunable analysis parameters

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// Parameters of the PageRank power iteration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRankConfig {
    /// Probability of following an edge instead of teleporting
    pub damping: f64,

    /// Per-node convergence tolerance; iteration stops once the summed
    /// absolute change falls below `node_count * tolerance`
    pub tolerance: f64,

    /// Iteration cap
    pub max_iterations: u32,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping: 0.85,
            tolerance: 1e-6,
            max_iterations: 100,
        }
    }
}

/// Analysis settings, usually read from the `[analysis]` table of the config file
///
/// Missing keys fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// PageRank damping factor, in (0, 1)
    #[serde(default = "default_damping")]
    pub damping: f64,

    /// PageRank convergence tolerance
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// PageRank iteration cap
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Number of amount histogram bins
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,

    /// Number of largest transactions listed in insights
    #[serde(default = "default_top_transactions")]
    pub top_transactions: usize,
}

fn default_damping() -> f64 {
    0.85
}

fn default_tolerance() -> f64 {
    1e-6
}

fn default_max_iterations() -> u32 {
    100
}

/// Upper bound on amount histogram bins
pub const MAX_HISTOGRAM_BINS: usize = 1000;

fn default_histogram_bins() -> usize {
    30
}

fn default_top_transactions() -> usize {
    10
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            damping: default_damping(),
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
            histogram_bins: default_histogram_bins(),
            top_transactions: default_top_transactions(),
        }
    }
}

impl AnalysisConfig {
    /// The PageRank part of the settings
    pub fn pagerank(&self) -> PageRankConfig {
        PageRankConfig {
            damping: self.damping,
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
        }
    }

    /// Reject settings the metric engine cannot run with
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !(self.damping > 0.0 && self.damping < 1.0) {
            return Err(AnalysisError::InvalidParameter(format!(
                "damping must be in (0, 1), got {}",
                self.damping
            )));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(AnalysisError::InvalidParameter(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(AnalysisError::InvalidParameter(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if !(1..=MAX_HISTOGRAM_BINS).contains(&self.histogram_bins) {
            return Err(AnalysisError::InvalidParameter(format!(
                "histogram_bins must be between 1 and {}, got {}",
                MAX_HISTOGRAM_BINS, self.histogram_bins
            )));
        }
        Ok(())
    }
}
