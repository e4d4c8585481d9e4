//! Interactive session state: the cached data source and the current view parameters.

use crate::cli::FilterArgs;
use crate::config::{Config, EDGE_WIDTH_RANGE, NODE_SIZE_RANGE, TOP_N_RANGE};
use crate::error::{CliError, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use txflow_analysis::{analyze, AnalysisConfig, AnalysisReport, AnalysisRequest, RenderOptions};
use txflow_domain::{distinct_types, AmountRange, FilterCriteria, MetricKind, TransactionRecord};
use txflow_loader::{FileSource, RecordCache};

/// User-adjustable parameters of the current view.
///
/// `None` for the amount range or the type set means "whatever the loaded
/// data contains", so they track the data across refreshes.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewParams {
    /// Amount bounds; `None` spans the data
    pub amount_range: Option<AmountRange>,

    /// Allowed transaction types; `None` allows every type present
    pub types: Option<BTreeSet<String>>,

    /// Allowed banks; empty disables the bank filter
    pub banks: BTreeSet<String>,

    /// Ranking metric
    pub metric: MetricKind,

    /// Leaderboard size
    pub top_n: usize,

    /// Render node size factor
    pub node_size_factor: f64,

    /// Render edge width factor
    pub edge_width_factor: f64,

    /// Bank used for recommendations and highlighting
    pub home_bank: Option<String>,
}

impl ViewParams {
    /// Initial parameters from the configuration and the active profile.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut params = Self {
            amount_range: None,
            types: None,
            banks: BTreeSet::new(),
            metric: config.defaults.metric_kind()?,
            top_n: TOP_N_RANGE.0,
            node_size_factor: NODE_SIZE_RANGE.0,
            edge_width_factor: EDGE_WIDTH_RANGE.0,
            home_bank: config.get_active_profile().ok().and_then(|p| p.home_bank.clone()),
        };
        params.set_top_n(config.defaults.top_n)?;
        params.set_node_size_factor(config.defaults.node_size_factor)?;
        params.set_edge_width_factor(config.defaults.edge_width_factor)?;
        Ok(params)
    }

    /// Set the leaderboard size.
    pub fn set_top_n(&mut self, top_n: usize) -> Result<()> {
        let (min, max) = TOP_N_RANGE;
        if !(min..=max).contains(&top_n) {
            return Err(CliError::InvalidInput(format!(
                "top_n must be between {} and {}, got {}",
                min, max, top_n
            )));
        }
        self.top_n = top_n;
        Ok(())
    }

    /// Set the render node size factor.
    pub fn set_node_size_factor(&mut self, factor: f64) -> Result<()> {
        self.node_size_factor = check_factor("node size", factor, NODE_SIZE_RANGE)?;
        Ok(())
    }

    /// Set the render edge width factor.
    pub fn set_edge_width_factor(&mut self, factor: f64) -> Result<()> {
        self.edge_width_factor = check_factor("edge width", factor, EDGE_WIDTH_RANGE)?;
        Ok(())
    }

    /// Set amount bounds; a missing side keeps the current value or the data's extent.
    pub fn set_amount_bounds(
        &mut self,
        min: Option<f64>,
        max: Option<f64>,
        records: &[TransactionRecord],
    ) -> Result<()> {
        if min.is_none() && max.is_none() {
            return Ok(());
        }

        let current = self.amount_range(records);
        let range = AmountRange::new(min.unwrap_or(current.min), max.unwrap_or(current.max));
        if !range.is_valid() {
            return Err(CliError::InvalidInput(format!(
                "amount range [{}, {}] is empty",
                range.min, range.max
            )));
        }
        self.amount_range = Some(range);
        Ok(())
    }

    /// Apply command-line filter flags.
    pub fn apply(&mut self, args: &FilterArgs, records: &[TransactionRecord]) -> Result<()> {
        self.set_amount_bounds(args.min_amount, args.max_amount, records)?;
        if !args.types.is_empty() {
            self.types = Some(args.types.iter().cloned().collect());
        }
        if !args.banks.is_empty() {
            self.banks = args.banks.iter().cloned().collect();
        }
        if let Some(metric) = args.metric {
            self.metric = metric.into();
        }
        if let Some(top_n) = args.top_n {
            self.set_top_n(top_n)?;
        }
        Ok(())
    }

    /// Effective amount bounds for `records`.
    pub fn amount_range(&self, records: &[TransactionRecord]) -> AmountRange {
        self.amount_range
            .or_else(|| AmountRange::spanning(records))
            .unwrap_or_else(AmountRange::unbounded)
    }

    /// Filter criteria for `records`.
    pub fn criteria(&self, records: &[TransactionRecord]) -> FilterCriteria {
        let types = match &self.types {
            Some(types) => types.iter().cloned().collect::<Vec<_>>(),
            None => distinct_types(records),
        };
        FilterCriteria::new(self.amount_range(records), types, self.banks.iter().cloned())
    }

    /// Analysis request for `records`.
    pub fn request(&self, records: &[TransactionRecord]) -> AnalysisRequest {
        AnalysisRequest {
            criteria: self.criteria(records),
            metric: self.metric,
            top_n: self.top_n,
        }
    }

    /// Render settings for `records`.
    pub fn render_options(&self, records: &[TransactionRecord]) -> RenderOptions {
        RenderOptions {
            node_size_factor: self.node_size_factor,
            edge_width_factor: self.edge_width_factor,
            max_amount: records.iter().map(|r| r.amount_tx_idr).fold(0.0, f64::max),
            home_bank: self.home_bank.clone(),
        }
    }
}

fn check_factor(name: &str, value: f64, (min, max): (f64, f64)) -> Result<f64> {
    if !(min..=max).contains(&value) {
        return Err(CliError::InvalidInput(format!(
            "{} factor must be between {} and {}, got {}",
            name, min, max, value
        )));
    }
    Ok(value)
}

/// Records available to a command.
///
/// A failed load degrades to an empty dataset and carries the reason.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Loaded records, empty when the source is unavailable
    pub records: Arc<Vec<TransactionRecord>>,

    /// Why the source could not be loaded
    pub unavailable: Option<String>,
}

/// A report together with the records it was computed from.
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub dataset: Dataset,
    pub report: AnalysisReport,
}

/// Owns the record cache and the view parameters across commands.
#[derive(Debug)]
pub struct Session {
    cache: RecordCache<FileSource>,
    initial: ViewParams,
    /// Current view parameters
    pub params: ViewParams,
    analysis: AnalysisConfig,
}

impl Session {
    /// Create a session over `source`.
    pub fn new(source: impl AsRef<Path>, params: ViewParams, analysis: AnalysisConfig) -> Self {
        Self {
            cache: RecordCache::new(FileSource::new(source)),
            initial: params.clone(),
            params,
            analysis,
        }
    }

    /// Create a session from the configuration, optionally overriding the source path.
    pub fn from_config(config: &Config, source: Option<PathBuf>) -> Result<Self> {
        let source = match source {
            Some(path) => path,
            None => config.get_active_profile()?.source.clone(),
        };
        Ok(Self::new(source, ViewParams::from_config(config)?, config.analysis.clone()))
    }

    /// Path of the transaction table.
    pub fn source(&self) -> &Path {
        self.cache.source().path()
    }

    /// Analysis settings.
    pub fn analysis_config(&self) -> &AnalysisConfig {
        &self.analysis
    }

    /// Load records, degrading to an empty dataset if the source is unavailable.
    pub fn dataset(&mut self) -> Dataset {
        match self.cache.get_or_load() {
            Ok(records) => Dataset {
                records,
                unavailable: None,
            },
            Err(e) => {
                tracing::warn!(source = %self.source().display(), error = %e, "Continuing with an empty dataset");
                Dataset {
                    records: Arc::new(Vec::new()),
                    unavailable: Some(e.to_string()),
                }
            }
        }
    }

    /// Apply command-line filter flags against the current data.
    pub fn apply(&mut self, args: &FilterArgs) -> Result<()> {
        let dataset = self.dataset();
        self.params.apply(args, &dataset.records)
    }

    /// Run the analysis pipeline with the current parameters.
    pub fn analyze(&mut self) -> Result<SessionReport> {
        let dataset = self.dataset();
        let request = self.params.request(&dataset.records);
        let report = analyze(&dataset.records, &request, &self.analysis)?;
        Ok(SessionReport { dataset, report })
    }

    /// Drop cached records so the next command re-reads the source.
    pub fn refresh(&mut self) {
        self.cache.invalidate();
    }

    /// Restore the parameters the session started with.
    pub fn reset(&mut self) {
        self.params = self.initial.clone();
    }

    /// Point the session at another source, keeping the current parameters.
    pub fn switch_source(&mut self, source: impl AsRef<Path>, home_bank: Option<String>) {
        self.cache = RecordCache::new(FileSource::new(source));
        self.params.home_bank = home_bank.clone();
        self.initial.home_bank = home_bank;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use txflow_domain::NodeKey;

    const CSV: &str = "\
type,debitor_name,debitor_bank,sender_recipient_name,sender_recipient_bank,amount_tx_idr,trx
OUTGOING,X,B1,Y,B2,100,1
INCOMING,X,B1,Z,B3,50,1
OUTGOING,Y,B2,Z,B3,200,1
";

    fn session(dir: &TempDir) -> Session {
        let path = dir.path().join("transactions.csv");
        fs::write(&path, CSV).unwrap();
        let params = ViewParams::from_config(&Config::default()).unwrap();
        Session::new(path, params, AnalysisConfig::default())
    }

    #[test]
    fn test_defaults_from_config() {
        let params = ViewParams::from_config(&Config::default()).unwrap();
        assert_eq!(params.top_n, 20);
        assert_eq!(params.metric, MetricKind::Degree);
        assert_eq!(params.node_size_factor, 300.0);
        assert_eq!(params.edge_width_factor, 1.0);
        assert!(params.types.is_none());
    }

    #[test]
    fn test_range_checks() {
        let mut params = ViewParams::from_config(&Config::default()).unwrap();
        assert!(params.set_top_n(4).is_err());
        assert!(params.set_top_n(1001).is_err());
        assert!(params.set_top_n(5).is_ok());
        assert!(params.set_node_size_factor(5.0).is_err());
        assert!(params.set_edge_width_factor(0.1).is_ok());
        assert!(params.set_edge_width_factor(f64::NAN).is_err());
    }

    #[test]
    fn test_default_view_spans_data() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);

        let result = session.analyze().unwrap();
        assert!(result.dataset.unavailable.is_none());
        assert_eq!(result.report.filtered.len(), 3);
        assert_eq!(result.report.graph.node_count(), 3);
    }

    #[test]
    fn test_apply_filter_flags() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);

        let args = FilterArgs {
            min_amount: Some(60.0),
            types: vec!["OUTGOING".to_string()],
            top_n: Some(5),
            ..Default::default()
        };
        session.apply(&args).unwrap();

        let range = session.params.amount_range.unwrap();
        assert_eq!((range.min, range.max), (60.0, 200.0));

        let result = session.analyze().unwrap();
        assert_eq!(result.report.filtered.len(), 2);
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        let args = FilterArgs {
            min_amount: Some(500.0),
            max_amount: Some(10.0),
            ..Default::default()
        };
        assert!(matches!(session.apply(&args), Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_missing_source_degrades_to_empty() {
        let dir = TempDir::new().unwrap();
        let params = ViewParams::from_config(&Config::default()).unwrap();
        let mut session = Session::new(dir.path().join("absent.csv"), params, AnalysisConfig::default());

        let result = session.analyze().unwrap();
        assert!(result.dataset.records.is_empty());
        assert!(result
            .dataset
            .unavailable
            .as_deref()
            .is_some_and(|m| m.starts_with("Data unavailable")));
        assert!(result.report.ranked.is_empty());
    }

    #[test]
    fn test_reset_restores_initial() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        session.params.metric = MetricKind::PageRank;
        session.params.banks.insert("B1".to_string());

        session.reset();
        assert_eq!(session.params.metric, MetricKind::Degree);
        assert!(session.params.banks.is_empty());
    }

    #[test]
    fn test_refresh_rereads_source() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        assert_eq!(session.dataset().records.len(), 3);

        let path = session.source().to_path_buf();
        fs::write(&path, format!("{}OUTGOING,W,B4,X,B1,10,1\n", CSV)).unwrap();
        assert_eq!(session.dataset().records.len(), 3);

        session.refresh();
        let records = session.dataset().records;
        assert_eq!(records.len(), 4);
        assert_eq!(records[3].debitor_key(), NodeKey::new("W", "B4"));
    }
}
