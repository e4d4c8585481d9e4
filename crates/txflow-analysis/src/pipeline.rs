//! One full analysis pass: filter, build, score, rank, induce

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::graph::TransactionGraph;
use crate::metrics::{score_with, MetricScores};
use crate::overview::NetworkOverview;
use crate::rank::{induced_subgraph, rank, RankedEntity};
use txflow_domain::{filter, FilterCriteria, MetricKind, TransactionRecord};

/// What to analyze and how to rank it
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    /// Record filter
    pub criteria: FilterCriteria,

    /// Ranking metric
    pub metric: MetricKind,

    /// Leaderboard size
    pub top_n: usize,
}

impl AnalysisRequest {
    /// A request that admits every record of `records`
    pub fn permissive(records: &[TransactionRecord], metric: MetricKind, top_n: usize) -> Self {
        Self {
            criteria: FilterCriteria::permissive(records),
            metric,
            top_n,
        }
    }
}

/// Everything one pass produces
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// Records that passed the filter
    pub filtered: Vec<TransactionRecord>,

    /// Graph of the filtered records
    pub graph: TransactionGraph,

    /// Summary of `graph`
    pub overview: NetworkOverview,

    /// Metric scores over `graph`
    pub scores: MetricScores,

    /// Leaderboard
    pub ranked: Vec<RankedEntity>,

    /// Subgraph induced by the leaderboard
    pub subgraph: TransactionGraph,
}

/// Run a full pass over `records`
///
/// # Errors
///
/// [`AnalysisError::InvalidParameter`] for an invalid amount range or
/// PageRank settings. An empty input is not an error and yields an empty
/// report.
///
/// # Examples
///
/// ```
/// use txflow_analysis::{analyze, AnalysisConfig, AnalysisRequest};
/// use txflow_domain::{MetricKind, NodeKey, TransactionRecord};
///
/// let records = vec![
///     TransactionRecord::new(NodeKey::new("X", "B1"), NodeKey::new("Y", "B2"), 100.0, "1", "OUTGOING"),
///     TransactionRecord::new(NodeKey::new("X", "B1"), NodeKey::new("Z", "B3"), 50.0, "1", "INCOMING"),
/// ];
/// let request = AnalysisRequest::permissive(&records, MetricKind::TotalValue, 1);
///
/// let report = analyze(&records, &request, &AnalysisConfig::default()).unwrap();
/// assert_eq!(report.ranked[0].node, NodeKey::new("X", "B1"));
/// ```
pub fn analyze(
    records: &[TransactionRecord],
    request: &AnalysisRequest,
    config: &AnalysisConfig,
) -> Result<AnalysisReport, AnalysisError> {
    let range = request.criteria.amount_range;
    if !range.is_valid() {
        return Err(AnalysisError::InvalidParameter(format!(
            "amount range [{}, {}] is empty or not a number",
            range.min, range.max
        )));
    }
    config.validate()?;

    let filtered = filter(records, &request.criteria);
    tracing::debug!(input = records.len(), kept = filtered.len(), "Filtered records");

    let graph = TransactionGraph::from_records(&filtered);
    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Built transaction graph"
    );

    let overview = NetworkOverview::of(&graph);
    let scores = score_with(&graph, request.metric, &config.pagerank());
    let ranked = rank(&scores, request.top_n);
    let subgraph = induced_subgraph(&graph, &ranked);

    tracing::info!(
        metric = request.metric.as_str(),
        records = filtered.len(),
        nodes = graph.node_count(),
        ranked = ranked.len(),
        subgraph_edges = subgraph.edge_count(),
        "Analysis complete"
    );

    Ok(AnalysisReport {
        filtered,
        graph,
        overview,
        scores,
        ranked,
        subgraph,
    })
}
