//! Metric engine: one score per node for a chosen [`MetricKind`]

use crate::centrality::{self, DegreeMode};
use crate::config::PageRankConfig;
use crate::graph::TransactionGraph;
use std::collections::HashMap;
use txflow_domain::{MetricKind, NodeKey};

/// Scores of one metric over every node of a graph
///
/// Entries follow the graph's node order, which [`rank`](crate::rank) relies
/// on for tie-breaking.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricScores {
    kind: MetricKind,
    entries: Vec<(NodeKey, f64)>,
    index: HashMap<NodeKey, usize>,
}

impl MetricScores {
    fn new(kind: MetricKind, entries: Vec<(NodeKey, f64)>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, (key, _))| (key.clone(), i))
            .collect();
        Self {
            kind,
            entries,
            index,
        }
    }

    /// The metric these scores belong to
    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    /// Score of `key`, if it is a node of the scored graph
    pub fn get(&self, key: &NodeKey) -> Option<f64> {
        self.index.get(key).map(|&i| self.entries[i].1)
    }

    /// `(node, score)` pairs in node order
    pub fn iter(&self) -> impl Iterator<Item = (&NodeKey, f64)> + '_ {
        self.entries.iter().map(|(key, score)| (key, *score))
    }

    /// Number of scored nodes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no node was scored
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all scores
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, score)| score).sum()
    }
}

/// Score every node with default PageRank parameters
pub fn score(graph: &TransactionGraph, kind: MetricKind) -> MetricScores {
    score_with(graph, kind, &PageRankConfig::default())
}

/// Score every node, using `pagerank` when `kind` is [`MetricKind::PageRank`]
///
/// # Examples
///
/// ```
/// use txflow_analysis::{score, TransactionGraph};
/// use txflow_domain::{MetricKind, NodeKey, TransactionRecord};
///
/// let records = vec![
///     TransactionRecord::new(NodeKey::new("X", "B1"), NodeKey::new("Y", "B2"), 100.0, "1", "OUTGOING"),
/// ];
/// let graph = TransactionGraph::from_records(&records);
///
/// let value = score(&graph, MetricKind::TotalValue);
/// assert_eq!(value.get(&NodeKey::new("Y", "B2")), Some(100.0));
/// ```
pub fn score_with(
    graph: &TransactionGraph,
    kind: MetricKind,
    pagerank: &PageRankConfig,
) -> MetricScores {
    let values = match kind {
        MetricKind::Degree => centrality::degree_centrality(&graph.structure(), DegreeMode::Both),
        MetricKind::InDegree => centrality::degree_centrality(&graph.structure(), DegreeMode::In),
        MetricKind::OutDegree => centrality::degree_centrality(&graph.structure(), DegreeMode::Out),
        MetricKind::Betweenness => centrality::betweenness_centrality(&graph.structure()),
        MetricKind::PageRank => {
            let outcome = centrality::pagerank(&graph.link_structure(), pagerank);
            if !outcome.converged {
                tracing::warn!(
                    iterations = outcome.iterations,
                    "PageRank did not converge; using last iterate"
                );
            }
            outcome.scores
        }
        MetricKind::TotalValue => total_value(graph),
    };

    tracing::debug!(metric = kind.as_str(), nodes = values.len(), "Computed metric");

    let entries = graph.nodes().cloned().zip(values).collect();
    MetricScores::new(kind, entries)
}

/// Sum of amounts over every incident edge, parallel edges included
///
/// A self-loop is both an in-edge and an out-edge, so its amount counts twice.
fn total_value(graph: &TransactionGraph) -> Vec<f64> {
    graph
        .nodes()
        .map(|key| {
            let inflow: f64 = graph.in_edges(key).iter().map(|e| e.amount_tx_idr).sum();
            let outflow: f64 = graph.out_edges(key).iter().map(|e| e.amount_tx_idr).sum();
            inflow + outflow
        })
        .collect()
}
