//! Render export: a serializable node/edge document for graph front ends
//!
//! Cosmetic factors only shape this document; they never touch scores or
//! ranking.

use crate::graph::TransactionGraph;
use crate::metrics::MetricScores;
use serde::{Deserialize, Serialize};

/// Cosmetic settings for a render export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Node size scale, 300 renders base sizes unchanged
    pub node_size_factor: f64,

    /// Edge width scale applied to the amount share
    pub edge_width_factor: f64,

    /// Largest transaction amount in the loaded data
    pub max_amount: f64,

    /// Nodes at this bank are highlighted
    pub home_bank: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            node_size_factor: 300.0,
            edge_width_factor: 1.0,
            max_amount: 0.0,
            home_bank: None,
        }
    }
}

/// A node of the render document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderNode {
    /// `"name (bank)"`
    pub id: String,
    pub name: String,
    pub bank: String,
    /// Multigraph degree within the rendered subgraph
    pub degree: usize,
    /// Score under the ranking metric
    pub score: f64,
    pub size: f64,
    pub highlighted: bool,
    /// Hover text
    pub title: String,
}

/// An edge of the render document, one per transaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderEdge {
    pub source: String,
    pub target: String,
    pub amount_tx_idr: f64,
    #[serde(rename = "type")]
    pub tx_type: String,
    pub trx: String,
    pub width: f64,
    /// Hover text
    pub title: String,
}

/// Complete render document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderGraph {
    /// Slug of the metric the nodes were ranked by
    pub metric: String,
    pub directed: bool,
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
}

impl RenderGraph {
    /// Lay out `subgraph`, taking node scores from `scores`
    pub fn from_subgraph(
        subgraph: &TransactionGraph,
        scores: &MetricScores,
        options: &RenderOptions,
    ) -> Self {
        let nodes = subgraph
            .nodes()
            .map(|key| {
                let degree = subgraph.degree(key);
                let id = key.to_string();
                RenderNode {
                    title: format!("{}\nConnections: {}", id, degree),
                    id,
                    name: key.name.clone(),
                    bank: key.bank.clone(),
                    degree,
                    score: scores.get(key).unwrap_or(0.0),
                    size: node_size(degree, options.node_size_factor),
                    highlighted: options
                        .home_bank
                        .as_deref()
                        .is_some_and(|bank| key.is_at_bank(bank)),
                }
            })
            .collect();

        let edges = subgraph
            .edges()
            .map(|(source, target, edge)| RenderEdge {
                source: source.to_string(),
                target: target.to_string(),
                amount_tx_idr: edge.amount_tx_idr,
                tx_type: edge.tx_type.clone(),
                trx: edge.trx.clone(),
                width: edge_width(edge.amount_tx_idr, options.max_amount, options.edge_width_factor),
                title: format!(
                    "Amount: {} IDR\nType: {}",
                    format_amount(edge.amount_tx_idr),
                    edge.tx_type
                ),
            })
            .collect();

        Self {
            metric: scores.kind().as_str().to_string(),
            directed: true,
            nodes,
            edges,
        }
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn node_size(degree: usize, factor: f64) -> f64 {
    (10.0 + degree as f64 * 2.0) * factor / 300.0
}

fn edge_width(amount: f64, max_amount: f64, factor: f64) -> f64 {
    if max_amount <= 0.0 {
        return 2.0;
    }
    (1.0 + amount / max_amount * factor).max(2.0)
}

/// Format an amount with thousands separators and two decimals
///
/// ```
/// assert_eq!(txflow_analysis::format_amount(1234567.5), "1,234,567.50");
/// ```
pub fn format_amount(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, fraction)
}
