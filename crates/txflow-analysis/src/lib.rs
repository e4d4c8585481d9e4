//! txflow Analysis Engine
//!
//! Turns filtered transaction records into a directed multigraph and
//! answers "who matters" questions about it.
//!
//! # Pipeline
//!
//! 1. [`filter`](txflow_domain::filter) the records
//! 2. build a [`TransactionGraph`] (one edge per transaction)
//! 3. [`score`] every node under a [`MetricKind`](txflow_domain::MetricKind)
//! 4. [`rank`] the top N and take their [`induced_subgraph`]
//!
//! [`analyze`] runs all four steps. [`NetworkOverview`],
//! [`TransactionInsights`], [`Recommendations`] and [`RenderGraph`] build
//! reports on top of the result.
//!
//! Structural metrics (degree family, betweenness, PageRank, diameter) see
//! the graph as a simple directed graph: parallel edges collapse into one
//! connection and self-loops are ignored, except by PageRank, where a
//! self-loop is an ordinary outgoing link. Total value sums every edge.

#![warn(clippy::all)]

mod centrality;
mod config;
mod error;
mod graph;
mod insights;
mod metrics;
mod overview;
mod pipeline;
mod rank;
mod recommend;
mod render;

pub use config::{AnalysisConfig, PageRankConfig, MAX_HISTOGRAM_BINS};
pub use error::AnalysisError;
pub use graph::{AggregatedEdge, TransactionEdge, TransactionGraph};
pub use insights::{
    amount_histogram, top_transactions, type_distribution, HistogramBin, TransactionInsights,
    TypeCount,
};
pub use metrics::{score, score_with, MetricScores};
pub use overview::{Diameter, NetworkOverview};
pub use pipeline::{analyze, AnalysisReport, AnalysisRequest};
pub use rank::{induced_subgraph, rank, RankedEntity};
pub use recommend::{Recommendations, ACQUISITION_ACTIONS, RETENTION_ACTIONS, STRATEGIC_ACTIONS};
pub use render::{format_amount, RenderEdge, RenderGraph, RenderNode, RenderOptions};
