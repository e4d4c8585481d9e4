//! Metric selection module

use std::fmt;

/// The node-level score used to rank entities
///
/// Each variant maps to exactly one scoring function in `txflow-analysis`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    /// Distinct counterparties in either direction, normalized by `|V| - 1`
    Degree,

    /// Distinct senders, normalized by `|V| - 1`
    InDegree,

    /// Distinct recipients, normalized by `|V| - 1`
    OutDegree,

    /// Share of shortest paths passing through the node
    Betweenness,

    /// Stationary distribution of a damped random walk
    PageRank,

    /// Sum of incoming and outgoing transaction amounts
    TotalValue,
}

impl MetricKind {
    /// Every metric, in menu order
    pub const ALL: [MetricKind; 6] = [
        MetricKind::Degree,
        MetricKind::InDegree,
        MetricKind::OutDegree,
        MetricKind::Betweenness,
        MetricKind::PageRank,
        MetricKind::TotalValue,
    ];

    /// Short machine-friendly name
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Degree => "degree",
            MetricKind::InDegree => "in-degree",
            MetricKind::OutDegree => "out-degree",
            MetricKind::Betweenness => "betweenness",
            MetricKind::PageRank => "pagerank",
            MetricKind::TotalValue => "total-value",
        }
    }

    /// Human-readable name used in reports
    pub fn display_name(&self) -> &'static str {
        match self {
            MetricKind::Degree => "Degree Centrality",
            MetricKind::InDegree => "In-Degree Centrality",
            MetricKind::OutDegree => "Out-Degree Centrality",
            MetricKind::Betweenness => "Betweenness Centrality",
            MetricKind::PageRank => "PageRank",
            MetricKind::TotalValue => "Total Transaction Value",
        }
    }

    /// What the metric measures
    pub fn description(&self) -> &'static str {
        match self {
            MetricKind::Degree => "Measures the number of direct connections each entity has",
            MetricKind::InDegree => "Measures the incoming transactions received by each entity",
            MetricKind::OutDegree => "Measures the outgoing transactions sent by each entity",
            MetricKind::Betweenness => {
                "Measures how often an entity lies on the shortest path between other entities"
            }
            MetricKind::PageRank => {
                "Measures the importance of an entity from the structure of its connections"
            }
            MetricKind::TotalValue => {
                "Measures the total transaction value (incoming and outgoing) of each entity"
            }
        }
    }

    /// How to read a high score
    pub fn interpretation(&self) -> &'static str {
        match self {
            MetricKind::Degree => "High values mark entities with many transaction connections",
            MetricKind::InDegree => "High values mark entities that receive transfers from many others",
            MetricKind::OutDegree => "High values mark entities that send transfers to many others",
            MetricKind::Betweenness => {
                "High values mark entities that act as important intermediaries in the network"
            }
            MetricKind::PageRank => "High values mark entities connected to other important entities",
            MetricKind::TotalValue => "High values mark entities moving large transaction volumes",
        }
    }

    /// Acquisition and retention guidance for top-ranked entities
    pub fn strategy(&self) -> &'static str {
        match self {
            MetricKind::Degree => {
                "Entities with high degree centrality are prime retention candidates because they hold many connections in the transaction network"
            }
            MetricKind::InDegree => {
                "Entities with high in-degree centrality are prime retention candidates because they receive many transactions"
            }
            MetricKind::OutDegree => {
                "Entities with high out-degree centrality are prime retention candidates because they actively transact with others"
            }
            MetricKind::Betweenness => {
                "Entities with high betweenness centrality are prime retention candidates because they broker flows across the network"
            }
            MetricKind::PageRank => {
                "Entities with high PageRank are prime retention candidates because they carry large influence in the network"
            }
            MetricKind::TotalValue => {
                "Entities with high total transaction value are prime retention candidates because they carry large business value"
            }
        }
    }

    /// Parse a metric name
    ///
    /// Accepts the short names (`degree`, `in-degree`, `pagerank`, ...) and the
    /// display names (`"Betweenness Centrality"`), ignoring case and treating
    /// spaces, dashes and underscores alike.
    pub fn parse(s: &str) -> Option<Self> {
        let folded: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect();
        let folded = folded.strip_suffix("centrality").unwrap_or(&folded);

        match folded {
            "degree" => Some(MetricKind::Degree),
            "indegree" | "in" => Some(MetricKind::InDegree),
            "outdegree" | "out" => Some(MetricKind::OutDegree),
            "betweenness" => Some(MetricKind::Betweenness),
            "pagerank" => Some(MetricKind::PageRank),
            "totalvalue" | "totaltransactionvalue" | "value" => Some(MetricKind::TotalValue),
            _ => None,
        }
    }

    /// Whether the metric depends on edge amounts rather than structure alone
    pub fn is_value_based(&self) -> bool {
        matches!(self, MetricKind::TotalValue)
    }
}

impl Default for MetricKind {
    fn default() -> Self {
        MetricKind::Degree
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl std::str::FromStr for MetricKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid metric: {}", s))
    }
}
