//! Whole-network summary statistics

use crate::centrality;
use crate::graph::TransactionGraph;
use std::fmt;

/// Longest shortest path of a graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diameter {
    /// Every node reaches every other node within this many hops
    Finite(usize),

    /// The graph is empty or not strongly connected
    NotApplicable,
}

impl fmt::Display for Diameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diameter::Finite(d) => write!(f, "{}", d),
            Diameter::NotApplicable => write!(f, "N/A (disconnected)"),
        }
    }
}

/// Size and shape of a transaction graph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkOverview {
    /// Number of nodes
    pub node_count: usize,

    /// Number of transaction edges
    pub transaction_count: usize,

    /// Number of distinct directed connections between different nodes
    pub connection_count: usize,

    /// `connection_count / (n (n - 1))`, 0 for graphs with fewer than two nodes
    pub density: f64,

    /// Diameter of the directed projection
    pub diameter: Diameter,
}

impl NetworkOverview {
    /// Summarize `graph`
    pub fn of(graph: &TransactionGraph) -> Self {
        let structure = graph.structure();
        let n = structure.len();
        let connection_count = structure.connection_count();

        let density = if n < 2 {
            0.0
        } else {
            connection_count as f64 / (n * (n - 1)) as f64
        };

        let diameter = match centrality::diameter(&structure) {
            Some(d) => Diameter::Finite(d),
            None => Diameter::NotApplicable,
        };

        Self {
            node_count: n,
            transaction_count: graph.edge_count(),
            connection_count,
            density,
            diameter,
        }
    }
}
