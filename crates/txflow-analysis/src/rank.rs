//! Ranking and the induced subgraph of the ranked nodes

use crate::graph::TransactionGraph;
use crate::metrics::MetricScores;
use txflow_domain::NodeKey;

/// A node with its metric score
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntity {
    /// The ranked node
    pub node: NodeKey,

    /// Its score under the ranking metric
    pub score: f64,
}

/// The `top_n` highest-scoring nodes, best first
///
/// The sort is stable, so equal scores keep the graph's node order.
/// Asking for more nodes than exist returns them all.
pub fn rank(scores: &MetricScores, top_n: usize) -> Vec<RankedEntity> {
    let mut ranked: Vec<RankedEntity> = scores
        .iter()
        .map(|(node, score)| RankedEntity {
            node: node.clone(),
            score,
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(top_n);
    ranked
}

/// Subgraph of `graph` restricted to the ranked nodes
///
/// Every ranked node is kept, isolated ones included; only edges whose both
/// endpoints are ranked survive.
pub fn induced_subgraph(graph: &TransactionGraph, ranked: &[RankedEntity]) -> TransactionGraph {
    graph.induced(ranked.iter().map(|entity| &entity.node))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::score;
    use txflow_domain::{DirectedEdgeFact, MetricKind};

    fn key(name: &str) -> NodeKey {
        NodeKey::new(name, "B1")
    }

    fn fact(source: &str, target: &str, amount: f64) -> DirectedEdgeFact {
        DirectedEdgeFact {
            source: key(source),
            target: key(target),
            amount_tx_idr: amount,
            trx: "1".to_string(),
            tx_type: "OUTGOING".to_string(),
        }
    }

    #[test]
    fn test_rank_orders_and_truncates() {
        let graph = TransactionGraph::build(vec![
            fact("A", "B", 1.0),
            fact("B", "C", 10.0),
            fact("C", "D", 100.0),
        ]);
        let scores = score(&graph, MetricKind::TotalValue);

        let ranked = rank(&scores, 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].node, key("C"));
        assert_eq!(ranked[0].score, 110.0);
        assert_eq!(ranked[1].node, key("D"));
    }

    #[test]
    fn test_rank_more_than_available() {
        let graph = TransactionGraph::build(vec![fact("A", "B", 1.0)]);
        let scores = score(&graph, MetricKind::Degree);
        assert_eq!(rank(&scores, 50).len(), 2);
        assert!(rank(&scores, 0).is_empty());
    }

    #[test]
    fn test_ties_keep_node_order() {
        // Both endpoints carry the same value
        let graph = TransactionGraph::build(vec![fact("P", "Q", 5.0)]);
        let ranked = rank(&score(&graph, MetricKind::TotalValue), 2);
        assert_eq!(ranked[0].node, key("P"));
        assert_eq!(ranked[1].node, key("Q"));
    }

    #[test]
    fn test_induced_subgraph_of_ranked() {
        let graph = TransactionGraph::build(vec![
            fact("A", "B", 50.0),
            fact("B", "C", 40.0),
            fact("C", "D", 1.0),
        ]);
        let ranked = rank(&score(&graph, MetricKind::TotalValue), 3);
        let subgraph = induced_subgraph(&graph, &ranked);

        assert_eq!(subgraph.node_count(), 3);
        assert!(!subgraph.contains(&key("D")));
        assert_eq!(subgraph.edge_count(), 2);
    }
}
