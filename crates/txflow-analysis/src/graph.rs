//! Transaction graph - a directed multigraph of money flow

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, HashSet};
use txflow_domain::{direct, DirectedEdgeFact, NodeKey, TransactionRecord};

/// Attributes carried by one transaction edge
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionEdge {
    /// Transaction amount in IDR
    pub amount_tx_idr: f64,

    /// Transaction count or identifier
    pub trx: String,

    /// Raw type value of the originating record
    pub tx_type: String,
}

/// All transactions between one ordered pair of nodes, summed
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedEdge {
    /// Node the money leaves
    pub source: NodeKey,

    /// Node the money arrives at
    pub target: NodeKey,

    /// Sum of amounts over the parallel edges
    pub total_amount: f64,

    /// Number of parallel edges
    pub transaction_count: usize,
}

/// Directed multigraph of transactions
///
/// Nodes are [`NodeKey`]s in order of first appearance. Every accepted
/// transaction is its own edge, so two transfers between the same pair of
/// counterparties show up as two parallel edges with their own attributes.
/// Value views ([`aggregated_edges`](Self::aggregated_edges)) sum across
/// parallel edges explicitly.
///
/// # Examples
///
/// ```
/// use txflow_analysis::TransactionGraph;
/// use txflow_domain::{NodeKey, TransactionRecord};
///
/// let records = vec![
///     TransactionRecord::new(NodeKey::new("X", "B1"), NodeKey::new("Y", "B2"), 100.0, "1", "OUTGOING"),
///     TransactionRecord::new(NodeKey::new("X", "B1"), NodeKey::new("Y", "B2"), 40.0, "2", "OUTGOING"),
///     TransactionRecord::new(NodeKey::new("X", "B1"), NodeKey::new("Q", "B9"), 1.0, "1", "FEE"),
/// ];
///
/// let graph = TransactionGraph::from_records(&records);
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 2);
/// assert_eq!(graph.aggregated_edges()[0].total_amount, 140.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TransactionGraph {
    graph: DiGraph<NodeKey, TransactionEdge>,
    index: HashMap<NodeKey, NodeIndex>,
}

impl TransactionGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold directed edge facts into a graph, one edge per fact
    pub fn build<I>(facts: I) -> Self
    where
        I: IntoIterator<Item = DirectedEdgeFact>,
    {
        let mut graph = Self::new();
        for fact in facts {
            let edge = TransactionEdge {
                amount_tx_idr: fact.amount_tx_idr,
                trx: fact.trx,
                tx_type: fact.tx_type,
            };
            graph.insert_edge(fact.source, fact.target, edge);
        }
        graph
    }

    /// Direct every record and build the graph, skipping records without a direction
    pub fn from_records(records: &[TransactionRecord]) -> Self {
        Self::build(records.iter().filter_map(direct))
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of transaction edges (parallel edges counted individually)
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Whether `key` is a node of the graph
    pub fn contains(&self, key: &NodeKey) -> bool {
        self.index.contains_key(key)
    }

    /// Nodes in order of first appearance
    pub fn nodes(&self) -> impl Iterator<Item = &NodeKey> + '_ {
        self.graph.node_weights()
    }

    /// Every transaction edge as `(source, target, attributes)`, in insertion order
    pub fn edges(&self) -> impl Iterator<Item = (&NodeKey, &NodeKey, &TransactionEdge)> + '_ {
        self.graph
            .edge_references()
            .map(move |e| (&self.graph[e.source()], &self.graph[e.target()], e.weight()))
    }

    /// Edges arriving at `key`
    pub fn in_edges(&self, key: &NodeKey) -> Vec<&TransactionEdge> {
        self.edges_directed(key, Direction::Incoming)
    }

    /// Edges leaving `key`
    pub fn out_edges(&self, key: &NodeKey) -> Vec<&TransactionEdge> {
        self.edges_directed(key, Direction::Outgoing)
    }

    /// Number of incident edges, parallel edges included; a self-loop counts twice
    pub fn degree(&self, key: &NodeKey) -> usize {
        self.in_edges(key).len() + self.out_edges(key).len()
    }

    /// Number of distinct ordered pairs `(u, v)` with `u != v` joined by at least one edge
    pub fn connection_count(&self) -> usize {
        self.structure().connection_count()
    }

    /// Parallel edges summed per ordered pair, in order of the pair's first transaction
    pub fn aggregated_edges(&self) -> Vec<AggregatedEdge> {
        let mut position: HashMap<(NodeIndex, NodeIndex), usize> = HashMap::new();
        let mut aggregated: Vec<AggregatedEdge> = Vec::new();

        for edge in self.graph.edge_references() {
            let pair = (edge.source(), edge.target());
            let slot = *position.entry(pair).or_insert_with(|| {
                aggregated.push(AggregatedEdge {
                    source: self.graph[pair.0].clone(),
                    target: self.graph[pair.1].clone(),
                    total_amount: 0.0,
                    transaction_count: 0,
                });
                aggregated.len() - 1
            });

            aggregated[slot].total_amount += edge.weight().amount_tx_idr;
            aggregated[slot].transaction_count += 1;
        }

        aggregated
    }

    /// Subgraph induced by `keys`
    ///
    /// Nodes follow the order of `keys` (unknown keys are ignored, isolated
    /// ones kept); edges are the edges of `self` with both endpoints in the
    /// set, in their original order.
    pub fn induced<'a, I>(&self, keys: I) -> TransactionGraph
    where
        I: IntoIterator<Item = &'a NodeKey>,
    {
        let mut subgraph = TransactionGraph::new();
        for key in keys {
            if self.contains(key) {
                subgraph.insert_node(key.clone());
            }
        }

        for (source, target, edge) in self.edges() {
            if subgraph.contains(source) && subgraph.contains(target) {
                subgraph.insert_edge(source.clone(), target.clone(), edge.clone());
            }
        }

        subgraph
    }

    /// Simple directed projection used by the structural metrics
    pub(crate) fn structure(&self) -> Structure {
        self.project(false)
    }

    /// Directed projection that keeps self-loops, used by PageRank
    ///
    /// A node whose only outgoing link points to itself keeps its rank
    /// instead of being treated as dangling.
    pub(crate) fn link_structure(&self) -> Structure {
        self.project(true)
    }

    fn project(&self, keep_self_loops: bool) -> Structure {
        let n = self.graph.node_count();
        let mut successors = vec![Vec::new(); n];
        let mut predecessors = vec![Vec::new(); n];
        let mut seen: HashSet<(usize, usize)> = HashSet::new();

        for edge in self.graph.edge_references() {
            let (u, v) = (edge.source().index(), edge.target().index());
            if (keep_self_loops || u != v) && seen.insert((u, v)) {
                successors[u].push(v);
                predecessors[v].push(u);
            }
        }

        Structure {
            successors,
            predecessors,
        }
    }

    fn edges_directed(&self, key: &NodeKey, direction: Direction) -> Vec<&TransactionEdge> {
        match self.index.get(key) {
            Some(&idx) => self
                .graph
                .edges_directed(idx, direction)
                .map(|e| e.weight())
                .collect(),
            None => Vec::new(),
        }
    }

    fn insert_node(&mut self, key: NodeKey) -> NodeIndex {
        if let Some(&idx) = self.index.get(&key) {
            return idx;
        }
        let idx = self.graph.add_node(key.clone());
        self.index.insert(key, idx);
        idx
    }

    fn insert_edge(&mut self, source: NodeKey, target: NodeKey, edge: TransactionEdge) {
        let from = self.insert_node(source);
        let to = self.insert_node(target);
        self.graph.add_edge(from, to, edge);
    }
}

/// Unweighted directed adjacency without parallel edges
///
/// Self-loops are dropped except in [`TransactionGraph::link_structure`].
/// Node `i` is the `i`-th node of the originating graph.
#[derive(Debug, Clone)]
pub(crate) struct Structure {
    pub(crate) successors: Vec<Vec<usize>>,
    pub(crate) predecessors: Vec<Vec<usize>>,
}

impl Structure {
    pub(crate) fn len(&self) -> usize {
        self.successors.len()
    }

    pub(crate) fn connection_count(&self) -> usize {
        self.successors.iter().map(Vec::len).sum()
    }

    /// Distinct neighbours in either direction
    pub(crate) fn neighbour_count(&self, v: usize) -> usize {
        let mut neighbours: HashSet<usize> = self.successors[v].iter().copied().collect();
        neighbours.extend(self.predecessors[v].iter().copied());
        neighbours.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_empty_graph() {
        let graph = TransactionGraph::build(Vec::new());
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.connection_count(), 0);
        assert!(graph.aggregated_edges().is_empty());
    }

    #[test]
    fn test_parallel_edges_stay_distinct() {
        let graph = TransactionGraph::build(vec![fact("A", "B", 10.0), fact("A", "B", 5.0)]);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.connection_count(), 1);

        let amounts: Vec<f64> = graph.out_edges(&key("A")).iter().map(|e| e.amount_tx_idr).collect();
        assert_eq!(amounts.len(), 2);
        assert!(amounts.contains(&10.0) && amounts.contains(&5.0));
    }

    #[test]
    fn test_node_order_is_first_appearance() {
        let graph = TransactionGraph::build(vec![fact("C", "A", 1.0), fact("B", "C", 1.0)]);
        let nodes: Vec<&NodeKey> = graph.nodes().collect();
        assert_eq!(nodes, vec![&key("C"), &key("A"), &key("B")]);
    }

    #[test]
    fn test_every_endpoint_is_a_node() {
        let graph = TransactionGraph::build(vec![fact("A", "B", 1.0), fact("B", "C", 1.0)]);
        for (source, target, _) in graph.edges() {
            assert!(graph.contains(source));
            assert!(graph.contains(target));
        }
    }

    #[test]
    fn test_aggregated_edges_sum_parallel() {
        let graph = TransactionGraph::build(vec![
            fact("A", "B", 10.0),
            fact("B", "A", 1.0),
            fact("A", "B", 5.0),
        ]);

        let aggregated = graph.aggregated_edges();
        assert_eq!(aggregated.len(), 2);
        assert_eq!(aggregated[0].source, key("A"));
        assert_eq!(aggregated[0].total_amount, 15.0);
        assert_eq!(aggregated[0].transaction_count, 2);
        assert_eq!(aggregated[1].total_amount, 1.0);
    }

    #[test]
    fn test_self_loop_degree() {
        let graph = TransactionGraph::build(vec![fact("A", "A", 3.0)]);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.degree(&key("A")), 2);
        assert_eq!(graph.connection_count(), 0);
    }

    #[test]
    fn test_structure_drops_parallel_and_loops() {
        let graph = TransactionGraph::build(vec![
            fact("A", "B", 1.0),
            fact("A", "B", 2.0),
            fact("B", "B", 2.0),
            fact("B", "A", 2.0),
        ]);
        let structure = graph.structure();
        assert_eq!(structure.successors, vec![vec![1], vec![0]]);
        assert_eq!(structure.predecessors, vec![vec![1], vec![0]]);
        assert_eq!(structure.neighbour_count(0), 1);
    }

    #[test]
    fn test_link_structure_keeps_loops() {
        let graph = TransactionGraph::build(vec![
            fact("A", "B", 1.0),
            fact("B", "B", 2.0),
            fact("B", "B", 3.0),
        ]);
        let links = graph.link_structure();
        assert_eq!(links.successors, vec![vec![1], vec![1]]);
        assert_eq!(links.predecessors, vec![vec![], vec![0, 1]]);
    }

    #[test]
    fn test_induced_keeps_inner_edges_only() {
        let graph = TransactionGraph::build(vec![
            fact("A", "B", 1.0),
            fact("B", "C", 2.0),
            fact("C", "A", 3.0),
            fact("A", "B", 4.0),
        ]);

        let subgraph = graph.induced([&key("B"), &key("A"), &key("Z")]);
        assert_eq!(subgraph.nodes().collect::<Vec<_>>(), vec![&key("B"), &key("A")]);
        assert_eq!(subgraph.edge_count(), 2);
        assert!(subgraph.edges().all(|(s, t, _)| *s != key("C") && *t != key("C")));
    }
}
