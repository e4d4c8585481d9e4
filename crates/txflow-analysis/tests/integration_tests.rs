//! Integration tests for txflow-analysis
//!
//! These tests run records through the public pipeline end to end.

use txflow_analysis::{
    analyze, induced_subgraph, rank, score, AnalysisConfig, AnalysisRequest, Diameter,
    NetworkOverview, Recommendations, RenderGraph, RenderOptions, TransactionGraph,
    TransactionInsights,
};
use txflow_domain::{AmountRange, FilterCriteria, MetricKind, NodeKey, TransactionRecord};

fn key(name: &str, bank: &str) -> NodeKey {
    NodeKey::new(name, bank)
}

fn record(
    debitor: &str,
    debitor_bank: &str,
    other: &str,
    other_bank: &str,
    amount: f64,
    tx_type: &str,
) -> TransactionRecord {
    TransactionRecord::new(
        key(debitor, debitor_bank),
        key(other, other_bank),
        amount,
        "1",
        tx_type,
    )
}

/// X -> Y 100, Z -> X 50, Y -> Z 200
fn triangle() -> Vec<TransactionRecord> {
    vec![
        record("X", "B1", "Y", "B2", 100.0, "OUTGOING"),
        record("X", "B1", "Z", "B3", 50.0, "INCOMING"),
        record("Y", "B2", "Z", "B3", 200.0, "OUTGOING"),
    ]
}

#[test]
fn test_end_to_end_total_value() {
    let records = triangle();
    let request = AnalysisRequest::permissive(&records, MetricKind::TotalValue, 3);
    let report = analyze(&records, &request, &AnalysisConfig::default()).unwrap();

    assert_eq!(report.graph.node_count(), 3);
    assert_eq!(report.graph.edge_count(), 3);

    let ranked: Vec<(String, f64)> = report
        .ranked
        .iter()
        .map(|r| (r.node.name.clone(), r.score))
        .collect();
    assert_eq!(
        ranked,
        vec![
            ("Y".to_string(), 300.0),
            ("Z".to_string(), 250.0),
            ("X".to_string(), 150.0),
        ]
    );
    assert_eq!(report.subgraph.edge_count(), 3);
    assert_eq!(report.overview.diameter, Diameter::Finite(2));
}

#[test]
fn test_incoming_points_at_debitor() {
    let records = vec![record("X", "B1", "Z", "B3", 50.0, "INCOMING")];
    let graph = TransactionGraph::from_records(&records);

    let (source, target, _) = graph.edges().next().unwrap();
    assert_eq!(source, &key("Z", "B3"));
    assert_eq!(target, &key("X", "B1"));
}

#[test]
fn test_unrecognized_types_do_not_count() {
    let mut records = triangle();
    let base = TransactionGraph::from_records(&records);

    records.push(record("Q", "B9", "R", "B9", 999.0, "REVERSAL"));
    let with_noise = TransactionGraph::from_records(&records);

    assert_eq!(base.node_count(), with_noise.node_count());
    assert_eq!(base.edge_count(), with_noise.edge_count());
}

#[test]
fn test_total_value_fixture() {
    // 4 nodes, 5 edges, one parallel pair
    let records = vec![
        record("A", "B1", "B", "B1", 10.0, "OUTGOING"),
        record("A", "B1", "B", "B1", 20.0, "OUTGOING"),
        record("B", "B1", "C", "B1", 5.0, "OUTGOING"),
        record("D", "B1", "C", "B1", 7.0, "INCOMING"),
        record("A", "B1", "D", "B1", 1.0, "INCOMING"),
    ];
    let graph = TransactionGraph::from_records(&records);
    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.edge_count(), 5);

    let scores = score(&graph, MetricKind::TotalValue);
    assert_eq!(scores.get(&key("A", "B1")), Some(31.0));
    assert_eq!(scores.get(&key("B", "B1")), Some(35.0));
    assert_eq!(scores.get(&key("C", "B1")), Some(12.0));
    assert_eq!(scores.get(&key("D", "B1")), Some(8.0));
}

#[test]
fn test_rank_ties_keep_first_appearance() {
    let records = vec![
        record("A", "B1", "B", "B1", 5.0, "OUTGOING"),
        record("C", "B1", "D", "B1", 3.0, "OUTGOING"),
        record("D", "B1", "C", "B1", 1.0, "OUTGOING"),
    ];
    let graph = TransactionGraph::from_records(&records);
    let scores = score(&graph, MetricKind::TotalValue);
    // A=5, B=5, C=4, D=4
    let ranked = rank(&scores, 3);

    let names: Vec<&str> = ranked.iter().map(|r| r.node.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
}

#[test]
fn test_degree_family_in_unit_interval() {
    let records = vec![
        record("A", "B1", "B", "B1", 1.0, "OUTGOING"),
        record("B", "B1", "A", "B1", 1.0, "OUTGOING"),
        record("A", "B1", "C", "B1", 1.0, "OUTGOING"),
        record("A", "B1", "C", "B1", 2.0, "OUTGOING"),
        record("C", "B1", "C", "B1", 2.0, "OUTGOING"),
    ];
    let graph = TransactionGraph::from_records(&records);

    for kind in [MetricKind::Degree, MetricKind::InDegree, MetricKind::OutDegree] {
        for (_, value) in score(&graph, kind).iter() {
            assert!((0.0..=1.0).contains(&value), "{:?} out of range: {}", kind, value);
        }
    }
}

#[test]
fn test_degree_zero_for_single_node() {
    let records = vec![record("A", "B1", "A", "B1", 1.0, "OUTGOING")];
    let graph = TransactionGraph::from_records(&records);
    assert_eq!(graph.node_count(), 1);

    for kind in [MetricKind::Degree, MetricKind::InDegree, MetricKind::OutDegree] {
        assert_eq!(score(&graph, kind).get(&key("A", "B1")), Some(0.0));
    }
}

#[test]
fn test_pagerank_sums_to_one() {
    let records = triangle();
    let graph = TransactionGraph::from_records(&records);
    let total = score(&graph, MetricKind::PageRank).total();
    assert!((total - 1.0).abs() < 1e-6);
}

#[test]
fn test_induced_subgraph_has_no_escaping_edges() {
    let records = vec![
        record("A", "B1", "B", "B1", 90.0, "OUTGOING"),
        record("B", "B1", "C", "B1", 80.0, "OUTGOING"),
        record("C", "B1", "D", "B1", 1.0, "OUTGOING"),
        record("D", "B1", "A", "B1", 1.0, "OUTGOING"),
    ];
    let graph = TransactionGraph::from_records(&records);
    let ranked = rank(&score(&graph, MetricKind::TotalValue), 3);
    let subgraph = induced_subgraph(&graph, &ranked);

    assert!(!subgraph.contains(&key("D", "B1")));
    for (source, target, _) in subgraph.edges() {
        assert!(ranked.iter().any(|r| &r.node == source));
        assert!(ranked.iter().any(|r| &r.node == target));
    }
}

#[test]
fn test_filters_flow_through() {
    let records = triangle();
    let request = AnalysisRequest {
        criteria: FilterCriteria::new(AmountRange::new(60.0, 1000.0), ["outgoing"], ["B2"]),
        metric: MetricKind::Degree,
        top_n: 10,
    };
    let report = analyze(&records, &request, &AnalysisConfig::default()).unwrap();

    assert_eq!(report.filtered.len(), 2);
    assert_eq!(report.graph.node_count(), 3);
    assert_eq!(report.overview.diameter, Diameter::NotApplicable);
}

#[test]
fn test_reports_on_empty_graph() {
    let graph = TransactionGraph::new();
    let overview = NetworkOverview::of(&graph);
    assert_eq!(overview.node_count, 0);

    let insights = TransactionInsights::of(&[], &AnalysisConfig::default());
    assert_eq!(insights.total_amount, 0.0);
    assert!(insights.histogram.is_empty());

    let scores = score(&graph, MetricKind::PageRank);
    let render = RenderGraph::from_subgraph(&graph, &scores, &RenderOptions::default());
    assert!(render.nodes.is_empty());
}

#[test]
fn test_recommendations_from_report() {
    let records = triangle();
    let request = AnalysisRequest::permissive(&records, MetricKind::TotalValue, 3);
    let report = analyze(&records, &request, &AnalysisConfig::default()).unwrap();

    let recs = Recommendations::partition(&report.ranked, "B1");
    assert_eq!(recs.retention.len(), 1);
    assert_eq!(recs.retention[0].node, key("X", "B1"));
    assert_eq!(recs.acquisition.len(), 2);
}
