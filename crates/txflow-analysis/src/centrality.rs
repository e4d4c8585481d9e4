//! Structural centrality algorithms over the simple directed projection
//!
//! All functions return one score per node, indexed like the originating
//! graph's node order.

use crate::config::PageRankConfig;
use crate::graph::Structure;
use std::collections::VecDeque;

/// Which neighbours a degree count considers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DegreeMode {
    /// Distinct neighbours in either direction
    Both,
    /// Distinct predecessors
    In,
    /// Distinct successors
    Out,
}

/// Normalized degree centrality (neighbour count / (n - 1))
///
/// Graphs with at most one node score zero everywhere.
pub(crate) fn degree_centrality(structure: &Structure, mode: DegreeMode) -> Vec<f64> {
    let n = structure.len();
    if n <= 1 {
        return vec![0.0; n];
    }

    let normalizer = (n - 1) as f64;
    (0..n)
        .map(|v| {
            let count = match mode {
                DegreeMode::Both => structure.neighbour_count(v),
                DegreeMode::In => structure.predecessors[v].len(),
                DegreeMode::Out => structure.successors[v].len(),
            };
            count as f64 / normalizer
        })
        .collect()
}

/// Brandes betweenness centrality, normalized by 1 / ((n - 1)(n - 2)) when n > 2
///
/// Each BFS runs forward over successors, then dependencies are accumulated
/// in a single backward pass.
pub(crate) fn betweenness_centrality(structure: &Structure) -> Vec<f64> {
    let n = structure.len();
    let mut centrality = vec![0.0f64; n];

    for s in 0..n {
        let mut stack: Vec<usize> = Vec::with_capacity(n);
        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut sigma = vec![0.0f64; n];
        let mut dist = vec![-1i64; n];

        sigma[s] = 1.0;
        dist[s] = 0;

        let mut queue = VecDeque::new();
        queue.push_back(s);

        while let Some(v) = queue.pop_front() {
            stack.push(v);

            for &w in &structure.successors[v] {
                if dist[w] < 0 {
                    dist[w] = dist[v] + 1;
                    queue.push_back(w);
                }

                if dist[w] == dist[v] + 1 {
                    sigma[w] += sigma[v];
                    predecessors[w].push(v);
                }
            }
        }

        let mut delta = vec![0.0f64; n];
        while let Some(w) = stack.pop() {
            for &v in &predecessors[w] {
                delta[v] += (sigma[v] / sigma[w]) * (1.0 + delta[w]);
            }
            if w != s {
                centrality[w] += delta[w];
            }
        }
    }

    if n > 2 {
        let scale = 1.0 / ((n - 1) * (n - 2)) as f64;
        for c in &mut centrality {
            *c *= scale;
        }
    }

    centrality
}

/// Result of a PageRank run
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PageRankOutcome {
    /// Score per node; sums to 1 for a non-empty graph
    pub scores: Vec<f64>,

    /// Iterations performed
    pub iterations: u32,

    /// Whether the tolerance was reached before the iteration cap
    pub converged: bool,
}

/// PageRank by power iteration with uniform teleport
///
/// Rank held by nodes without successors is spread uniformly over all nodes,
/// so the scores keep summing to 1. Callers pass a projection that keeps
/// self-loops.
pub(crate) fn pagerank(structure: &Structure, config: &PageRankConfig) -> PageRankOutcome {
    let n = structure.len();
    if n == 0 {
        return PageRankOutcome {
            scores: Vec::new(),
            iterations: 0,
            converged: true,
        };
    }

    let nf = n as f64;
    let damping = config.damping;
    let mut scores = vec![1.0 / nf; n];

    for iteration in 1..=config.max_iterations {
        let dangling: f64 = (0..n)
            .filter(|&v| structure.successors[v].is_empty())
            .map(|v| scores[v])
            .sum();

        let base = (1.0 - damping) / nf + damping * dangling / nf;
        let mut next = vec![base; n];

        for (u, successors) in structure.successors.iter().enumerate() {
            if successors.is_empty() {
                continue;
            }
            let share = damping * scores[u] / successors.len() as f64;
            for &v in successors {
                next[v] += share;
            }
        }

        let change: f64 = next.iter().zip(&scores).map(|(a, b)| (a - b).abs()).sum();
        scores = next;

        if change < nf * config.tolerance {
            return PageRankOutcome {
                scores,
                iterations: iteration,
                converged: true,
            };
        }
    }

    PageRankOutcome {
        scores,
        iterations: config.max_iterations,
        converged: false,
    }
}

/// Longest shortest path over the projection
///
/// `None` when the graph is empty or some node cannot reach another.
pub(crate) fn diameter(structure: &Structure) -> Option<usize> {
    let n = structure.len();
    if n == 0 {
        return None;
    }

    let mut longest = 0;
    for source in 0..n {
        let distances = bfs_distances(structure, source);
        for d in distances {
            longest = longest.max(d?);
        }
    }
    Some(longest)
}

fn bfs_distances(structure: &Structure, source: usize) -> Vec<Option<usize>> {
    let mut distances = vec![None; structure.len()];
    distances[source] = Some(0);

    let mut queue = VecDeque::new();
    queue.push_back(source);

    while let Some(v) = queue.pop_front() {
        let next = distances[v].map_or(0, |d| d + 1);
        for &w in &structure.successors[v] {
            if distances[w].is_none() {
                distances[w] = Some(next);
                queue.push_back(w);
            }
        }
    }

    distances
}
