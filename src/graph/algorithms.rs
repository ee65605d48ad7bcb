//! Degree analysis

use crate::graph::{GraphNode, NodeIndex};
use serde::{Deserialize, Serialize};

/// Aggregate degree figures over the whole graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DegreeStats {
    pub min: u32,
    pub max: u32,
    pub average: f64,
}

/// Write each node's degree and return the aggregate figures.
///
/// An edge adds 1 to its source and 1 to its target, so self-loops count twice
/// and duplicate edges are counted every time they occur.
pub fn compute_degrees(nodes: &mut [GraphNode], endpoints: &[(NodeIndex, NodeIndex)]) -> DegreeStats {
    let degrees = count_degrees(nodes.len(), endpoints);

    for (node, &degree) in nodes.iter_mut().zip(&degrees) {
        node.degree = degree;
    }

    degree_stats(&degrees)
}

/// Per-node endpoint counts
pub fn count_degrees(node_count: usize, endpoints: &[(NodeIndex, NodeIndex)]) -> Vec<u32> {
    let mut degrees = vec![0u32; node_count];
    for &(src, dst) in endpoints {
        degrees[src as usize] += 1;
        degrees[dst as usize] += 1;
    }
    degrees
}

/// Min, max and mean of a degree sequence; all zero for an empty graph
pub fn degree_stats(degrees: &[u32]) -> DegreeStats {
    if degrees.is_empty() {
        log::warn!("Degree statistics requested for an empty graph");
        return DegreeStats::default();
    }

    let (min, max) = degrees
        .iter()
        .fold((u32::MAX, 0), |(lo, hi), &d| (lo.min(d), hi.max(d)));

    let values: Vec<f64> = degrees.iter().map(|&d| f64::from(d)).collect();

    DegreeStats {
        min,
        max,
        average: mean(&values),
    }
}

fn mean(values: &[f64]) -> f64 {
    use statrs::statistics::Statistics;
    values.mean()
}
