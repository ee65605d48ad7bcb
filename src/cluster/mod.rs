//! Cluster analysis module

pub mod detection;
pub mod metrics;

use crate::graph::NodeIndex;
use serde::{Deserialize, Serialize};

/// A hub and its directly connected non-hub neighbours
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadialCluster {
    /// The hub node
    pub center: NodeIndex,

    /// Neighbours that are not themselves centers, in edge order
    pub children: Vec<NodeIndex>,

    /// Positions (in the graph's edge list) of the edges linking center and children
    pub edges: Vec<usize>,
}

/// Result of radial hub detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadialClusters {
    /// Degree a node had to reach to be a center
    pub threshold: f64,

    /// True when no node reached the threshold and the top-degree nodes were used
    pub fallback: bool,

    /// One entry per center, in center order
    pub clusters: Vec<RadialCluster>,
}

impl RadialClusters {
    pub fn centers(&self) -> Vec<NodeIndex> {
        self.clusters.iter().map(|c| c.center).collect()
    }

    /// Every edge linking a center to one of its children
    pub fn edges(&self) -> impl Iterator<Item = usize> + '_ {
        self.clusters.iter().flat_map(|c| c.edges.iter().copied())
    }
}

/// An approximate longest simple path inside one connected component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chain {
    /// Path nodes in order
    pub nodes: Vec<NodeIndex>,

    /// Positions of the edges joining consecutive path nodes
    pub edges: Vec<usize>,
}

impl Chain {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Result of linear chain detection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearClusters {
    /// Chains in component discovery order
    pub chains: Vec<Chain>,
}

/// Nodes without any edge
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IsolatedNodes {
    pub nodes: Vec<NodeIndex>,

    /// Edges touching an isolated node; empty unless degrees are inconsistent
    pub edges: Vec<usize>,
}
