//! Cluster rankings

use crate::cluster::{IsolatedNodes, LinearClusters, RadialClusters};
use crate::graph::{CommentGraph, NodeIndex};
use serde::{Deserialize, Serialize};

/// A radial center with the size of its neighbourhood
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadialRank {
    pub center: NodeIndex,
    pub child_count: usize,
}

/// A chain with its node count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainRank {
    pub nodes: Vec<NodeIndex>,
    pub length: usize,
}

/// Leaderboards for the three cluster shapes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rankings {
    /// Centers by child count, highest first
    pub radial: Vec<RadialRank>,

    /// Chains by length, longest first
    pub linear: Vec<ChainRank>,

    /// Isolated nodes by likes, most liked first
    pub isolated: Vec<NodeIndex>,
}

/// Rank detected clusters; ties keep detection order
pub fn rank_clusters(
    graph: &CommentGraph,
    radial: &RadialClusters,
    linear: &LinearClusters,
    isolated: &IsolatedNodes,
) -> Rankings {
    let mut radial_ranks: Vec<RadialRank> = radial
        .clusters
        .iter()
        .map(|cluster| RadialRank {
            center: cluster.center,
            child_count: cluster.children.len(),
        })
        .collect();
    radial_ranks.sort_by(|a, b| b.child_count.cmp(&a.child_count));

    let mut chain_ranks: Vec<ChainRank> = linear
        .chains
        .iter()
        .map(|chain| ChainRank {
            nodes: chain.nodes.clone(),
            length: chain.len(),
        })
        .collect();
    chain_ranks.sort_by(|a, b| b.length.cmp(&a.length));

    let mut isolated_ranks = isolated.nodes.clone();
    isolated_ranks.sort_by(|&a, &b| graph.node(b).likes.cmp(&graph.node(a).likes));

    Rankings {
        radial: radial_ranks,
        linear: chain_ranks,
        isolated: isolated_ranks,
    }
}
