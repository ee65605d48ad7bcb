//! Lookups over a built comment graph

use crate::graph::{CommentGraph, CompressedAdjacency, GraphNode, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A node subset with the edge positions that belong to it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subgraph {
    pub nodes: Vec<NodeIndex>,
    pub edges: Vec<usize>,
}

/// First node, in node order, whose display name contains `query` (case-insensitive)
pub fn search_by_name<'g>(graph: &'g CommentGraph, query: &str) -> Option<&'g GraphNode> {
    let needle = query.to_lowercase();
    graph
        .nodes()
        .iter()
        .find(|node| node.name.to_lowercase().contains(&needle))
}

/// Nodes with `min <= degree <= max` and the edges whose both endpoints survive
pub fn filter_by_degree(graph: &CommentGraph, min: u32, max: u32) -> Subgraph {
    let pass_filter: Vec<bool> = graph
        .nodes()
        .iter()
        .map(|node| node.degree >= min && node.degree <= max)
        .collect();

    let nodes = (0..graph.node_count() as NodeIndex)
        .filter(|&idx| pass_filter[idx as usize])
        .collect();

    // Only include edges where both endpoints pass the filter
    let edges = graph
        .endpoints()
        .iter()
        .enumerate()
        .filter(|(_, &(src, dst))| pass_filter[src as usize] && pass_filter[dst as usize])
        .map(|(pos, _)| pos)
        .collect();

    Subgraph { nodes, edges }
}

/// Every neighbour of a node with the connecting edges, in edge order
pub fn direct_connections(graph: &CommentGraph, id: &str) -> Option<Subgraph> {
    let center = graph.index_of(id)?;
    let mut connections = Subgraph::default();

    for (pos, &(src, dst)) in graph.endpoints().iter().enumerate() {
        let neighbour = if src == center {
            dst
        } else if dst == center {
            src
        } else {
            continue;
        };
        connections.nodes.push(neighbour);
        connections.edges.push(pos);
    }

    Some(connections)
}

/// All nodes reachable from `id` ignoring edge direction, in breadth-first order
pub fn connected_component(graph: &CommentGraph, id: &str) -> Option<Vec<NodeIndex>> {
    let start = graph.index_of(id)?;
    let adjacency = CompressedAdjacency::undirected(graph.node_count(), graph.endpoints());

    let mut visited = vec![false; graph.node_count()];
    let mut order = Vec::new();
    let mut queue = VecDeque::from([start]);
    visited[start as usize] = true;

    while let Some(node) = queue.pop_front() {
        order.push(node);
        for &next in adjacency.neighbors(node) {
            if !visited[next as usize] {
                visited[next as usize] = true;
                queue.push_back(next);
            }
        }
    }

    Some(order)
}
