//! Compressed undirected adjacency view over the reply edges

use crate::graph::NodeIndex;

/// Compressed sparse row adjacency where every edge is listed from both ends.
///
/// Parallel edges and self-loops are kept, so a node's row length matches the
/// degree the analyzer assigns to it.
#[derive(Debug, Clone)]
pub struct CompressedAdjacency {
    /// Number of nodes in the graph
    pub node_count: usize,

    /// Offset array: offsets[i] to offsets[i+1] defines the row for node i
    pub offsets: Vec<u32>,

    /// Concatenated neighbour lists, in edge order within each row
    pub neighbors: Vec<NodeIndex>,
}

impl CompressedAdjacency {
    /// Build the undirected view of `endpoints` over `node_count` nodes
    pub fn undirected(node_count: usize, endpoints: &[(NodeIndex, NodeIndex)]) -> Self {
        let mut counts = vec![0u32; node_count];
        for &(src, dst) in endpoints {
            counts[src as usize] += 1;
            counts[dst as usize] += 1;
        }

        let mut offsets = Vec::with_capacity(node_count + 1);
        offsets.push(0);
        let mut offset = 0;
        for &count in &counts {
            offset += count;
            offsets.push(offset);
        }

        // Fill rows in edge order
        let mut neighbors = vec![0; offset as usize];
        let mut current_pos = vec![0u32; node_count];
        for &(src, dst) in endpoints {
            let (s, d) = (src as usize, dst as usize);

            neighbors[(offsets[s] + current_pos[s]) as usize] = dst;
            current_pos[s] += 1;

            neighbors[(offsets[d] + current_pos[d]) as usize] = src;
            current_pos[d] += 1;
        }

        Self {
            node_count,
            offsets,
            neighbors,
        }
    }

    /// Neighbours of a node
    pub fn neighbors(&self, node: NodeIndex) -> &[NodeIndex] {
        let start = self.offsets[node as usize] as usize;
        let end = self.offsets[node as usize + 1] as usize;
        &self.neighbors[start..end]
    }

    /// Length of a node's adjacency row
    pub fn row_len(&self, node: NodeIndex) -> usize {
        let start = self.offsets[node as usize] as usize;
        let end = self.offsets[node as usize + 1] as usize;
        end - start
    }
}
