//! Comment graph storage: nodes in an index arena plus the reply edges

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stable position of a node inside a [`CommentGraph`]
pub type NodeIndex = u32;

/// One comment (or placeholder) in the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Comment id as a string
    pub id: String,

    /// Author display name
    pub name: String,

    /// Comment body
    pub content: String,

    /// Like count
    pub likes: u64,

    /// Reply time in seconds since the epoch, 0 when unknown
    pub time: i64,

    /// False when the reply time could not be parsed (or for placeholders)
    pub time_known: bool,

    /// Number of edge endpoints at this node
    pub degree: u32,

    /// True iff the comment was top level
    pub root: bool,
}

impl GraphNode {
    /// Synthesized node for an edge endpoint with no comment record
    pub fn placeholder(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            content: String::new(),
            likes: 0,
            time: 0,
            time_known: false,
            degree: 0,
            root: false,
        }
    }
}

/// Reply relationship from parent to child
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Parent comment id
    pub source: String,

    /// Reply comment id
    pub target: String,

    /// Always 1
    pub value: u32,
}

impl GraphEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            value: 1,
        }
    }
}

/// Full node and edge set of one analysis run.
///
/// Serializes as the `{ nodes, edges }` snapshot consumed by renderers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CommentGraph {
    pub(crate) nodes: Vec<GraphNode>,
    pub(crate) edges: Vec<GraphEdge>,

    /// Nodes backed by a comment; placeholders are stored after them
    #[serde(skip)]
    pub(crate) explicit_nodes: usize,

    #[serde(skip)]
    pub(crate) id_to_index: HashMap<String, NodeIndex>,

    /// Resolved (source, target) indices, parallel to `edges`
    #[serde(skip)]
    pub(crate) endpoints: Vec<(NodeIndex, NodeIndex)>,
}

impl CommentGraph {
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Resolved endpoints of every edge, in edge order
    pub fn endpoints(&self) -> &[(NodeIndex, NodeIndex)] {
        &self.endpoints
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of synthesized placeholder nodes
    pub fn placeholder_count(&self) -> usize {
        self.nodes.len() - self.explicit_nodes
    }

    /// True if the node was synthesized for a missing comment
    pub fn is_placeholder(&self, index: NodeIndex) -> bool {
        index as usize >= self.explicit_nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, index: NodeIndex) -> &GraphNode {
        &self.nodes[index as usize]
    }

    /// Look up a node index by comment id
    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.id_to_index.get(id).copied()
    }

    /// Look up a node by comment id
    pub fn get(&self, id: &str) -> Option<&GraphNode> {
        self.index_of(id).map(|idx| self.node(idx))
    }

    /// Resolve a list of indices into node records
    pub fn resolve_nodes<'a>(&'a self, indices: &'a [NodeIndex]) -> impl Iterator<Item = &'a GraphNode> + 'a {
        indices.iter().map(move |&idx| self.node(idx))
    }

    /// Resolve a list of edge positions into edge records
    pub fn resolve_edges<'a>(&'a self, positions: &'a [usize]) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        positions.iter().map(move |&pos| &self.edges[pos])
    }
}
