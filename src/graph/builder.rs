//! Graph construction from validated comment trees

use crate::data::time::parse_reply_time;
use crate::data::RawComment;
use crate::graph::algorithms::{compute_degrees, DegreeStats};
use crate::graph::stats::{CommentStats, StatsAccumulator};
use crate::graph::{CommentGraph, GraphEdge, GraphNode, NodeIndex};
use std::collections::HashMap;

/// Output of one build: the graph with degrees set, plus its summaries
#[derive(Debug, Clone)]
pub struct BuiltGraph {
    pub graph: CommentGraph,
    pub comment_stats: CommentStats,
    pub degree_stats: DegreeStats,
}

/// Builder for incrementally constructing a CommentGraph
pub struct GraphBuilder {
    /// Node arena, in first-seen order
    nodes: Vec<GraphNode>,

    /// Mapping from comment ids to node indices
    id_to_index: HashMap<String, NodeIndex>,

    /// Reply edges, in traversal order
    edges: Vec<GraphEdge>,

    /// Comment-level running totals
    stats: StatsAccumulator,

    /// Comments whose reply time could not be parsed
    unknown_times: usize,
}

impl GraphBuilder {
    /// Create a new graph builder with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            id_to_index: HashMap::with_capacity(capacity),
            edges: Vec::with_capacity(capacity),
            stats: StatsAccumulator::default(),
            unknown_times: 0,
        }
    }

    /// Add one comment (without descending into its replies)
    pub fn add_comment(&mut self, comment: &RawComment) {
        let time = parse_reply_time(&comment.reply_time);
        if time.is_none() {
            self.unknown_times += 1;
            log::debug!(
                "Unparseable reply time {:?} on comment {}",
                comment.reply_time,
                comment.id
            );
        }

        let is_reply = comment.parent_id != 0;
        self.stats
            .record(&comment.author, &comment.content, comment.likes, is_reply, time);

        let id = comment.id.to_string();
        self.upsert_node(GraphNode {
            id: id.clone(),
            name: comment.author.clone(),
            content: comment.content.clone(),
            likes: comment.likes,
            time: time.unwrap_or(0),
            time_known: time.is_some(),
            degree: 0,
            root: !is_reply,
        });

        if is_reply {
            self.edges.push(GraphEdge::new(comment.parent_id.to_string(), id));
        }
    }

    /// Insert a node, or overwrite the data of an existing node with the same id
    /// while keeping its position
    fn upsert_node(&mut self, node: GraphNode) {
        if let Some(&idx) = self.id_to_index.get(&node.id) {
            log::warn!("Duplicate comment id {}, keeping the later record", node.id);
            self.nodes[idx as usize] = node;
            return;
        }

        let idx = self.nodes.len() as NodeIndex;
        self.id_to_index.insert(node.id.clone(), idx);
        self.nodes.push(node);
    }

    /// Get the node for an id, synthesizing a placeholder if none exists
    fn get_or_create_placeholder(&mut self, id: &str) -> NodeIndex {
        if let Some(&idx) = self.id_to_index.get(id) {
            return idx;
        }

        let idx = self.nodes.len() as NodeIndex;
        self.id_to_index.insert(id.to_string(), idx);
        self.nodes.push(GraphNode::placeholder(id));
        idx
    }

    /// Resolve edges, synthesize placeholders, compute degrees
    pub fn build(mut self) -> BuiltGraph {
        let explicit = self.nodes.len();

        let edges = std::mem::take(&mut self.edges);
        let endpoints: Vec<(NodeIndex, NodeIndex)> = edges
            .iter()
            .map(|edge| {
                let src = self.get_or_create_placeholder(&edge.source);
                let dst = self.get_or_create_placeholder(&edge.target);
                (src, dst)
            })
            .collect();

        let placeholders = self.nodes.len() - explicit;
        if placeholders > 0 {
            log::warn!("Synthesized {} placeholder nodes for missing comments", placeholders);
        }
        if self.unknown_times > 0 {
            log::warn!("{} comments have an unparseable reply time", self.unknown_times);
        }

        let degree_stats = compute_degrees(&mut self.nodes, &endpoints);

        let graph = CommentGraph {
            nodes: self.nodes,
            edges,
            explicit_nodes: explicit,
            id_to_index: self.id_to_index,
            endpoints,
        };

        log::info!(
            "Built graph with {} nodes and {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        BuiltGraph {
            graph,
            comment_stats: self.stats.finish(),
            degree_stats,
        }
    }
}

/// Flatten a comment tree into a graph.
///
/// Comments are visited in pre-order with an explicit stack, so tree depth is
/// not bounded by the call stack.
pub fn build_graph(comments: &[RawComment]) -> BuiltGraph {
    let mut builder = GraphBuilder::with_capacity(comments.len());
    let mut stack: Vec<&RawComment> = comments.iter().rev().collect();

    while let Some(comment) = stack.pop() {
        builder.add_comment(comment);
        stack.extend(comment.replies.iter().rev());
    }

    builder.build()
}
