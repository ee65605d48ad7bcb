//! Graph representation and algorithms module

pub mod algorithms;
pub mod builder;
pub mod compressed;
pub mod model;
pub mod stats;

pub use algorithms::DegreeStats;
pub use builder::{build_graph, BuiltGraph, GraphBuilder};
pub use compressed::CompressedAdjacency;
pub use model::{CommentGraph, GraphEdge, GraphNode, NodeIndex};
pub use stats::CommentStats;
