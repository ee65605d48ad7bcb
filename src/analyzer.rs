//! One analysis run over one comment document

use crate::cluster::detection::{find_isolated_nodes, find_linear_clusters, find_radial_clusters};
use crate::cluster::metrics::{rank_clusters, Rankings};
use crate::cluster::{IsolatedNodes, LinearClusters, RadialClusters};
use crate::config::Config;
use crate::data::{self, RawComment};
use crate::error::{AnalyzerError, Result};
use crate::graph::{build_graph, CommentGraph, CommentStats, DegreeStats, GraphNode, NodeIndex};
use crate::query::{self, Subgraph};
use std::path::Path;

/// Owns the graph built from one comment document and answers queries on it.
///
/// Cluster results are recomputed on every call.
#[derive(Debug, Clone)]
pub struct CommentAnalyzer {
    config: Config,
    graph: CommentGraph,
    comment_stats: CommentStats,
    degree_stats: DegreeStats,
}

impl CommentAnalyzer {
    /// Build from already validated comments
    pub fn from_comments(comments: &[RawComment], config: Config) -> Result<Self> {
        let built = build_graph(comments);

        let nodes = built.graph.node_count();
        if nodes > config.max_nodes {
            return Err(AnalyzerError::InputTooLarge {
                nodes,
                limit: config.max_nodes,
            });
        }

        Ok(Self {
            config,
            graph: built.graph,
            comment_stats: built.comment_stats,
            degree_stats: built.degree_stats,
        })
    }

    /// Validate and build from a nested JSON document
    pub fn from_json(json: &str, config: Config) -> Result<Self> {
        let comments = data::parse_comments(json)?;
        Self::from_comments(&comments, config)
    }

    /// Load a JSON or CSV file and build from it
    pub fn from_path(path: &Path, config: Config) -> Result<Self> {
        let comments = data::load_comments(path)?;
        Self::from_comments(&comments, config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn graph(&self) -> &CommentGraph {
        &self.graph
    }

    pub fn comment_stats(&self) -> &CommentStats {
        &self.comment_stats
    }

    pub fn degree_stats(&self) -> DegreeStats {
        self.degree_stats
    }

    pub fn radial_clusters(&self) -> RadialClusters {
        find_radial_clusters(&self.graph, self.degree_stats.average, &self.config)
    }

    pub fn linear_clusters(&self) -> LinearClusters {
        find_linear_clusters(&self.graph, &self.config)
    }

    pub fn isolated_nodes(&self) -> IsolatedNodes {
        find_isolated_nodes(&self.graph)
    }

    /// Run all three detectors and rank their output
    pub fn rankings(&self) -> Rankings {
        rank_clusters(
            &self.graph,
            &self.radial_clusters(),
            &self.linear_clusters(),
            &self.isolated_nodes(),
        )
    }

    pub fn search_by_name(&self, query: &str) -> Option<&GraphNode> {
        query::search_by_name(&self.graph, query)
    }

    pub fn filter_by_degree(&self, min: u32, max: u32) -> Subgraph {
        query::filter_by_degree(&self.graph, min, max)
    }

    pub fn direct_connections(&self, id: &str) -> Option<Subgraph> {
        query::direct_connections(&self.graph, id)
    }

    pub fn connected_component(&self, id: &str) -> Option<Vec<NodeIndex>> {
        query::connected_component(&self.graph, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREAD: &str = r#"[
        {"评论ID": 1, "用户名": "a", "评论内容": "top", "点赞数": 2, "回复时间": "2025-06-26 16:22:17", "父评论ID": 0, "replies": [
            {"评论ID": 2, "用户名": "b", "评论内容": "re", "点赞数": 5, "回复时间": "2025-06-27 10:00:00", "父评论ID": 1, "replies": []}
        ]}
    ]"#;

    #[test]
    fn test_from_json() {
        let analyzer = CommentAnalyzer::from_json(THREAD, Config::default()).unwrap();
        assert_eq!(analyzer.graph().node_count(), 2);
        assert_eq!(analyzer.degree_stats().max, 1);
        assert_eq!(analyzer.comment_stats().comment_period_days, 1);
    }

    #[test]
    fn test_validation_error_surfaces() {
        let bad = THREAD.replace("\"父评论ID\": 1", "\"父评论ID\": 7");
        let err = CommentAnalyzer::from_json(&bad, Config::default()).unwrap_err();
        assert!(matches!(err, AnalyzerError::Validation(_)));
    }

    #[test]
    fn test_input_ceiling() {
        let err = CommentAnalyzer::from_json(THREAD, Config::new(20, 1)).unwrap_err();
        assert!(matches!(err, AnalyzerError::InputTooLarge { nodes: 2, limit: 1 }));
    }

    #[test]
    fn test_malformed_json() {
        let err = CommentAnalyzer::from_json("[{", Config::default()).unwrap_err();
        assert!(matches!(err, AnalyzerError::Json(_)));
    }

    /// One reply thread `depth` comments deep: 1 -> 2 -> ... -> depth
    fn nested_thread(depth: i64) -> String {
        let mut json = String::new();
        for id in 1..=depth {
            json.push_str(&format!(
                r#"[{{"评论ID": {}, "用户名": "u{}", "评论内容": "c", "点赞数": 1, "回复时间": "2025-06-26 16:22:17", "父评论ID": {}, "replies": "#,
                id,
                id,
                id - 1
            ));
        }
        json.push_str("[]");
        for _ in 0..depth {
            json.push_str("}]");
        }
        json
    }

    #[test]
    fn test_deep_thread_is_accepted() {
        let analyzer = CommentAnalyzer::from_json(&nested_thread(1500), Config::default()).unwrap();
        let graph = analyzer.graph();

        assert_eq!(graph.node_count(), 1500);
        assert_eq!(graph.edge_count(), 1499);
        assert_eq!(graph.node(1499).id, "1500");
        assert_eq!(analyzer.degree_stats().max, 2);

        let chains = analyzer.linear_clusters().chains;
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].len(), 21);
    }

    #[test]
    fn test_trailing_data_is_rejected() {
        let json = format!("{} []", nested_thread(2));
        let err = CommentAnalyzer::from_json(&json, Config::default()).unwrap_err();
        assert!(matches!(err, AnalyzerError::Json(_)));
    }

    #[test]
    fn test_huge_like_counts() {
        let json = r#"[
            {"评论ID": 1, "用户名": "a", "评论内容": "x", "点赞数": 18446744073709551615, "回复时间": "2025-06-26 16:22:17", "父评论ID": 0, "replies": []},
            {"评论ID": 2, "用户名": "b", "评论内容": "y", "点赞数": 1, "回复时间": "2025-06-26 16:22:17", "父评论ID": 0, "replies": []}
        ]"#;
        let analyzer = CommentAnalyzer::from_json(json, Config::default()).unwrap();
        let stats = analyzer.comment_stats();

        assert_eq!(stats.total_likes, u64::MAX);
        assert_eq!(stats.average_likes, 9_223_372_036_854_775_808.0);
        assert_eq!(analyzer.graph().node(0).likes, u64::MAX);
    }
}
