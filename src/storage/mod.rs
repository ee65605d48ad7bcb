//! Results persistence module

use crate::analyzer::CommentAnalyzer;
use crate::cluster::metrics::{rank_clusters, Rankings};
use crate::cluster::{IsolatedNodes, LinearClusters, RadialClusters};
use crate::graph::{CommentGraph, GraphEdge, GraphNode, NodeIndex};
use anyhow::{Context, Result};
use serde_json::{json, to_string_pretty, Value};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Cluster results selected for one run
#[derive(Debug, Clone, Default)]
pub struct ClusterReport {
    pub radial: Option<RadialClusters>,
    pub linear: Option<LinearClusters>,
    pub isolated: Option<IsolatedNodes>,
}

/// Save analysis results to the specified directory
pub fn save_results(analyzer: &CommentAnalyzer, report: &ClusterReport, output_dir: &Path) -> Result<()> {
    log::info!("Saving analysis results to {}", output_dir.display());

    // Ensure output directory exists
    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;

    let graph = analyzer.graph();

    write_json(&output_dir.join("graph.json"), &serde_json::to_value(graph)?)?;
    write_json(&output_dir.join("summary.json"), &summary(analyzer, report))?;
    write_json(&output_dir.join("clusters.json"), &clusters(graph, report))?;

    if let (Some(radial), Some(linear), Some(isolated)) = (&report.radial, &report.linear, &report.isolated) {
        let rankings = rank_clusters(graph, radial, linear, isolated);
        write_json(&output_dir.join("rankings.json"), &rankings_json(graph, &rankings))?;
    }

    log::info!("Results saved successfully");

    Ok(())
}

fn write_json(path: &Path, value: &Value) -> Result<()> {
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    file.write_all(to_string_pretty(value)?.as_bytes())?;
    Ok(())
}

/// Comment, degree and cluster count summary
fn summary(analyzer: &CommentAnalyzer, report: &ClusterReport) -> Value {
    let graph = analyzer.graph();
    json!({
        "graph_stats": {
            "node_count": graph.node_count(),
            "edge_count": graph.edge_count(),
            "placeholder_count": graph.placeholder_count(),
        },
        "comment_stats": analyzer.comment_stats(),
        "degree_stats": analyzer.degree_stats(),
        "cluster_stats": {
            "radial_centers": report.radial.as_ref().map(|r| r.clusters.len()),
            "radial_fallback": report.radial.as_ref().map(|r| r.fallback),
            "linear_chains": report.linear.as_ref().map(|l| l.chains.len()),
            "longest_chain": report.linear.as_ref().map(|l| l.chains.iter().map(|c| c.len()).max().unwrap_or(0)),
            "isolated_nodes": report.isolated.as_ref().map(|i| i.nodes.len()),
        }
    })
}

fn nodes_json(graph: &CommentGraph, indices: &[NodeIndex]) -> Vec<GraphNode> {
    graph.resolve_nodes(indices).cloned().collect()
}

fn edges_json(graph: &CommentGraph, positions: &[usize]) -> Vec<GraphEdge> {
    graph.resolve_edges(positions).cloned().collect()
}

/// Clusters with node and edge references resolved to records
fn clusters(graph: &CommentGraph, report: &ClusterReport) -> Value {
    let radial = report.radial.as_ref().map(|radial| {
        json!({
            "threshold": radial.threshold,
            "fallback": radial.fallback,
            "clusters": radial.clusters.iter().map(|cluster| json!({
                "center": graph.node(cluster.center),
                "children": nodes_json(graph, &cluster.children),
                "links": edges_json(graph, &cluster.edges),
            })).collect::<Vec<_>>(),
        })
    });

    let linear = report.linear.as_ref().map(|linear| {
        json!({
            "chains": linear.chains.iter().map(|chain| json!({
                "nodes": nodes_json(graph, &chain.nodes),
                "links": edges_json(graph, &chain.edges),
            })).collect::<Vec<_>>(),
        })
    });

    let isolated = report.isolated.as_ref().map(|isolated| {
        json!({
            "nodes": nodes_json(graph, &isolated.nodes),
            "links": edges_json(graph, &isolated.edges),
        })
    });

    json!({
        "radial": radial,
        "linear": linear,
        "isolated": isolated,
    })
}

fn rankings_json(graph: &CommentGraph, rankings: &Rankings) -> Value {
    json!({
        "radial": rankings.radial.iter().map(|rank| json!({
            "node": graph.node(rank.center),
            "child_count": rank.child_count,
        })).collect::<Vec<_>>(),
        "linear": rankings.linear.iter().map(|rank| json!({
            "nodes": nodes_json(graph, &rank.nodes),
            "length": rank.length,
        })).collect::<Vec<_>>(),
        "isolated": nodes_json(graph, &rankings.isolated),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::data::RawComment;

    fn analyzer() -> CommentAnalyzer {
        let tree = vec![
            RawComment::new(1, "a", "x", 1, "2025-06-26 16:22:17", 0).with_reply(
                RawComment::new(2, "b", "y", 2, "2025-06-26 16:22:17", 1)
                    .with_reply(RawComment::new(3, "c", "z", 3, "2025-06-26 16:22:17", 2)),
            ),
            RawComment::new(4, "d", "w", 4, "2025-06-26 16:22:17", 0),
        ];
        CommentAnalyzer::from_comments(&tree, Config::default()).unwrap()
    }

    fn read(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_save_all_results() {
        let analyzer = analyzer();
        let report = ClusterReport {
            radial: Some(analyzer.radial_clusters()),
            linear: Some(analyzer.linear_clusters()),
            isolated: Some(analyzer.isolated_nodes()),
        };
        let dir = tempfile::tempdir().unwrap();
        save_results(&analyzer, &report, dir.path()).unwrap();

        let graph = read(&dir.path().join("graph.json"));
        assert_eq!(graph["nodes"].as_array().unwrap().len(), 4);
        assert_eq!(graph["edges"][0]["source"], "1");
        assert_eq!(graph["edges"][0]["value"], 1);

        let summary = read(&dir.path().join("summary.json"));
        assert_eq!(summary["comment_stats"]["total_comments"], 4);
        assert_eq!(summary["cluster_stats"]["linear_chains"], 1);
        assert_eq!(summary["cluster_stats"]["isolated_nodes"], 1);

        let clusters = read(&dir.path().join("clusters.json"));
        let chain = &clusters["linear"]["chains"][0];
        assert_eq!(chain["nodes"].as_array().unwrap().len(), 3);
        assert_eq!(chain["links"].as_array().unwrap().len(), 2);
        assert_eq!(clusters["isolated"]["nodes"][0]["id"], "4");

        let rankings = read(&dir.path().join("rankings.json"));
        assert_eq!(rankings["linear"][0]["length"], 3);
    }

    #[test]
    fn test_partial_report_skips_rankings() {
        let analyzer = analyzer();
        let report = ClusterReport {
            isolated: Some(analyzer.isolated_nodes()),
            ..ClusterReport::default()
        };
        let dir = tempfile::tempdir().unwrap();
        save_results(&analyzer, &report, dir.path()).unwrap();

        let clusters = read(&dir.path().join("clusters.json"));
        assert!(clusters["radial"].is_null());
        assert!(!dir.path().join("rankings.json").exists());
    }
}
