//! Cluster detection algorithms

use crate::cluster::{Chain, IsolatedNodes, LinearClusters, RadialCluster, RadialClusters};
use crate::config::Config;
use crate::graph::{CommentGraph, CompressedAdjacency, NodeIndex};
use itertools::Itertools;
use std::collections::{HashMap, HashSet, VecDeque};

/// Find hubs with many direct neighbours.
///
/// Centers are the nodes whose degree reaches
/// `max(radial_min_threshold, radial_degree_factor * average_degree)`; when none
/// does, the highest-degree nodes are used instead (ties keep node order).
pub fn find_radial_clusters(graph: &CommentGraph, average_degree: f64, config: &Config) -> RadialClusters {
    let threshold = config.radial_threshold(average_degree);
    let nodes = graph.nodes();

    let mut centers: Vec<NodeIndex> = (0..nodes.len() as NodeIndex)
        .filter(|&idx| f64::from(nodes[idx as usize].degree) >= threshold)
        .collect();

    let fallback = centers.is_empty();
    if fallback {
        // Stable sort keeps node order among equal degrees
        centers = (0..nodes.len() as NodeIndex)
            .sorted_by(|&a, &b| nodes[b as usize].degree.cmp(&nodes[a as usize].degree))
            .take(config.radial_fallback_centers)
            .collect();
    }

    log::info!(
        "Radial detection: threshold {:.2}, {} centers{}",
        threshold,
        centers.len(),
        if fallback { " (top-degree fallback)" } else { "" }
    );

    let mut slot_of: Vec<Option<usize>> = vec![None; nodes.len()];
    let mut clusters: Vec<RadialCluster> = centers
        .iter()
        .enumerate()
        .map(|(slot, &center)| {
            slot_of[center as usize] = Some(slot);
            RadialCluster {
                center,
                children: Vec::new(),
                edges: Vec::new(),
            }
        })
        .collect();

    // One pass over the edges: an edge leaving a center contributes its target,
    // an edge entering a center contributes its source, hub-to-hub edges are skipped
    for (pos, &(src, dst)) in graph.endpoints().iter().enumerate() {
        let (src_slot, dst_slot) = (slot_of[src as usize], slot_of[dst as usize]);
        let hit = match (src_slot, dst_slot) {
            (Some(slot), None) => Some((slot, dst)),
            (None, Some(slot)) => Some((slot, src)),
            _ => None,
        };

        if let Some((slot, child)) = hit {
            clusters[slot].children.push(child);
            clusters[slot].edges.push(pos);
        }
    }

    for cluster in &clusters {
        log::debug!(
            "Center {} has {} children",
            graph.node(cluster.center).id,
            cluster.children.len()
        );
    }

    RadialClusters {
        threshold,
        fallback,
        clusters,
    }
}

/// Find connected components by depth-first traversal, ignoring edge direction.
///
/// Components are returned in discovery order (by their lowest node index) and
/// their members in traversal order; components smaller than `min_size` are
/// discarded.
pub fn find_connected_components(adjacency: &CompressedAdjacency, min_size: usize) -> Vec<Vec<NodeIndex>> {
    let node_count = adjacency.node_count;
    let mut visited = vec![false; node_count];
    let mut components = Vec::new();
    let mut stack: Vec<NodeIndex> = Vec::new();

    for start in 0..node_count as NodeIndex {
        if visited[start as usize] {
            continue;
        }

        let mut members = Vec::new();
        stack.push(start);

        while let Some(node) = stack.pop() {
            if visited[node as usize] {
                continue;
            }
            visited[node as usize] = true;
            members.push(node);

            for &next in adjacency.neighbors(node).iter().rev() {
                if !visited[next as usize] {
                    stack.push(next);
                }
            }
        }

        if members.len() >= min_size {
            components.push(members);
        }
    }

    components
}

/// Depth-bounded search for a long simple path
struct PathSearch<'a> {
    adjacency: &'a CompressedAdjacency,
    max_depth: usize,
    /// Longest path that can possibly exist; the search stops once it is found
    limit: usize,
    on_path: &'a mut [bool],
    path: Vec<NodeIndex>,
    best: Vec<NodeIndex>,
}

impl PathSearch<'_> {
    fn extend(&mut self, node: NodeIndex) {
        self.path.push(node);
        self.on_path[node as usize] = true;

        if self.path.len() > self.best.len() {
            self.best.clone_from(&self.path);
        }

        let hops = self.path.len() - 1;
        if hops < self.max_depth {
            let adjacency = self.adjacency;
            for &next in adjacency.neighbors(node) {
                if self.best.len() >= self.limit {
                    break;
                }
                if !self.on_path[next as usize] {
                    self.extend(next);
                }
            }
        }

        self.path.pop();
        self.on_path[node as usize] = false;
    }
}

/// Farthest node from `start` by hop count, with its distance
fn farthest_from(adjacency: &CompressedAdjacency, start: NodeIndex) -> (NodeIndex, usize) {
    let mut visited = HashSet::from([start]);
    let mut queue = VecDeque::from([(start, 0)]);
    let mut farthest = (start, 0);

    while let Some((node, distance)) = queue.pop_front() {
        if distance > farthest.1 {
            farthest = (node, distance);
        }
        for &next in adjacency.neighbors(node) {
            if visited.insert(next) {
                queue.push_back((next, distance + 1));
            }
        }
    }

    farthest
}

/// Hop count of the longest path in the tree containing `start`, found with
/// two breadth-first sweeps
fn tree_diameter(adjacency: &CompressedAdjacency, start: NodeIndex) -> usize {
    let (end, _) = farthest_from(adjacency, start);
    farthest_from(adjacency, end).1
}

/// Approximate longest simple path within one component.
///
/// Start candidates are the members with at most two adjacency entries, or the
/// first `linear_fallback_candidates` members when there are none. Each search
/// explores at most `linear_max_depth` hops; the first longest path wins.
pub fn longest_path(
    adjacency: &CompressedAdjacency,
    component: &[NodeIndex],
    on_path: &mut [bool],
    config: &Config,
) -> Vec<NodeIndex> {
    let mut candidates: Vec<NodeIndex> = component
        .iter()
        .copied()
        .filter(|&node| adjacency.row_len(node) <= 2)
        .collect();

    if candidates.is_empty() {
        candidates = component
            .iter()
            .copied()
            .take(config.linear_fallback_candidates)
            .collect();
    }

    // A tree's longest simple path is its diameter; any other component is
    // bounded by its size
    let entries: usize = component.iter().map(|&node| adjacency.row_len(node)).sum();
    let longest_possible = match component.first() {
        Some(&first) if entries / 2 + 1 == component.len() => tree_diameter(adjacency, first) + 1,
        _ => component.len(),
    };

    let mut search = PathSearch {
        adjacency,
        max_depth: config.linear_max_depth,
        limit: longest_possible.min(config.linear_max_depth + 1),
        on_path,
        path: Vec::new(),
        best: Vec::new(),
    };

    for start in candidates {
        if search.best.len() >= search.limit {
            break;
        }
        search.extend(start);
    }

    search.best
}

/// Find long reply chains, one per connected component at most
pub fn find_linear_clusters(graph: &CommentGraph, config: &Config) -> LinearClusters {
    let adjacency = CompressedAdjacency::undirected(graph.node_count(), graph.endpoints());

    let components = find_connected_components(&adjacency, 2);
    log::info!("Linear detection: {} connected components with 2+ nodes", components.len());

    // First edge joining each unordered node pair
    let mut edge_between: HashMap<(NodeIndex, NodeIndex), usize> = HashMap::with_capacity(graph.edge_count());
    for (pos, &(src, dst)) in graph.endpoints().iter().enumerate() {
        edge_between.entry((src.min(dst), src.max(dst))).or_insert(pos);
    }

    let mut on_path = vec![false; graph.node_count()];
    let mut chains = Vec::new();

    for component in components.iter().filter(|c| c.len() >= 3) {
        let path = longest_path(&adjacency, component, &mut on_path, config);
        if path.len() < config.min_chain_length {
            continue;
        }

        let edges = path
            .iter()
            .tuple_windows()
            .filter_map(|(&a, &b)| edge_between.get(&(a.min(b), a.max(b))).copied())
            .collect();

        log::debug!(
            "Chain of {} nodes: {}",
            path.len(),
            path.iter().map(|&idx| graph.node(idx).id.as_str()).join(" -> ")
        );

        chains.push(Chain { nodes: path, edges });
    }

    log::info!("Found {} linear chains", chains.len());
    LinearClusters { chains }
}

/// Nodes with degree 0, plus any edge that touches one of them
pub fn find_isolated_nodes(graph: &CommentGraph) -> IsolatedNodes {
    let mut isolated = vec![false; graph.node_count()];
    let nodes: Vec<NodeIndex> = graph
        .nodes()
        .iter()
        .enumerate()
        .filter(|(_, node)| node.degree == 0)
        .map(|(idx, _)| {
            isolated[idx] = true;
            idx as NodeIndex
        })
        .collect();

    let edges: Vec<usize> = graph
        .endpoints()
        .iter()
        .enumerate()
        .filter(|(_, &(src, dst))| isolated[src as usize] || isolated[dst as usize])
        .map(|(pos, _)| pos)
        .collect();

    if !edges.is_empty() {
        log::warn!("{} edges touch nodes recorded with degree 0", edges.len());
    }

    log::info!("Found {} isolated nodes", nodes.len());
    IsolatedNodes { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RawComment;
    use crate::graph::build_graph;
    use pretty_assertions::assert_eq;
    use std::time::{Duration, Instant};

    fn comment(id: i64, parent: i64) -> RawComment {
        RawComment::new(id, format!("user{}", id), "text", 0, "2025-06-26 16:22:17", parent)
    }

    /// A top-level comment with `n` direct replies numbered from `first`
    fn star(id: i64, first: i64, n: i64) -> RawComment {
        (first..first + n).fold(comment(id, 0), |c, child| c.with_reply(comment(child, id)))
    }

    /// A single thread 1 -> 2 -> ... -> n
    fn thread(n: i64) -> RawComment {
        (2..=n).rev().fold(None::<RawComment>, |tail, id| {
            let node = comment(id, id - 1);
            Some(match tail {
                Some(t) => node.with_reply(t),
                None => node,
            })
        })
        .map_or(comment(1, 0), |t| comment(1, 0).with_reply(t))
    }

    fn ids(graph: &CommentGraph, indices: &[NodeIndex]) -> Vec<String> {
        graph.resolve_nodes(indices).map(|n| n.id.clone()).collect()
    }

    #[test]
    fn test_radial_fallback_on_small_thread() {
        let built = build_graph(&[thread(3)]);
        let radial = find_radial_clusters(&built.graph, built.degree_stats.average, &Config::default());

        assert!(radial.fallback);
        assert_eq!(radial.threshold, 5.0);
        // Node 2 has degree 2 and comes first; 1 and 3 tie and keep node order
        assert_eq!(ids(&built.graph, &radial.centers()), vec!["2", "1", "3"]);
        assert!(radial.clusters.iter().all(|c| c.children.is_empty()));
    }

    #[test]
    fn test_radial_hub_children() {
        let built = build_graph(&[star(1, 10, 6), comment(2, 0)]);
        let radial = find_radial_clusters(&built.graph, built.degree_stats.average, &Config::default());

        assert!(!radial.fallback);
        assert_eq!(radial.clusters.len(), 1);
        let hub = &radial.clusters[0];
        assert_eq!(built.graph.node(hub.center).id, "1");
        assert_eq!(
            ids(&built.graph, &hub.children),
            vec!["10", "11", "12", "13", "14", "15"]
        );
        assert_eq!(hub.edges, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_radial_centers_never_children() {
        // Two hubs joined by an edge, sharing nothing else
        let hub_b = (30..36).fold(comment(2, 1), |c, child| c.with_reply(comment(child, 2)));
        let hub_a = (10..15).fold(comment(1, 0), |c, child| c.with_reply(comment(child, 1))).with_reply(hub_b);
        let built = build_graph(&[hub_a]);
        let radial = find_radial_clusters(&built.graph, built.degree_stats.average, &Config::default());

        let centers = radial.centers();
        assert_eq!(ids(&built.graph, &centers), vec!["1", "2"]);
        for cluster in &radial.clusters {
            assert!(cluster.children.iter().all(|c| !centers.contains(c)));
        }
        assert_eq!(radial.clusters[0].children.len(), 5);
        assert_eq!(radial.clusters[1].children.len(), 6);
    }

    #[test]
    fn test_connected_components_order() {
        let adjacency = CompressedAdjacency::undirected(6, &[(0, 2), (2, 4), (1, 3)]);
        let components = find_connected_components(&adjacency, 1);
        assert_eq!(components, vec![vec![0, 2, 4], vec![1, 3], vec![5]]);

        let components = find_connected_components(&adjacency, 2);
        assert_eq!(components.len(), 2);
    }

    #[test]
    fn test_linear_chain_on_thread() {
        let built = build_graph(&[thread(3)]);
        let linear = find_linear_clusters(&built.graph, &Config::default());

        assert_eq!(linear.chains.len(), 1);
        assert_eq!(ids(&built.graph, &linear.chains[0].nodes), vec!["1", "2", "3"]);
        assert_eq!(linear.chains[0].edges, vec![0, 1]);
    }

    #[test]
    fn test_linear_skips_short_components() {
        let built = build_graph(&[comment(1, 0).with_reply(comment(2, 1)), comment(3, 0)]);
        assert!(find_linear_clusters(&built.graph, &Config::default()).chains.is_empty());
    }

    #[test]
    fn test_linear_depth_cap() {
        let built = build_graph(&[thread(30)]);
        let linear = find_linear_clusters(&built.graph, &Config::default());

        assert_eq!(linear.chains.len(), 1);
        assert_eq!(linear.chains[0].len(), 21);
        assert_eq!(linear.chains[0].edges.len(), 20);

        let linear = find_linear_clusters(&built.graph, &Config::new(4, 1000));
        assert_eq!(linear.chains[0].len(), 5);
    }

    #[test]
    fn test_linear_prefers_longest_branch() {
        // 1 has a short branch (2) and a long one (3 -> 4 -> 5)
        let tree = comment(1, 0)
            .with_reply(comment(2, 1))
            .with_reply(comment(3, 1).with_reply(comment(4, 3).with_reply(comment(5, 4))));
        let built = build_graph(&[tree]);
        let linear = find_linear_clusters(&built.graph, &Config::default());

        assert_eq!(ids(&built.graph, &linear.chains[0].nodes), vec!["2", "1", "3", "4", "5"]);
    }

    #[test]
    fn test_linear_dense_component_uses_fallback_candidates() {
        // Complete graph on 4 nodes: every row has 3 entries
        let adjacency =
            CompressedAdjacency::undirected(4, &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
        let component = vec![0, 1, 2, 3];
        let mut on_path = vec![false; 4];
        let path = longest_path(&adjacency, &component, &mut on_path, &Config::default());

        assert_eq!(path, vec![0, 1, 2, 3]);
        assert!(on_path.iter().all(|&flag| !flag));
    }

    #[test]
    fn test_linear_chain_edges_match_either_direction() {
        // Placeholder parent 99 sits in the middle: edges 99->2 and 99->3
        let built = build_graph(&[comment(2, 99), comment(3, 99)]);
        let linear = find_linear_clusters(&built.graph, &Config::default());

        let chain = &linear.chains[0];
        assert_eq!(ids(&built.graph, &chain.nodes), vec!["2", "99", "3"]);
        assert_eq!(chain.edges, vec![0, 1]);
    }

    #[test]
    fn test_tree_diameter() {
        // 0 - 1 - 2 plus a longer leg 0 - 3 - 4 - 5 and a stub 0 - 6
        let adjacency =
            CompressedAdjacency::undirected(7, &[(0, 1), (1, 2), (0, 3), (3, 4), (4, 5), (0, 6)]);
        assert_eq!(tree_diameter(&adjacency, 0), 5);
        assert_eq!(tree_diameter(&adjacency, 6), 5);
        assert_eq!(farthest_from(&adjacency, 2), (5, 5));

        let single = CompressedAdjacency::undirected(1, &[]);
        assert_eq!(tree_diameter(&single, 0), 0);
    }

    #[test]
    fn test_linear_tree_stops_at_diameter() {
        // 1 has legs 1 -> 2 -> 3, 1 -> 4 -> 5 -> 6 and 1 -> 7; the first
        // candidate finds a 5-node path, the second one the full diameter
        let tree = comment(1, 0)
            .with_reply(comment(2, 1).with_reply(comment(3, 2)))
            .with_reply(comment(4, 1).with_reply(comment(5, 4).with_reply(comment(6, 5))))
            .with_reply(comment(7, 1));
        let built = build_graph(&[tree]);
        let linear = find_linear_clusters(&built.graph, &Config::default());

        assert_eq!(linear.chains.len(), 1);
        assert_eq!(
            ids(&built.graph, &linear.chains[0].nodes),
            vec!["3", "2", "1", "4", "5", "6"]
        );
    }

    #[test]
    fn test_linear_wide_star_is_fast() {
        let built = build_graph(&[star(1, 2, 50_000)]);

        let started = Instant::now();
        let linear = find_linear_clusters(&built.graph, &Config::default());
        assert!(started.elapsed() < Duration::from_secs(10));

        assert_eq!(linear.chains.len(), 1);
        assert_eq!(ids(&built.graph, &linear.chains[0].nodes), vec!["2", "1", "3"]);
    }

    #[test]
    fn test_linear_cycle_keeps_size_bound() {
        // A triangle is not a tree, so the bound stays at the component size
        let adjacency = CompressedAdjacency::undirected(3, &[(0, 1), (1, 2), (2, 0)]);
        let mut on_path = vec![false; 3];
        let path = longest_path(&adjacency, &[0, 1, 2], &mut on_path, &Config::default());
        assert_eq!(path, vec![0, 1, 2]);
    }

    #[test]
    fn test_isolated_nodes() {
        let built = build_graph(&[thread(3), comment(7, 0), comment(8, 0)]);
        let isolated = find_isolated_nodes(&built.graph);

        assert_eq!(ids(&built.graph, &isolated.nodes), vec!["7", "8"]);
        assert!(isolated.edges.is_empty());
    }

    #[test]
    fn test_isolated_empty_for_connected_graph() {
        let built = build_graph(&[thread(3)]);
        assert_eq!(find_isolated_nodes(&built.graph), IsolatedNodes::default());
    }
}
