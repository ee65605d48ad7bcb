//! Configuration management for the comment graph analyzer

/// Tunables for graph construction and cluster detection
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Lower bound for the radial center degree threshold
    pub radial_min_threshold: f64,

    /// Multiple of the average degree a radial center must reach
    pub radial_degree_factor: f64,

    /// Number of top-degree nodes used when no node reaches the threshold
    pub radial_fallback_centers: usize,

    /// Maximum number of hops explored by the longest-path search
    pub linear_max_depth: usize,

    /// Start candidates used when a component has no low-degree tips
    pub linear_fallback_candidates: usize,

    /// Minimum number of nodes for a chain to be reported
    pub min_chain_length: usize,

    /// Maximum number of nodes (placeholders included) accepted per analysis
    pub max_nodes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            radial_min_threshold: 5.0,
            radial_degree_factor: 2.0,
            radial_fallback_centers: 3,
            linear_max_depth: 20,
            linear_fallback_candidates: 5,
            min_chain_length: 3,
            max_nodes: 500_000,
        }
    }
}

impl Config {
    /// Create a new configuration with custom search bounds
    pub fn new(linear_max_depth: usize, max_nodes: usize) -> Self {
        Self {
            linear_max_depth,
            max_nodes,
            ..Self::default()
        }
    }

    /// Degree a node must reach to count as a radial center
    pub fn radial_threshold(&self, average_degree: f64) -> f64 {
        self.radial_min_threshold
            .max(self.radial_degree_factor * average_degree)
    }
}
