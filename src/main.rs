use anyhow::Result;
use clap::{Parser, ValueEnum};
use comment_graph_analyzer::storage::{self, ClusterReport};
use comment_graph_analyzer::{CommentAnalyzer, Config};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    All,
    Radial,
    Linear,
    Isolated,
}

#[derive(Parser, Debug)]
#[clap(
    name = "comment-graph-analyzer",
    about = "Structural analysis of nested comment threads"
)]
struct Cli {
    /// Path to the comment file (nested JSON, or flat CSV export)
    #[clap(long)]
    input: PathBuf,

    /// Output directory for results
    #[clap(long, default_value = "analysis_results")]
    output_dir: PathBuf,

    /// Cluster shapes to detect
    #[clap(long, value_enum, default_value = "all")]
    mode: Mode,

    /// Print the first node whose author name contains this text
    #[clap(long)]
    search: Option<String>,

    /// Lower bound of the degree filter
    #[clap(long)]
    min_degree: Option<u32>,

    /// Upper bound of the degree filter
    #[clap(long)]
    max_degree: Option<u32>,

    /// Maximum hops explored by the chain search
    #[clap(long, default_value = "20")]
    max_depth: usize,

    /// Reject inputs with more nodes than this
    #[clap(long, default_value = "500000")]
    max_nodes: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    log::info!("Starting comment graph analysis");
    log::info!("Input: {}", args.input.display());
    log::info!("Output: {}", args.output_dir.display());

    // 1. Load, validate and build
    let config = Config::new(args.max_depth, args.max_nodes);
    let analyzer = CommentAnalyzer::from_path(&args.input, config)?;

    let degree = analyzer.degree_stats();
    log::info!(
        "Degrees: min {}, max {}, average {:.3}",
        degree.min,
        degree.max,
        degree.average
    );

    // 2. Detect clusters
    let wants = |mode: Mode| args.mode == Mode::All || args.mode == mode;
    let report = ClusterReport {
        radial: wants(Mode::Radial).then(|| analyzer.radial_clusters()),
        linear: wants(Mode::Linear).then(|| analyzer.linear_clusters()),
        isolated: wants(Mode::Isolated).then(|| analyzer.isolated_nodes()),
    };

    // 3. Queries
    if let Some(query) = &args.search {
        match analyzer.search_by_name(query) {
            Some(node) => log::info!("Search {:?}: comment {} by {}", query, node.id, node.name),
            None => log::info!("Search {:?}: no match", query),
        }
    }

    if args.min_degree.is_some() || args.max_degree.is_some() {
        let min = args.min_degree.unwrap_or(0);
        let max = args.max_degree.unwrap_or(u32::MAX);
        let filtered = analyzer.filter_by_degree(min, max);
        log::info!(
            "Degree filter [{}, {}]: {} nodes, {} edges",
            min,
            max,
            filtered.nodes.len(),
            filtered.edges.len()
        );
    }

    // 4. Save results
    storage::save_results(&analyzer, &report, &args.output_dir)?;

    log::info!("Analysis complete. Results saved to {}", args.output_dir.display());

    Ok(())
}
