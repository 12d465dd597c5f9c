use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use env_logger::Env;
use log::{info, warn};
use std::path::{Path, PathBuf};

use topoedit::config_loader::load_config_or_default;
use topoedit::export::export_topology;
use topoedit::npgi::{load_file, save_npgi, save_topology, LoadedTopology};
use topoedit::{EditorConfig, NodeType};

/// Topology file tool for network emulation setups
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the editor settings YAML file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a topology (.npgi or .json) and log a summary
    Inspect {
        file: PathBuf,
    },
    /// Write the topology document of an NPGI file
    Convert {
        file: PathBuf,
        /// Output topology JSON path
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Export the topology and VM/VNF definitions into a directory
    Export {
        file: PathBuf,
        /// Output directory
        #[arg(short, long, default_value = "export")]
        output: PathBuf,
    },
    /// Load an NPGI file and save it again in canonical form
    Normalize {
        file: PathBuf,
        /// Output path (defaults to overwriting the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    run(args)
}

fn run(args: Args) -> Result<()> {
    let config = load_config_or_default(args.config.as_deref())
        .wrap_err("Failed to load editor settings")?;

    match args.command {
        Command::Inspect { file } => {
            let loaded = load(&file, &config)?;
            summarize(&loaded);
        }
        Command::Convert { file, output } => {
            let loaded = load(&file, &config)?;
            let written = save_topology(&loaded.graph, &output)
                .wrap_err_with(|| format!("Failed to write topology '{}'", output.display()))?;
            info!("Topology document written to {:?}", written);
        }
        Command::Export { file, output } => {
            let loaded = load(&file, &config)?;
            let summary = export_topology(&loaded.graph, &output, &loaded.id)
                .wrap_err_with(|| format!("Failed to export into '{}'", output.display()))?;
            info!("Topology exported to {:?}", summary.topology);
        }
        Command::Normalize { file, output } => {
            let loaded = load(&file, &config)?;
            let target = output.unwrap_or_else(|| file.clone());
            let written = save_npgi(&loaded.graph, &target)
                .wrap_err_with(|| format!("Failed to save '{}'", target.display()))?;
            info!("Normalized topology saved to {:?}", written);
        }
    }

    Ok(())
}

fn load(file: &Path, config: &EditorConfig) -> Result<LoadedTopology> {
    let loaded = load_file(file, config)
        .wrap_err_with(|| format!("Failed to load topology '{}'", file.display()))?;
    loaded
        .graph
        .check_invariants()
        .map_err(|violation| eyre!("Loaded topology is inconsistent: {}", violation))?;
    Ok(loaded)
}

fn summarize(loaded: &LoadedTopology) {
    let graph = &loaded.graph;
    info!("Topology: {}", loaded.id);
    for node_type in NodeType::ALL {
        let names: Vec<&str> = graph.nodes_of_type(node_type).map(|n| n.name()).collect();
        if !names.is_empty() {
            info!("  {} ({}): {}", node_type, names.len(), names.join(", "));
        }
    }
    info!("  Links: {}", graph.edge_count());
    for edge in graph.list_edges() {
        info!(
            "    {} [{}] <-> {} [{}]",
            edge.u.name(),
            edge.u_interface_mac().unwrap_or("-"),
            edge.v.name(),
            edge.v_interface_mac().unwrap_or("-")
        );
    }
    if !loaded.missing_positions.is_empty() {
        warn!(
            "Nodes without a saved position: {}",
            loaded.missing_positions.join(", ")
        );
    }
}
