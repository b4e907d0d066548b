//! # Spacetime Compiler
//!
//! Command-line entry point: compiles a block graph description into a
//! stabilizer circuit at a given scale.
//!
//! ## Startup Sequence
//!
//! 1. Parse command line flags
//! 2. Load configuration (file, then `SC_*` environment, then flags)
//! 3. Install the log subscriber
//! 4. Compile and write the circuit

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use compiler_runtime::{compile_and_check, RuntimeConfig};
use sc_04_assembly::GraphDescription;

/// Compile a spacetime block graph into a stabilizer circuit
#[derive(Parser, Debug)]
#[command(name = "compiler-runtime")]
#[command(about = "Compile a block graph description into a stabilizer circuit")]
struct Args {
    /// JSON block graph description
    #[arg(long)]
    graph: PathBuf,

    /// Scale parameter, the code distance is 2k + 1
    #[arg(long)]
    k: u32,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output file, standard output when absent
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not emit QUBIT_COORDS instructions
    #[arg(long)]
    no_qubit_coords: bool,

    /// Uniform depolarizing noise strength
    #[arg(long)]
    noise: Option<f64>,

    /// Report the shortest graphlike logical error of the noisy circuit
    #[arg(long)]
    distance: bool,
}

fn load_config(args: &Args) -> Result<RuntimeConfig> {
    let mut config = RuntimeConfig::load(args.config.as_deref())
        .context("Failed to load configuration")?
        .with_env_overrides()
        .context("Failed to apply environment overrides")?;
    if args.no_qubit_coords {
        config.include_qubit_coords = false;
    }
    if args.noise.is_some() {
        config.noise = args.noise;
    }
    Ok(config)
}

fn init_logging(config: &RuntimeConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("Invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install the log subscriber: {e}"))
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;
    init_logging(&config)?;

    let source = fs::read_to_string(&args.graph)
        .with_context(|| format!("Failed to read {}", args.graph.display()))?;
    let description: GraphDescription = serde_json::from_str(&source)
        .with_context(|| format!("Failed to parse {}", args.graph.display()))?;

    let compiled = compile_and_check(&description, args.k, &config, args.distance)?;
    info!(
        k = args.k,
        detectors = compiled.circuit.num_detectors(),
        measurements = compiled.circuit.num_measurements(),
        "Compiled block graph"
    );
    if args.distance {
        match compiled.distance {
            Some(distance) => info!(distance, "Shortest graphlike logical error"),
            None if config.noise.is_none() => {
                warn!("Distance check skipped: no noise strength configured")
            }
            None => info!("No undetectable graphlike logical error"),
        }
    }

    let text = compiled.circuit.to_string();
    match &args.output {
        Some(path) => fs::write(path, text)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{text}"),
    }
    Ok(())
}
