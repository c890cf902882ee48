//! TLS 1.3 circuit evaluation CLI

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use zktls_circuits::evaluate::{self, EvalSummary};

#[derive(Parser)]
#[command(name = "zktls-circuits")]
#[command(about = "Constraint circuits over TLS 1.3 session traffic", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a circuit, check satisfiability, and report constraint counts
    Evaluate {
        /// Circuit name (see `list`)
        circuit: String,

        /// Number of repeated builds to average over
        #[arg(short, long, default_value_t = 1)]
        iterations: usize,

        /// Input size in bytes for the sized primitives (sha256, gcm, xor)
        #[arg(short, long, default_value_t = 64)]
        byte_size: usize,

        /// Write the aggregated report as JSON
        #[arg(short, long)]
        json: Option<PathBuf>,
    },

    /// List the available circuits
    List,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Evaluate {
            circuit,
            iterations,
            byte_size,
            json,
        } => {
            cmd_evaluate(&circuit, iterations.max(1), byte_size, json)?;
        }
        Commands::List => {
            for name in evaluate::CIRCUITS {
                println!("{name}");
            }
        }
    }

    Ok(())
}

fn cmd_evaluate(
    circuit: &str,
    iterations: usize,
    byte_size: usize,
    json: Option<PathBuf>,
) -> Result<()> {
    info!(circuit, iterations, byte_size, "evaluating circuit");

    let mut runs = Vec::with_capacity(iterations);
    for _ in 0..iterations {
        runs.push(evaluate::evaluate(circuit, byte_size)?);
    }
    let summary = EvalSummary::from_runs(&runs);

    println!("Circuit:        {}", summary.circuit);
    println!("Constraints:    {}", summary.constraints);
    println!("Variables:      {}", summary.variables);
    println!("Public inputs:  {}", summary.public_inputs);
    println!("Private inputs: {}", summary.private_inputs);
    println!(
        "Build time:     {:.2} ms (± {:.2} over {} runs)",
        summary.mean_build_ms, summary.std_build_ms, summary.iterations
    );
    println!(
        "Satisfied:      {}",
        if summary.satisfied { "yes" } else { "NO" }
    );

    if let Some(path) = json {
        let out = serde_json::to_string_pretty(&summary)?;
        fs::write(&path, out).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "report written");
    }

    Ok(())
}
