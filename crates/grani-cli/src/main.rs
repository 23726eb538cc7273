//! Grani Command-Line Interface
//!
//! Front end for the benchmark harness: run configured sweeps, list the
//! circuits a configuration can see, and inspect single QASM files.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{inspect, list, run, version};

/// Grani - transpiler benchmarking over QASM circuit suites
#[derive(Parser)]
#[command(name = "grani")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a benchmark sweep from a YAML config
    Run {
        /// Run configuration file
        #[arg(short, long)]
        config: String,

        /// Override the report output path
        #[arg(short, long)]
        report: Option<String>,

        /// Override the chart output directory
        #[arg(long)]
        charts_dir: Option<String>,

        /// Skip chart rendering
        #[arg(long)]
        no_charts: bool,
    },

    /// List the circuits a configuration can see
    List {
        /// Run configuration file
        #[arg(short, long)]
        config: String,

        /// Also load each circuit and show qubit count and depth
        #[arg(long)]
        detail: bool,
    },

    /// Parse one QASM file and print its metrics
    Inspect {
        /// Input file (OpenQASM 2.0)
        input: String,

        /// Also transpile at this optimization level (0-3)
        #[arg(short, long)]
        level: Option<u8>,

        /// Output file for the transpiled circuit
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Run {
            config,
            report,
            charts_dir,
            no_charts,
        } => run::execute(&config, report.as_deref(), charts_dir.as_deref(), no_charts),

        Commands::List { config, detail } => list::execute(&config, detail),

        Commands::Inspect {
            input,
            level,
            output,
        } => inspect::execute(&input, level, output.as_deref()),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}
