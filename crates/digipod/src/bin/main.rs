//! digipod command-line interface

use anyhow::Result;
use clap::{Parser, Subcommand};
use digipod::cli::{evaluate, list, merge, output};
use std::path::PathBuf;

/// digipod command-line tool
#[derive(Parser)]
#[command(name = "digipod")]
#[command(author, version, about = "Delirium-prevention recommendation interval engine", long_about = None)]
struct Cli {
    /// Verbose output (debug logging unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (json, table, pretty)
    #[arg(short = 'f', long, global = true)]
    format: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    color: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a recommendation against criterion result files
    Evaluate {
        /// Recommendation name (e.g. 4.1)
        recommendation: String,

        /// Observation window start (RFC 3339)
        #[arg(long)]
        start: String,

        /// Observation window end (RFC 3339, exclusive)
        #[arg(long)]
        end: String,

        /// Directories containing <criterion>.json result files
        #[arg(short, long = "results")]
        results: Vec<PathBuf>,
    },

    /// Merge result files directly with a combine policy
    Merge {
        /// Policy (combine-4-1, combine-4-3, max-count-or, and, or, not,
        /// population-intervention, indicator)
        policy: String,

        /// Observation window start (RFC 3339)
        #[arg(long)]
        start: String,

        /// Observation window end (RFC 3339, exclusive)
        #[arg(long)]
        end: String,

        /// Result files, in the policy's operand order
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// List recommendations and the criteria they read
    List,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let output_format = output::parse_format(cli.format.as_deref())?;

    match cli.command {
        Commands::Evaluate {
            recommendation,
            start,
            end,
            results,
        } => {
            let config = evaluate::EvaluateConfig {
                recommendation,
                start,
                end,
                results,
                output_format,
                output_file: cli.output,
            };
            evaluate::evaluate(config).await
        }

        Commands::Merge {
            policy,
            start,
            end,
            files,
        } => {
            let config = merge::MergeConfig {
                policy,
                start,
                end,
                files,
                output_format,
                output_file: cli.output,
            };
            merge::merge(config).await
        }

        Commands::List => {
            let config = list::ListConfig {
                output_format,
                output_file: cli.output,
            };
            list::list(config).await
        }
    }
}

#[tokio::main]
async fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    output::setup_colors(&cli.color);
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}
