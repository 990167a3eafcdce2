mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::analyze::{AnalyzeArgs, CurveArgs, GreeksArgs, ValidateArgs};
use commands::GlobalOptions;

/// Risk/reward analysis for multi-leg option strategies
#[derive(Parser)]
#[command(
    name = "ora",
    version,
    about = "Risk/reward analysis for multi-leg option strategies",
    long_about = "Reads a JSON strategy + market document and reports the expiry \
                  profit/loss curve, aggregated Greeks, break-evens, margin, return \
                  on risk and a probability-of-profit estimate, with decimal precision \
                  for all money figures."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// JSON or YAML file overriding analysis limits and constants
    #[arg(long, global = true)]
    config: Option<String>,

    /// Evaluate expiry windows as of this date (YYYY-MM-DD) instead of today
    #[arg(long, global = true)]
    as_of: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG wins
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Full risk profile: curve, Greeks, statistics, margin
    Analyze(AnalyzeArgs),
    /// Check a strategy document and list every problem found
    Validate(ValidateArgs),
    /// Profit/loss curve only
    Curve(CurveArgs),
    /// Aggregated Greeks exposure only
    Greeks(GreeksArgs),
    /// List supported strategy variants
    Catalog,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let globals = match GlobalOptions::load(cli.config.as_deref(), cli.as_of.as_deref()) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Analyze(args) => commands::analyze::run_analyze(args, &globals),
        Commands::Validate(args) => commands::analyze::run_validate(args, &globals),
        Commands::Curve(args) => commands::analyze::run_curve(args, &globals),
        Commands::Greeks(args) => commands::analyze::run_greeks(args, &globals),
        Commands::Catalog => commands::catalog::run_catalog(),
        Commands::Version => {
            println!("ora {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
