mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::projection::{ProjectArgs, SweepArgs};
use commands::tabular::{ExportArgs, ImportArgs};
use commands::tax::FutureTaxArgs;
use commands::valuation::RequestArgs;

/// Unlisted share valuation and illustrative tax estimates
#[derive(Parser)]
#[command(
    name = "shareval",
    version,
    about = "Unlisted share valuation and illustrative tax estimates",
    long_about = "Values shares of an unlisted company by blending net asset value \
                  with capitalized 3:2:1 weighted earnings, derives gift, transfer \
                  and liquidation taxes on a stake, and projects both under constant \
                  growth. Figures use decimal arithmetic throughout."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Value the shares under one blend method
    Evaluate(RequestArgs),
    /// Derive taxes on the owned stake at today's value
    Taxes(RequestArgs),
    /// Project the valuation under constant growth
    Project(ProjectArgs),
    /// Compare taxes today with taxes at the projection horizon
    FutureTaxes(FutureTaxArgs),
    /// Project over a grid of growth rates and horizons
    Sweep(SweepArgs),
    /// Write a request, valuation, projection or tax record to CSV
    Export(ExportArgs),
    /// Read a record back from a CSV export
    Import(ImportArgs),
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
    pretty_env_logger::init();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Evaluate(args) => commands::valuation::run_evaluate(args),
        Commands::Taxes(args) => commands::tax::run_taxes(args),
        Commands::Project(args) => commands::projection::run_project(args),
        Commands::FutureTaxes(args) => commands::tax::run_future_taxes(args),
        Commands::Sweep(args) => commands::projection::run_sweep(args),
        Commands::Export(args) => commands::tabular::run_export(args),
        Commands::Import(args) => commands::tabular::run_import(args),
        Commands::Version => {
            println!("shareval {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {:?}", e);
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
