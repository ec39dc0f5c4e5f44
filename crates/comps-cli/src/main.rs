mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::compare::CompareArgs;
use commands::growth::CagrArgs;
use commands::ma::HasGetsArgs;
use commands::ratios::RatiosArgs;

/// Financial statement comps and pro-forma deal modelling
#[derive(Parser)]
#[command(
    name = "comps",
    version,
    about = "Financial statement comps and pro-forma deal modelling",
    long_about = "Derives financial ratio sets from 10-K statement data with decimal \
                  precision, builds cross-company comparison tables, runs Has/Gets \
                  pro-forma analysis for cash acquisitions, and computes CAGR. \
                  Missing or meaningless figures surface as N/A and NM, never as zeros."
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
    /// Derive the full ratio set for one company
    Ratios(RatiosArgs),
    /// Build a cross-company comparison table
    Compare(CompareArgs),
    /// Run a Has/Gets pro-forma analysis for a cash acquisition
    HasGets(HasGetsArgs),
    /// Compound annual growth rate
    Cagr(CagrArgs),
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

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Ratios(args) => commands::ratios::run_ratios(args),
        Commands::Compare(args) => commands::compare::run_compare(args),
        Commands::HasGets(args) => commands::ma::run_has_gets(args),
        Commands::Cagr(args) => commands::growth::run_cagr(args),
        Commands::Version => {
            println!("comps {}", env!("CARGO_PKG_VERSION"));
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
