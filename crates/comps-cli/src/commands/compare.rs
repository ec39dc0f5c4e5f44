use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use comps_core::comparator::{self, ComparisonInput};
use comps_core::ratios::{MetricKind, RatioInput};

use crate::input;

/// Arguments for cross-company comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Path to JSON input file with the companies to compare
    #[arg(long)]
    pub input: Option<String>,

    /// Comma-separated metric columns (e.g. "net_margin,roe,pe");
    /// overrides columns from the input file
    #[arg(long)]
    pub columns: Option<String>,
}

/// On-disk shape: columns are optional and default to the standard set.
#[derive(Deserialize)]
struct CompareFile {
    companies: Vec<RatioInput>,
    #[serde(default)]
    columns: Option<Vec<MetricKind>>,
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let file: CompareFile = input::read_input(&args.input)?
        .ok_or("--input file is required for comparison (or pipe JSON via stdin)")?;

    let columns = match &args.columns {
        Some(raw) => parse_columns(raw)?,
        None => file
            .columns
            .unwrap_or_else(|| MetricKind::DEFAULT_COLUMNS.to_vec()),
    };

    let comparison_input = ComparisonInput {
        companies: file.companies,
        columns,
    };

    let result = comparator::build_comparison(&comparison_input)?;
    Ok(serde_json::to_value(result)?)
}

fn parse_columns(raw: &str) -> Result<Vec<MetricKind>, Box<dyn std::error::Error>> {
    raw.split(',')
        .map(|s| s.parse::<MetricKind>().map_err(|e| e.into()))
        .collect()
}
