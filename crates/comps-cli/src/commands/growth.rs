use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use comps_core::growth;

use crate::input;

/// Arguments for CAGR calculation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct CagrArgs {
    /// Beginning value (must be positive)
    #[arg(long)]
    pub begin: Option<Decimal>,

    /// Ending value
    #[arg(long)]
    pub end: Option<Decimal>,

    /// Number of periods
    #[arg(long)]
    pub periods: Option<u32>,

    /// Path to JSON input file with a (year, value) series
    #[arg(long)]
    pub input: Option<String>,
}

/// On-disk shape for series mode: yearly observations plus the lookback.
#[derive(Deserialize)]
struct SeriesFile {
    series: Vec<(i32, Decimal)>,
    years: u32,
}

pub fn run_cagr(args: CagrArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let outcome = if let Some(file) = input::read_input::<SeriesFile>(&args.input)? {
        growth::cagr_from_series(&file.series, file.years)?
    } else {
        let begin = args.begin.ok_or("--begin is required (or provide --input)")?;
        let end = args.end.ok_or("--end is required (or provide --input)")?;
        let periods = args
            .periods
            .ok_or("--periods is required (or provide --input)")?;
        growth::cagr(begin, end, periods)?
    };

    let label = outcome.label();
    let mut value = serde_json::to_value(&outcome)?;
    if let Value::Object(map) = &mut value {
        map.insert("label".into(), Value::String(label));
    }
    Ok(value)
}
