use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use comps_core::ratios::{self, RatioInput};
use comps_core::types::MarketQuote;

use crate::input;

/// Arguments for single-company ratio derivation
#[derive(Args)]
pub struct RatiosArgs {
    /// Path to JSON input file with the statement record and market quote
    #[arg(long)]
    pub input: Option<String>,

    /// D&A estimate as a fraction of revenue (e.g. 0.02 for 2%), used
    /// only when the record does not report D&A
    #[arg(long)]
    pub da_pct: Option<Decimal>,

    /// Override the share price from the input file
    #[arg(long)]
    pub share_price: Option<Decimal>,

    /// Override the market capitalisation from the input file
    #[arg(long)]
    pub market_cap: Option<Decimal>,
}

pub fn run_ratios(args: RatiosArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut ratio_input: RatioInput = input::read_input(&args.input)?
        .ok_or("--input file is required for ratio analysis (or pipe JSON via stdin)")?;

    if args.da_pct.is_some() {
        ratio_input.da_pct = args.da_pct;
    }
    if let Some(share_price) = args.share_price {
        match &mut ratio_input.quote {
            Some(quote) => quote.share_price = share_price,
            None => {
                ratio_input.quote = Some(MarketQuote {
                    share_price,
                    market_cap: None,
                })
            }
        }
    }
    if let Some(market_cap) = args.market_cap {
        match &mut ratio_input.quote {
            Some(quote) => quote.market_cap = Some(market_cap),
            None => return Err("--market-cap requires a share price (quote or --share-price)".into()),
        }
    }

    let result = ratios::calculate_ratios(&ratio_input)?;
    Ok(serde_json::to_value(result)?)
}
