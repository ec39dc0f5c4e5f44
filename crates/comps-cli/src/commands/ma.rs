use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use comps_core::ma::{self, HasGetsInput};

use crate::input;

/// Arguments for Has/Gets pro-forma analysis
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct HasGetsArgs {
    /// Path to JSON input file with buyer, seller, quotes and scenario
    #[arg(long)]
    pub input: Option<String>,

    /// Override the offer premium (e.g. 0.30 for 30%)
    #[arg(long)]
    pub premium: Option<Decimal>,

    /// Override annual pre-tax synergies
    #[arg(long)]
    pub synergies: Option<Decimal>,

    /// Override the corporate tax rate
    #[arg(long)]
    pub tax_rate: Option<Decimal>,

    /// Override the assumed interest rate on debt
    #[arg(long)]
    pub interest_rate: Option<Decimal>,

    /// Override the buyer's D&A estimate as a fraction of revenue
    #[arg(long)]
    pub da_pct_buyer: Option<Decimal>,

    /// Override the seller's D&A estimate as a fraction of revenue
    #[arg(long)]
    pub da_pct_seller: Option<Decimal>,
}

pub fn run_has_gets(args: HasGetsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut deal: HasGetsInput = input::read_input(&args.input)?
        .ok_or("--input file is required for Has/Gets analysis (or pipe JSON via stdin)")?;

    if let Some(premium) = args.premium {
        deal.scenario.premium = premium;
    }
    if let Some(synergies) = args.synergies {
        deal.scenario.synergies_annual = synergies;
    }
    if let Some(tax_rate) = args.tax_rate {
        deal.scenario.tax_rate = tax_rate;
    }
    if let Some(interest_rate) = args.interest_rate {
        deal.scenario.interest_rate = interest_rate;
    }
    if let Some(da_pct_buyer) = args.da_pct_buyer {
        deal.scenario.da_pct_buyer = da_pct_buyer;
    }
    if let Some(da_pct_seller) = args.da_pct_seller {
        deal.scenario.da_pct_seller = da_pct_seller;
    }

    let result = ma::analyze_has_gets(&deal)?;
    Ok(serde_json::to_value(result)?)
}
