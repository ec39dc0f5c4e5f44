use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Multiples (e.g., 8.5x EV/EBITDA)
pub type Multiple = Decimal;

/// A fiscal reporting period, identified by year and period-end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalPeriod {
    pub fiscal_year: i32,
    pub period_end: NaiveDate,
}

/// One company's normalized financial statement for a single fiscal period.
///
/// Every statement field is optional: the upstream filing extraction may
/// not surface a line item, and absence must flow through as
/// "not computable" rather than zero. The only validated invariant is
/// that revenue, when reported, is non-negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialStatementRecord {
    pub ticker: String,
    pub company: String,
    pub period: FiscalPeriod,

    // --- Income statement ---
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_of_revenue: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gross_profit: Option<Money>,
    /// Operating income (EBIT).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_income: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub research_development: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sganda: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_income: Option<Money>,
    /// Depreciation and amortisation when reported separately. When absent,
    /// EBITDA can only be estimated (see `ratios::RatioInput::da_pct`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depreciation_amortization: Option<Money>,

    // --- Balance sheet ---
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_assets: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_equity: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_assets: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_liabilities: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_debt: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cash_and_equivalents: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shares_outstanding: Option<Decimal>,

    // --- Cash flow statement (sparse in many filings) ---
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_cash_flow: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capital_expenditures: Option<Money>,
}

/// Market data supplied by an external collaborator. Valuation multiples
/// degrade to "not available" without it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketQuote {
    pub share_price: Money,
    /// Market capitalisation. When absent it is derived as
    /// share_price * shares_outstanding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<Money>,
}

impl MarketQuote {
    /// Resolve market cap, deriving from price * shares when not quoted.
    pub fn resolve_market_cap(&self, shares_outstanding: Option<Decimal>) -> Option<Money> {
        self.market_cap
            .or_else(|| shares_outstanding.map(|sh| self.share_price * sh))
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
