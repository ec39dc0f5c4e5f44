use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CompsError;
use crate::metric::Metric;
use crate::types::*;
use crate::CompsResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for a single-company ratio calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatioInput {
    pub record: FinancialStatementRecord,
    /// Market data; valuation multiples are `NotAvailable` without it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<MarketQuote>,
    /// D&A estimate as a fraction of revenue, used only when the record
    /// does not report D&A. Everything derived from it is flagged estimated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub da_pct: Option<Rate>,
}

/// Identifies one column of the ratio set, for keyed access and for
/// caller-specified column ordering in comparison tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    GrossMargin,
    OperatingMargin,
    NetMargin,
    EbitdaMargin,
    FcfMargin,
    ReturnOnEquity,
    ReturnOnAssets,
    CurrentRatio,
    DebtToEquity,
    DebtToAssets,
    NetDebt,
    Ebitda,
    FreeCashFlow,
    Eps,
    BookValuePerShare,
    EnterpriseValue,
    PriceEarnings,
    PriceBook,
    EvToRevenue,
    EvToEbitda,
    EvToEbit,
}

impl MetricKind {
    /// Default column order for comparison tables: profitability, then
    /// returns, liquidity, leverage, per-share, valuation.
    pub const DEFAULT_COLUMNS: &'static [MetricKind] = &[
        MetricKind::GrossMargin,
        MetricKind::OperatingMargin,
        MetricKind::NetMargin,
        MetricKind::ReturnOnEquity,
        MetricKind::ReturnOnAssets,
        MetricKind::CurrentRatio,
        MetricKind::DebtToEquity,
        MetricKind::DebtToAssets,
        MetricKind::Eps,
        MetricKind::PriceEarnings,
        MetricKind::PriceBook,
        MetricKind::EvToRevenue,
        MetricKind::EvToEbitda,
    ];
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MetricKind::GrossMargin => "Gross Margin",
            MetricKind::OperatingMargin => "Operating Margin",
            MetricKind::NetMargin => "Net Margin",
            MetricKind::EbitdaMargin => "EBITDA Margin",
            MetricKind::FcfMargin => "FCF Margin",
            MetricKind::ReturnOnEquity => "ROE",
            MetricKind::ReturnOnAssets => "ROA",
            MetricKind::CurrentRatio => "Current Ratio",
            MetricKind::DebtToEquity => "Debt/Equity",
            MetricKind::DebtToAssets => "Debt/Assets",
            MetricKind::NetDebt => "Net Debt",
            MetricKind::Ebitda => "EBITDA",
            MetricKind::FreeCashFlow => "Free Cash Flow",
            MetricKind::Eps => "EPS",
            MetricKind::BookValuePerShare => "Book Value/Share",
            MetricKind::EnterpriseValue => "Enterprise Value",
            MetricKind::PriceEarnings => "P/E",
            MetricKind::PriceBook => "P/B",
            MetricKind::EvToRevenue => "EV/Revenue",
            MetricKind::EvToEbitda => "EV/EBITDA",
            MetricKind::EvToEbit => "EV/EBIT",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for MetricKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gross_margin" => Ok(MetricKind::GrossMargin),
            "operating_margin" => Ok(MetricKind::OperatingMargin),
            "net_margin" => Ok(MetricKind::NetMargin),
            "ebitda_margin" => Ok(MetricKind::EbitdaMargin),
            "fcf_margin" => Ok(MetricKind::FcfMargin),
            "roe" | "return_on_equity" => Ok(MetricKind::ReturnOnEquity),
            "roa" | "return_on_assets" => Ok(MetricKind::ReturnOnAssets),
            "current_ratio" => Ok(MetricKind::CurrentRatio),
            "debt_to_equity" => Ok(MetricKind::DebtToEquity),
            "debt_to_assets" => Ok(MetricKind::DebtToAssets),
            "net_debt" => Ok(MetricKind::NetDebt),
            "ebitda" => Ok(MetricKind::Ebitda),
            "free_cash_flow" | "fcf" => Ok(MetricKind::FreeCashFlow),
            "eps" => Ok(MetricKind::Eps),
            "book_value_per_share" => Ok(MetricKind::BookValuePerShare),
            "enterprise_value" | "ev" => Ok(MetricKind::EnterpriseValue),
            "pe" | "price_earnings" => Ok(MetricKind::PriceEarnings),
            "pb" | "price_book" => Ok(MetricKind::PriceBook),
            "ev_to_revenue" => Ok(MetricKind::EvToRevenue),
            "ev_to_ebitda" => Ok(MetricKind::EvToEbitda),
            "ev_to_ebit" => Ok(MetricKind::EvToEbit),
            other => Err(format!("Unknown metric: {other}")),
        }
    }
}

/// The full derived ratio set for one company and one fiscal period.
///
/// Margins and return ratios are fractions (0.35 = 35%); scaling x100
/// happens only at presentation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatioSet {
    pub ticker: String,
    pub company: String,
    pub fiscal_year: i32,

    // --- Margins (fractions) ---
    pub gross_margin: Metric,
    pub operating_margin: Metric,
    pub net_margin: Metric,
    pub ebitda_margin: Metric,
    pub fcf_margin: Metric,

    // --- Returns ---
    pub return_on_equity: Metric,
    pub return_on_assets: Metric,

    // --- Liquidity ---
    pub current_ratio: Metric,

    // --- Leverage ---
    pub debt_to_equity: Metric,
    pub debt_to_assets: Metric,
    pub net_debt: Metric,

    // --- Derived dollar figures ---
    pub ebitda: Metric,
    pub free_cash_flow: Metric,

    // --- Per-share ---
    pub eps: Metric,
    pub book_value_per_share: Metric,

    // --- Valuation (market data required) ---
    pub enterprise_value: Metric,
    pub price_earnings: Metric,
    pub price_book: Metric,
    pub ev_to_revenue: Metric,
    pub ev_to_ebitda: Metric,
    pub ev_to_ebit: Metric,
}

impl RatioSet {
    /// Keyed access for comparison tables and formatters.
    pub fn metric(&self, kind: MetricKind) -> Metric {
        match kind {
            MetricKind::GrossMargin => self.gross_margin,
            MetricKind::OperatingMargin => self.operating_margin,
            MetricKind::NetMargin => self.net_margin,
            MetricKind::EbitdaMargin => self.ebitda_margin,
            MetricKind::FcfMargin => self.fcf_margin,
            MetricKind::ReturnOnEquity => self.return_on_equity,
            MetricKind::ReturnOnAssets => self.return_on_assets,
            MetricKind::CurrentRatio => self.current_ratio,
            MetricKind::DebtToEquity => self.debt_to_equity,
            MetricKind::DebtToAssets => self.debt_to_assets,
            MetricKind::NetDebt => self.net_debt,
            MetricKind::Ebitda => self.ebitda,
            MetricKind::FreeCashFlow => self.free_cash_flow,
            MetricKind::Eps => self.eps,
            MetricKind::BookValuePerShare => self.book_value_per_share,
            MetricKind::EnterpriseValue => self.enterprise_value,
            MetricKind::PriceEarnings => self.price_earnings,
            MetricKind::PriceBook => self.price_book,
            MetricKind::EvToRevenue => self.ev_to_revenue,
            MetricKind::EvToEbitda => self.ev_to_ebitda,
            MetricKind::EvToEbit => self.ev_to_ebit,
        }
    }

    /// Render one cell for tabular output, choosing the unit by kind.
    pub fn display(&self, kind: MetricKind) -> String {
        display_cell(kind, self.metric(kind))
    }
}

/// Format a metric in the unit conventional for its kind: percentages for
/// margins and returns, "x" multiples for ratios, scaled dollars for
/// absolute figures.
pub fn display_cell(kind: MetricKind, m: Metric) -> String {
    match kind {
        MetricKind::GrossMargin
        | MetricKind::OperatingMargin
        | MetricKind::NetMargin
        | MetricKind::EbitdaMargin
        | MetricKind::FcfMargin
        | MetricKind::ReturnOnEquity
        | MetricKind::ReturnOnAssets
        | MetricKind::DebtToAssets => m.display_pct(),
        MetricKind::CurrentRatio
        | MetricKind::DebtToEquity
        | MetricKind::PriceEarnings
        | MetricKind::PriceBook
        | MetricKind::EvToRevenue
        | MetricKind::EvToEbitda
        | MetricKind::EvToEbit => m.display_multiple(),
        MetricKind::NetDebt
        | MetricKind::Ebitda
        | MetricKind::FreeCashFlow
        | MetricKind::EnterpriseValue => m.display_money(),
        MetricKind::Eps | MetricKind::BookValuePerShare => m.display_ratio(),
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Derive the full ratio set for one company.
///
/// Metric-level problems (missing fields, zero denominators, negative
/// earnings) land in the individual `Metric` cells; the only hard errors
/// are structural ones such as a negative reported revenue.
pub fn calculate_ratios(input: &RatioInput) -> CompsResult<ComputationOutput<RatioSet>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_record(&input.record)?;

    let output = derive_ratio_set(input, &mut warnings);

    if input.quote.is_none() {
        warnings.push(format!(
            "{}: no market quote supplied; valuation multiples reported as N/A",
            input.record.ticker
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Comparable Company Ratio Analysis",
        &serde_json::json!({
            "ticker": input.record.ticker,
            "fiscal_year": input.record.period.fiscal_year,
            "da_pct": input.da_pct.map(|p| p.to_string()),
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Core derivation, shared with the comparator so a batch run can reuse
/// per-company warnings without re-wrapping each company in an envelope.
pub(crate) fn derive_ratio_set(input: &RatioInput, warnings: &mut Vec<String>) -> RatioSet {
    let r = &input.record;

    let revenue = Metric::from_reported(r.revenue);
    let net_income = Metric::from_reported(r.net_income);
    let operating_income = Metric::from_reported(r.operating_income);
    let equity = Metric::from_reported(r.total_equity);
    let assets = Metric::from_reported(r.total_assets);
    let debt = Metric::from_reported(r.total_debt);
    let cash = Metric::from_reported(r.cash_and_equivalents);

    // Gross profit: reported when available, otherwise revenue less cost
    let gross_profit = match (r.gross_profit, r.revenue, r.cost_of_revenue) {
        (Some(gp), _, _) => Metric::measured(gp),
        (None, Some(rev), Some(cost)) => Metric::measured(rev - cost),
        _ => Metric::NotAvailable,
    };

    let ebitda = compute_ebitda(input, warnings);

    let free_cash_flow = match (r.operating_cash_flow, r.capital_expenditures) {
        (Some(ocf), Some(capex)) => Metric::measured(ocf - capex),
        _ => Metric::NotAvailable,
    };

    // Shares outstanding gate the whole per-share family
    let shares = match r.shares_outstanding {
        Some(sh) if sh > Decimal::ZERO => Metric::measured(sh),
        Some(_) => Metric::NotMeaningful,
        None => Metric::NotAvailable,
    };

    let eps = Metric::ratio(net_income, shares);
    let book_value_per_share = Metric::ratio(equity, shares);

    // Valuation side: all N/A without a market quote
    let market_cap = match &input.quote {
        Some(q) => Metric::from_reported(q.resolve_market_cap(r.shares_outstanding)),
        None => Metric::NotAvailable,
    };
    let enterprise_value = Metric::difference(Metric::sum(market_cap, debt), cash);

    RatioSet {
        ticker: r.ticker.clone(),
        company: r.company.clone(),
        fiscal_year: r.period.fiscal_year,

        gross_margin: Metric::ratio(gross_profit, revenue),
        operating_margin: Metric::ratio(operating_income, revenue),
        net_margin: Metric::ratio(net_income, revenue),
        ebitda_margin: Metric::ratio(ebitda, revenue),
        fcf_margin: Metric::ratio(free_cash_flow, revenue),

        return_on_equity: Metric::positive_ratio(net_income, equity),
        return_on_assets: Metric::positive_ratio(net_income, assets),

        current_ratio: Metric::positive_ratio(
            Metric::from_reported(r.current_assets),
            Metric::from_reported(r.current_liabilities),
        ),

        debt_to_equity: Metric::positive_ratio(debt, equity),
        debt_to_assets: Metric::positive_ratio(debt, assets),
        net_debt: Metric::difference(debt, cash),

        ebitda,
        free_cash_flow,

        eps,
        book_value_per_share,

        enterprise_value,
        price_earnings: Metric::positive_ratio(market_cap, net_income),
        price_book: Metric::positive_ratio(market_cap, equity),
        ev_to_revenue: Metric::positive_ratio(enterprise_value, revenue),
        ev_to_ebitda: Metric::positive_ratio(enterprise_value, ebitda),
        ev_to_ebit: Metric::positive_ratio(enterprise_value, operating_income),
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

pub(crate) fn validate_record(record: &FinancialStatementRecord) -> CompsResult<()> {
    if let Some(rev) = record.revenue {
        if rev < Decimal::ZERO {
            return Err(CompsError::InvalidInput {
                field: "revenue".into(),
                reason: format!("{}: revenue cannot be negative", record.ticker),
            });
        }
    }
    Ok(())
}

/// EBITDA = operating income + D&A. Reported D&A is preferred; the
/// percentage-of-revenue estimate is an explicit fallback and marks the
/// result estimated.
fn compute_ebitda(input: &RatioInput, warnings: &mut Vec<String>) -> Metric {
    let r = &input.record;
    let operating_income = Metric::from_reported(r.operating_income);

    let da = match (r.depreciation_amortization, input.da_pct, r.revenue) {
        (Some(da), _, _) => Metric::measured(da),
        (None, Some(pct), Some(rev)) => {
            warnings.push(format!(
                "{}: EBITDA uses estimated D&A at {}% of revenue",
                r.ticker,
                (pct * dec!(100)).round_dp(2)
            ));
            Metric::estimated(rev * pct)
        }
        _ => Metric::NotAvailable,
    };

    Metric::sum(operating_income, da)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
