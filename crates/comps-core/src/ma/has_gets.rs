use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CompsError;
use crate::metric::Metric;
use crate::ratios::{self, RatioInput, RatioSet};
use crate::types::*;
use crate::CompsResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Deal assumptions for a cash acquisition. Every field is required:
/// premium, synergies, tax, financing and D&A estimates are analyst
/// choices, never hidden defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Offer premium over the seller's current share price (0.30 = 30%).
    pub premium: Rate,
    /// Annual pre-tax synergies (run-rate).
    pub synergies_annual: Money,
    /// Corporate tax rate applied to synergies.
    pub tax_rate: Rate,
    /// Assumed interest rate on total debt, for coverage ratios.
    pub interest_rate: Rate,
    /// D&A as a fraction of revenue for the buyer, when not reported.
    pub da_pct_buyer: Rate,
    /// D&A as a fraction of revenue for the seller, when not reported.
    pub da_pct_seller: Rate,
}

/// Input for a Has/Gets analysis: buyer and seller records with market
/// quotes, plus the scenario assumptions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HasGetsInput {
    pub buyer: FinancialStatementRecord,
    pub buyer_quote: MarketQuote,
    pub seller: FinancialStatementRecord,
    pub seller_quote: MarketQuote,
    pub scenario: ScenarioConfig,
}

/// The deal terms derived from the scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub offer_price_per_share: Money,
    pub premium: Rate,
    pub total_consideration: Money,
    /// Consideration less the seller's book equity.
    pub goodwill: Money,
}

/// Pro-forma combined financial position, all-cash consideration.
/// EBITDA may rest on the D&A percentage estimates or be underivable
/// outright, so it stays a `Metric` rather than collapsing to a number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProFormaCombination {
    pub net_income: Money,
    pub ebitda: Metric,
    pub debt: Money,
    pub cash: Money,
    pub equity: Money,
    pub interest_expense: Money,
}

/// Capitalization ratios against both denominators. The base is in the
/// field name; there is no unlabeled variant to pick silently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapitalizationView {
    /// Debt / (debt + book equity).
    pub debt_to_cap_book: Metric,
    /// Debt / (debt + equity market value). For a "gets" view the market
    /// value is the offer value, not the pre-deal quote.
    pub debt_to_cap_market: Metric,
    /// Net debt / (debt + book equity). Negative means net cash.
    pub net_debt_to_cap_book: Metric,
    /// Net debt / (debt + equity market value). Negative means net cash.
    pub net_debt_to_cap_market: Metric,
}

/// One side of the Has/Gets table: a party's position before ("has") or
/// after ("gets") the transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SideView {
    pub share_price: Money,
    /// Market value of the equity this view prices: pre-deal market cap
    /// for a "has" view, offer consideration for the seller's "gets".
    pub equity_value: Metric,
    pub price_earnings: Metric,
    pub debt_to_ebitda: Metric,
    pub ebitda_to_interest: Metric,
    pub capitalization: CapitalizationView,
}

/// Full Has/Gets output: four views, the deal terms, the combined
/// position, and the ratio set recomputed over the combined entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HasGetsOutput {
    pub transaction: Transaction,
    pub seller_has: SideView,
    pub seller_gets: SideView,
    pub buyer_has: SideView,
    pub buyer_gets: SideView,
    pub pro_forma: ProFormaCombination,
    /// The combined entity run back through the single-company ratio
    /// calculator, so pro-forma ratios share the standalone formulas.
    pub pro_forma_ratios: RatioSet,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run a Has/Gets pro-forma analysis for a cash acquisition.
pub fn analyze_has_gets(input: &HasGetsInput) -> CompsResult<ComputationOutput<HasGetsOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    // ------------------------------------------------------------------
    // 1. Validate scenario and structural inputs
    // ------------------------------------------------------------------
    validate_scenario(input)?;

    let s = &input.scenario;
    let buyer = Party::extract(&input.buyer, "buyer")?;
    let seller = Party::extract(&input.seller, "seller")?;
    let seller_shares = require(input.seller.shares_outstanding, "seller.shares_outstanding")?;

    // ------------------------------------------------------------------
    // 2. Deal terms
    // ------------------------------------------------------------------
    let offer_price = input.seller_quote.share_price * (Decimal::ONE + s.premium);
    let total_consideration = offer_price * seller_shares;
    let goodwill = total_consideration - seller.equity;

    if goodwill < Decimal::ZERO {
        warnings.push(
            "Consideration is below the seller's book equity (negative goodwill)".into(),
        );
    }

    // ------------------------------------------------------------------
    // 3. Standalone ("has") views
    // ------------------------------------------------------------------
    let seller_has = side_view(
        &input.seller,
        &input.seller_quote,
        Some(s.da_pct_seller),
        s.interest_rate,
        &seller,
        &mut warnings,
    );
    let buyer_has = side_view(
        &input.buyer,
        &input.buyer_quote,
        Some(s.da_pct_buyer),
        s.interest_rate,
        &buyer,
        &mut warnings,
    );

    // ------------------------------------------------------------------
    // 4. Seller gets: re-priced at the offer, operating metrics unchanged
    // ------------------------------------------------------------------
    let seller_gets = seller_gets_view(
        &seller_has,
        &seller,
        seller_shares,
        offer_price,
        total_consideration,
    );

    // ------------------------------------------------------------------
    // 5. Pro-forma combination
    // ------------------------------------------------------------------
    let after_tax_synergies = s.synergies_annual * (Decimal::ONE - s.tax_rate);
    let combined_net_income = buyer.net_income + seller.net_income + after_tax_synergies;
    let combined_debt = buyer.debt + seller.debt;
    let combined_cash = buyer.cash - total_consideration + seller.cash;
    let combined_equity = buyer.equity - total_consideration + goodwill;
    let combined_interest = combined_debt * s.interest_rate;

    if combined_cash < Decimal::ZERO {
        warnings.push(
            "Pro-forma cash is negative; the cash consideration exceeds combined balances".into(),
        );
    }

    let (combined_record, combined_da_pct) = combine_records(
        input,
        &buyer,
        &seller,
        total_consideration,
        goodwill,
        combined_net_income,
        combined_debt,
        combined_cash,
        combined_equity,
    );

    // ------------------------------------------------------------------
    // 6. Buyer gets: the combined entity, same formulas as standalone
    // ------------------------------------------------------------------
    let combined_party = Party {
        revenue: buyer.revenue + seller.revenue,
        operating_income: buyer.operating_income + seller.operating_income + s.synergies_annual,
        net_income: combined_net_income,
        debt: combined_debt,
        cash: combined_cash,
        equity: combined_equity,
    };
    let buyer_gets = side_view(
        &combined_record,
        &input.buyer_quote,
        combined_da_pct,
        s.interest_rate,
        &combined_party,
        &mut warnings,
    );

    let pro_forma_ratios = ratios::derive_ratio_set(
        &RatioInput {
            record: combined_record,
            quote: Some(input.buyer_quote.clone()),
            da_pct: combined_da_pct,
        },
        &mut warnings,
    );

    let combined_ebitda = pro_forma_ratios.ebitda;

    // ------------------------------------------------------------------
    // Build output
    // ------------------------------------------------------------------
    let output = HasGetsOutput {
        transaction: Transaction {
            offer_price_per_share: offer_price,
            premium: s.premium,
            total_consideration,
            goodwill,
        },
        seller_has,
        seller_gets,
        buyer_has,
        buyer_gets,
        pro_forma: ProFormaCombination {
            net_income: combined_net_income,
            ebitda: combined_ebitda,
            debt: combined_debt,
            cash: combined_cash,
            equity: combined_equity,
            interest_expense: combined_interest,
        },
        pro_forma_ratios,
    };

    // The combined record is analysed twice (side view + ratio set) and
    // would repeat its estimation warning.
    warnings.dedup();

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Has/Gets Pro-Forma Analysis",
        &serde_json::json!({
            "buyer": input.buyer.ticker,
            "seller": input.seller.ticker,
            "consideration": "all cash",
            "premium": s.premium.to_string(),
            "synergies_annual": s.synergies_annual.to_string(),
            "tax_rate": s.tax_rate.to_string(),
            "interest_rate": s.interest_rate.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// The statement fields a pro-forma combination cannot do without.
struct Party {
    revenue: Money,
    operating_income: Money,
    net_income: Money,
    debt: Money,
    cash: Money,
    equity: Money,
}

impl Party {
    fn extract(record: &FinancialStatementRecord, side: &str) -> CompsResult<Party> {
        Ok(Party {
            revenue: require(record.revenue, &format!("{side}.revenue"))?,
            operating_income: require(
                record.operating_income,
                &format!("{side}.operating_income"),
            )?,
            net_income: require(record.net_income, &format!("{side}.net_income"))?,
            debt: require(record.total_debt, &format!("{side}.total_debt"))?,
            cash: require(record.cash_and_equivalents, &format!("{side}.cash_and_equivalents"))?,
            equity: require(record.total_equity, &format!("{side}.total_equity"))?,
        })
    }
}

fn require(value: Option<Decimal>, field: &str) -> CompsResult<Decimal> {
    value.ok_or_else(|| CompsError::InsufficientData(format!("missing required field {field}")))
}

fn validate_scenario(input: &HasGetsInput) -> CompsResult<()> {
    let s = &input.scenario;

    if s.premium < dec!(-1) {
        return Err(CompsError::InvalidScenario(
            "Premium below -100% would imply a negative offer price".into(),
        ));
    }
    if input.seller_quote.share_price <= Decimal::ZERO {
        return Err(CompsError::InvalidScenario(
            "Seller share price must be positive".into(),
        ));
    }
    if s.tax_rate < Decimal::ZERO || s.tax_rate > Decimal::ONE {
        return Err(CompsError::InvalidScenario(
            "Tax rate must be between 0 and 1".into(),
        ));
    }
    if s.interest_rate < Decimal::ZERO {
        return Err(CompsError::InvalidScenario(
            "Interest rate cannot be negative".into(),
        ));
    }
    if s.da_pct_buyer < Decimal::ZERO || s.da_pct_seller < Decimal::ZERO {
        return Err(CompsError::InvalidScenario(
            "D&A percentage estimates cannot be negative".into(),
        ));
    }
    if let Some(shares) = input.seller.shares_outstanding {
        if shares <= Decimal::ZERO {
            return Err(CompsError::InvalidScenario(
                "Seller shares outstanding must be positive".into(),
            ));
        }
    }

    Ok(())
}

/// Standalone view of one party: leverage, coverage and capitalization at
/// the current quote, reusing the single-company ratio formulas.
fn side_view(
    record: &FinancialStatementRecord,
    quote: &MarketQuote,
    da_pct: Option<Rate>,
    interest_rate: Rate,
    party: &Party,
    warnings: &mut Vec<String>,
) -> SideView {
    let set = ratios::derive_ratio_set(
        &RatioInput {
            record: record.clone(),
            quote: Some(quote.clone()),
            da_pct,
        },
        warnings,
    );

    let debt = Metric::measured(party.debt);
    let net_debt = Metric::measured(party.debt - party.cash);
    let interest = debt.scale(interest_rate);
    let market_value = Metric::from_reported(quote.resolve_market_cap(record.shares_outstanding));

    SideView {
        share_price: quote.share_price,
        equity_value: market_value,
        price_earnings: set.price_earnings,
        debt_to_ebitda: Metric::positive_ratio(debt, set.ebitda),
        ebitda_to_interest: Metric::positive_ratio(set.ebitda, interest),
        capitalization: capitalization(party.debt, party.cash, party.equity, market_value),
    }
}

/// What the seller receives: the offer re-prices the equity, while the
/// operating ratios (debt/EBITDA, coverage) are unchanged by the price.
fn seller_gets_view(
    seller_has: &SideView,
    seller: &Party,
    seller_shares: Decimal,
    offer_price: Money,
    total_consideration: Money,
) -> SideView {
    // EPS is per-share earnings at the offer; P/E only meaningful for
    // positive earnings, same policy as the standalone calculator.
    let eps = seller.net_income / seller_shares;
    let price_earnings = Metric::positive_ratio(
        Metric::measured(offer_price),
        Metric::measured(eps),
    );

    SideView {
        share_price: offer_price,
        equity_value: Metric::measured(total_consideration),
        price_earnings,
        debt_to_ebitda: seller_has.debt_to_ebitda,
        ebitda_to_interest: seller_has.ebitda_to_interest,
        capitalization: capitalization(
            seller.debt,
            seller.cash,
            seller.equity,
            Metric::measured(total_consideration),
        ),
    }
}

/// Both capitalization bases, labeled. Net debt may be negative and flows
/// through as a negative percentage.
fn capitalization(debt: Money, cash: Money, book_equity: Money, market_value: Metric) -> CapitalizationView {
    let debt_m = Metric::measured(debt);
    let net_debt = Metric::measured(debt - cash);
    let book_cap = Metric::measured(debt + book_equity);
    let market_cap_base = Metric::sum(debt_m, market_value);

    CapitalizationView {
        debt_to_cap_book: Metric::positive_ratio(debt_m, book_cap),
        debt_to_cap_market: Metric::positive_ratio(debt_m, market_cap_base),
        net_debt_to_cap_book: Metric::positive_ratio(net_debt, book_cap),
        net_debt_to_cap_market: Metric::positive_ratio(net_debt, market_cap_base),
    }
}

/// Express the combined entity as a statement record so the standalone
/// ratio calculator can consume it unchanged.
#[allow(clippy::too_many_arguments)]
fn combine_records(
    input: &HasGetsInput,
    buyer: &Party,
    seller: &Party,
    total_consideration: Money,
    goodwill: Money,
    combined_net_income: Money,
    combined_debt: Money,
    combined_cash: Money,
    combined_equity: Money,
) -> (FinancialStatementRecord, Option<Rate>) {
    let s = &input.scenario;
    let b = &input.buyer;
    let t = &input.seller;

    let combined_revenue = buyer.revenue + seller.revenue;
    // Pre-tax synergies flow through operating income, so the combined
    // EBITDA picks them up without special-casing.
    let combined_operating =
        buyer.operating_income + seller.operating_income + s.synergies_annual;

    // D&A: keep reported figures when both sides report; otherwise fall
    // back to the blended percentage estimate so the derived metrics stay
    // flagged as estimated.
    let (reported_da, da_pct) = match (b.depreciation_amortization, t.depreciation_amortization) {
        (Some(bda), Some(tda)) => (Some(bda + tda), None),
        _ => {
            let bda = b
                .depreciation_amortization
                .unwrap_or(buyer.revenue * s.da_pct_buyer);
            let tda = t
                .depreciation_amortization
                .unwrap_or(seller.revenue * s.da_pct_seller);
            let pct = if combined_revenue > Decimal::ZERO {
                Some((bda + tda) / combined_revenue)
            } else {
                None
            };
            (None, pct)
        }
    };

    // Assets shrink by the cash paid out and grow by goodwill created.
    let total_assets = match (b.total_assets, t.total_assets) {
        (Some(ba), Some(ta)) => Some(ba + ta - total_consideration + goodwill),
        _ => None,
    };

    let record = FinancialStatementRecord {
        ticker: format!("{}+{}", b.ticker, t.ticker),
        company: format!("{} (pro forma)", b.company),
        period: b.period,
        revenue: Some(combined_revenue),
        cost_of_revenue: sum_opt(b.cost_of_revenue, t.cost_of_revenue),
        gross_profit: sum_opt(b.gross_profit, t.gross_profit),
        operating_income: Some(combined_operating),
        research_development: sum_opt(b.research_development, t.research_development),
        sganda: sum_opt(b.sganda, t.sganda),
        net_income: Some(combined_net_income),
        depreciation_amortization: reported_da,
        total_assets,
        total_equity: Some(combined_equity),
        current_assets: sum_opt(b.current_assets, t.current_assets),
        current_liabilities: sum_opt(b.current_liabilities, t.current_liabilities),
        total_debt: Some(combined_debt),
        cash_and_equivalents: Some(combined_cash),
        // All-cash deal: the buyer's share count is unchanged.
        shares_outstanding: b.shares_outstanding,
        operating_cash_flow: sum_opt(b.operating_cash_flow, t.operating_cash_flow),
        capital_expenditures: sum_opt(b.capital_expenditures, t.capital_expenditures),
    };

    (record, da_pct)
}

fn sum_opt(a: Option<Money>, b: Option<Money>) -> Option<Money> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x + y),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
