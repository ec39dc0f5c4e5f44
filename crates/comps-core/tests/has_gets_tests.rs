#![cfg(feature = "ma")]

use chrono::NaiveDate;
use comps_core::ma::{analyze_has_gets, HasGetsInput, ScenarioConfig};
use comps_core::types::{FinancialStatementRecord, FiscalPeriod, MarketQuote};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// End-to-end Has/Gets run on an NVDA-acquires-LSCC cash deal
// ===========================================================================

fn buyer() -> FinancialStatementRecord {
    FinancialStatementRecord {
        ticker: "NVDA".into(),
        company: "NVIDIA Corporation".into(),
        period: FiscalPeriod {
            fiscal_year: 2025,
            period_end: NaiveDate::from_ymd_opt(2025, 1, 26).unwrap(),
        },
        revenue: Some(dec!(130500000000)),
        cost_of_revenue: None,
        gross_profit: None,
        operating_income: Some(dec!(86090000000)),
        research_development: None,
        sganda: None,
        net_income: Some(dec!(72880000000)),
        depreciation_amortization: None,
        total_assets: Some(dec!(111600000000)),
        total_equity: Some(dec!(79330000000)),
        current_assets: None,
        current_liabilities: None,
        total_debt: Some(dec!(32270000000)),
        cash_and_equivalents: Some(dec!(43210000000)),
        shares_outstanding: Some(dec!(24480000000)),
        operating_cash_flow: None,
        capital_expenditures: None,
    }
}

fn seller() -> FinancialStatementRecord {
    FinancialStatementRecord {
        ticker: "LSCC".into(),
        company: "Lattice Semiconductor".into(),
        period: FiscalPeriod {
            fiscal_year: 2025,
            period_end: NaiveDate::from_ymd_opt(2025, 1, 26).unwrap(),
        },
        revenue: Some(dec!(510000000)),
        cost_of_revenue: None,
        gross_profit: None,
        operating_income: Some(dec!(9700000)),
        research_development: None,
        sganda: None,
        net_income: Some(dec!(61000000)),
        depreciation_amortization: None,
        total_assets: Some(dec!(850000000)),
        total_equity: Some(dec!(700000000)),
        current_assets: None,
        current_liabilities: None,
        total_debt: Some(dec!(133000000)),
        cash_and_equivalents: Some(dec!(136000000)),
        shares_outstanding: Some(dec!(136786394)),
        operating_cash_flow: None,
        capital_expenditures: None,
    }
}

fn deal() -> HasGetsInput {
    HasGetsInput {
        buyer: buyer(),
        buyer_quote: MarketQuote {
            share_price: dec!(131.28),
            market_cap: Some(dec!(3200000000000)),
        },
        seller: seller(),
        seller_quote: MarketQuote {
            share_price: dec!(68.61),
            market_cap: None,
        },
        scenario: ScenarioConfig {
            premium: dec!(0.30),
            synergies_annual: dec!(123200000),
            tax_rate: dec!(0.21),
            interest_rate: dec!(0.04),
            da_pct_buyer: dec!(0.02),
            da_pct_seller: dec!(0.03),
        },
    }
}

#[test]
fn test_full_deal_walkthrough() {
    let out = analyze_has_gets(&deal()).unwrap();
    let r = &out.result;

    // Deal terms: 68.61 * 1.30 = 89.193 per share,
    // 89.193 * 136,786,394 shares ~ $12.20B all cash
    assert!((r.transaction.offer_price_per_share - dec!(89.193)).abs() < dec!(0.001));
    assert!((r.transaction.total_consideration - dec!(12200388840)).abs() < dec!(1000000));

    // Goodwill = consideration - 0.7B book equity
    assert!((r.transaction.goodwill - dec!(11500388840)).abs() < dec!(1000000));

    // Balance sheet: debt stacks, cash funds the deal
    assert_eq!(r.pro_forma.debt, dec!(32403000000));
    let expected_cash =
        dec!(43210000000) - r.transaction.total_consideration + dec!(136000000);
    assert_eq!(r.pro_forma.cash, expected_cash);
    assert!(r.pro_forma.cash > Decimal::ZERO);

    // Income: after-tax synergies on top of both bottom lines
    let expected_ni = dec!(72880000000) + dec!(61000000) + dec!(123200000) * dec!(0.79);
    assert_eq!(r.pro_forma.net_income, expected_ni);

    // EBITDA: 86.09B + 2%*130.5B buyer, 9.7M + 3%*510M seller, plus
    // pre-tax synergies = 88.848B, carried as estimated
    let ebitda = r.pro_forma.ebitda.value().unwrap();
    assert!((ebitda - dec!(88848200000)).abs() < dec!(1000000));
    assert!(r.pro_forma.ebitda.is_estimated());
    assert!(r.pro_forma_ratios.ebitda.is_estimated());

    // Combined leverage stays modest: debt/EBITDA ~ 0.36x
    let leverage = r.buyer_gets.debt_to_ebitda.value().unwrap();
    assert!((leverage - dec!(0.3647)).abs() < dec!(0.001), "leverage: {leverage}");
}

#[test]
fn test_four_views_are_coherent() {
    let out = analyze_has_gets(&deal()).unwrap();
    let r = &out.result;

    // Seller has: priced at the screen, gets: priced at the offer
    assert_eq!(r.seller_has.share_price, dec!(68.61));
    assert!((r.seller_gets.share_price - dec!(89.193)).abs() < dec!(0.001));
    assert_eq!(
        r.seller_gets.equity_value.value().unwrap(),
        r.transaction.total_consideration
    );

    // Operating ratios do not move with the price
    assert_eq!(r.seller_has.debt_to_ebitda, r.seller_gets.debt_to_ebitda);
    assert_eq!(
        r.seller_has.ebitda_to_interest,
        r.seller_gets.ebitda_to_interest
    );

    // Buyer gets is the combined entity: more debt than buyer has
    let has_debt_ratio = r
        .buyer_has
        .capitalization
        .debt_to_cap_book
        .value()
        .unwrap();
    let gets_debt_ratio = r
        .buyer_gets
        .capitalization
        .debt_to_cap_book
        .value()
        .unwrap();
    assert!(gets_debt_ratio > has_debt_ratio);
}

#[test]
fn test_estimation_warnings_surface_in_envelope() {
    let out = analyze_has_gets(&deal()).unwrap();

    // Neither side reports D&A, so every EBITDA figure is estimated and
    // the envelope says so
    assert!(out
        .warnings
        .iter()
        .any(|w| w.contains("estimated D&A")));
}

#[test]
fn test_serialization_shape() {
    // The output must serialize for downstream JSON consumers; metric
    // sentinels become tagged objects rather than nulls or magic numbers
    let out = analyze_has_gets(&deal()).unwrap();
    let json = serde_json::to_value(&out).unwrap();

    assert_eq!(json["methodology"], "Has/Gets Pro-Forma Analysis");
    assert!(json["result"]["transaction"]["total_consideration"].is_string());

    let pe = &json["result"]["buyer_has"]["price_earnings"];
    assert_eq!(pe["status"], "value");
}
