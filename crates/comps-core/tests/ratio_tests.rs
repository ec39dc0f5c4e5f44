use chrono::NaiveDate;
use comps_core::metric::Metric;
use comps_core::ratios::{calculate_ratios, RatioInput};
use comps_core::types::{FinancialStatementRecord, FiscalPeriod, MarketQuote};
use rust_decimal_macros::dec;

// ===========================================================================
// Single-company ratio tests against 10-K-shaped figures
// ===========================================================================

fn intel_fy2024() -> FinancialStatementRecord {
    // Loss-making year: the per-share and earnings multiples must degrade
    // to sentinels, not numbers.
    FinancialStatementRecord {
        ticker: "INTC".into(),
        company: "Intel Corporation".into(),
        period: FiscalPeriod {
            fiscal_year: 2024,
            period_end: NaiveDate::from_ymd_opt(2024, 12, 28).unwrap(),
        },
        revenue: Some(dec!(53101000000)),
        cost_of_revenue: Some(dec!(35756000000)),
        gross_profit: Some(dec!(17345000000)),
        operating_income: Some(dec!(-11678000000)),
        research_development: Some(dec!(16546000000)),
        sganda: Some(dec!(5507000000)),
        net_income: Some(dec!(-18756000000)),
        depreciation_amortization: None,
        total_assets: Some(dec!(196485000000)),
        total_equity: Some(dec!(99270000000)),
        current_assets: Some(dec!(47324000000)),
        current_liabilities: Some(dec!(35666000000)),
        total_debt: Some(dec!(50011000000)),
        cash_and_equivalents: Some(dec!(8249000000)),
        shares_outstanding: Some(dec!(4330000000)),
        operating_cash_flow: Some(dec!(8288000000)),
        capital_expenditures: Some(dec!(23944000000)),
    }
}

fn nvidia_fy2025() -> FinancialStatementRecord {
    FinancialStatementRecord {
        ticker: "NVDA".into(),
        company: "NVIDIA Corporation".into(),
        period: FiscalPeriod {
            fiscal_year: 2025,
            period_end: NaiveDate::from_ymd_opt(2025, 1, 26).unwrap(),
        },
        revenue: Some(dec!(130497000000)),
        cost_of_revenue: Some(dec!(32639000000)),
        gross_profit: Some(dec!(97858000000)),
        operating_income: Some(dec!(81453000000)),
        research_development: Some(dec!(12914000000)),
        sganda: Some(dec!(3491000000)),
        net_income: Some(dec!(72880000000)),
        depreciation_amortization: None,
        total_assets: Some(dec!(111601000000)),
        total_equity: Some(dec!(79327000000)),
        current_assets: Some(dec!(80126000000)),
        current_liabilities: Some(dec!(18047000000)),
        total_debt: Some(dec!(10270000000)),
        cash_and_equivalents: Some(dec!(43210000000)),
        shares_outstanding: Some(dec!(24480000000)),
        operating_cash_flow: Some(dec!(64089000000)),
        capital_expenditures: Some(dec!(3236000000)),
    }
}

#[test]
fn test_intel_negative_earnings_sentinels() {
    let input = RatioInput {
        record: intel_fy2024(),
        quote: Some(MarketQuote {
            share_price: dec!(20.05),
            market_cap: Some(dec!(86800000000)),
        }),
        da_pct: None,
    };
    let out = calculate_ratios(&input).unwrap();
    let r = &out.result;

    // Net income -18.756B: P/E must be NotMeaningful, never numeric
    assert_eq!(r.price_earnings, Metric::NotMeaningful);

    // Margins on a positive revenue remain values, just negative
    let net_margin = r.net_margin.value().unwrap();
    assert!(net_margin < dec!(0));
    assert!((net_margin * dec!(100) - dec!(-35.32)).abs() < dec!(0.01));

    // ROE with positive equity and negative earnings is still a value
    assert!(r.return_on_equity.value().unwrap() < dec!(0));

    // EPS is negative, not suppressed
    assert!(r.eps.value().unwrap() < dec!(0));

    // P/B is unaffected by the loss
    let pb = r.price_book.value().unwrap();
    assert!((pb - dec!(0.87)).abs() < dec!(0.01), "P/B: {pb}");
}

#[test]
fn test_nvidia_margin_set() {
    let input = RatioInput {
        record: nvidia_fy2025(),
        quote: None,
        da_pct: None,
    };
    let out = calculate_ratios(&input).unwrap();
    let r = &out.result;

    // Gross margin = 97.858 / 130.497 ~ 74.99%
    assert_eq!(r.gross_margin.display_pct(), "74.99%");
    // Operating margin ~ 62.42%
    assert_eq!(r.operating_margin.display_pct(), "62.42%");
    // Net margin ~ 55.85%
    assert_eq!(r.net_margin.display_pct(), "55.85%");
    // Current ratio = 80.126 / 18.047 ~ 4.44x
    assert_eq!(r.current_ratio.display_multiple(), "4.44x");
}

#[test]
fn test_rounding_only_at_presentation() {
    // Internal value keeps full precision; two display paths agree
    let input = RatioInput {
        record: nvidia_fy2025(),
        quote: None,
        da_pct: None,
    };
    let out = calculate_ratios(&input).unwrap();

    let fraction = out.result.gross_margin.value().unwrap();
    let display_from_fraction = format!("{:.2}%", (fraction * dec!(100)).round_dp(2));
    assert_eq!(out.result.gross_margin.display_pct(), display_from_fraction);

    // The stored fraction is not itself rounded to 2 dp
    assert_ne!(fraction, fraction.round_dp(2));
}

#[test]
fn test_intel_estimated_ebitda_path() {
    let input = RatioInput {
        record: intel_fy2024(),
        quote: Some(MarketQuote {
            share_price: dec!(20.05),
            market_cap: Some(dec!(86800000000)),
        }),
        da_pct: Some(dec!(0.08)),
    };
    let out = calculate_ratios(&input).unwrap();
    let r = &out.result;

    // EBITDA = -11.678B + 8% * 53.101B = -7.43B, estimated and negative
    let ebitda = r.ebitda.value().unwrap();
    assert!((ebitda - dec!(-7429920000)).abs() < dec!(1000000));
    assert!(r.ebitda.is_estimated());

    // EV/EBITDA on a negative EBITDA is NotMeaningful
    assert_eq!(r.ev_to_ebitda, Metric::NotMeaningful);
}

#[test]
fn test_negative_free_cash_flow_is_a_value() {
    let input = RatioInput {
        record: intel_fy2024(),
        quote: None,
        da_pct: None,
    };
    let out = calculate_ratios(&input).unwrap();

    // OCF 8.288B - capex 23.944B = -15.656B
    assert_eq!(
        out.result.free_cash_flow,
        Metric::measured(dec!(-15656000000))
    );
}
