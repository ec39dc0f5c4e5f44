use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::CompsError;
use crate::types::Rate;
use crate::CompsResult;

/// Result of a compound annual growth rate calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CagrOutcome {
    /// Growth rate as a fraction (0.30 = 30% per period).
    pub rate: Rate,
    pub periods: u32,
    /// Set when begin and end have opposite signs. The rate is then
    /// computed on |end| and is economically misleading; presentation
    /// must carry the caution, not just the number.
    pub sign_change: bool,
}

impl CagrOutcome {
    /// Caller-facing label. A sign-change outcome never renders as a
    /// bare number.
    pub fn label(&self) -> String {
        let pct = format!("{:.2}%", (self.rate * dec!(100)).round_dp(2));
        if self.sign_change {
            format!("{pct} (sign change: interpret with caution)")
        } else {
            pct
        }
    }
}

/// CAGR = (end/begin)^(1/N) - 1.
///
/// Undefined for a non-positive base or zero periods. A negative end is
/// returned on the magnitude of the change with `sign_change` set; an
/// end of exactly zero is -100% per period.
pub fn cagr(begin: Decimal, end: Decimal, periods: u32) -> CompsResult<CagrOutcome> {
    if begin <= Decimal::ZERO {
        return Err(CompsError::InvalidInput {
            field: "begin".into(),
            reason: "Growth rate is undefined from a zero or negative base".into(),
        });
    }
    if periods == 0 {
        return Err(CompsError::InvalidInput {
            field: "periods".into(),
            reason: "Number of periods must be positive".into(),
        });
    }

    if end.is_zero() {
        return Ok(CagrOutcome {
            rate: dec!(-1),
            periods,
            sign_change: false,
        });
    }

    let sign_change = end < Decimal::ZERO;
    let ratio = end.abs() / begin;
    let exponent = Decimal::ONE / Decimal::from(periods);
    let rate = ratio.powd(exponent) - Decimal::ONE;

    Ok(CagrOutcome {
        rate,
        periods,
        sign_change,
    })
}

/// CAGR over a (year, value) history: takes the last `years + 1`
/// observations when available, otherwise the whole series, and measures
/// growth between its first and last points.
pub fn cagr_from_series(series: &[(i32, Decimal)], years: u32) -> CompsResult<CagrOutcome> {
    if series.len() < 2 {
        return Err(CompsError::InsufficientData(
            "CAGR requires at least two observations".into(),
        ));
    }

    let mut sorted: Vec<(i32, Decimal)> = series.to_vec();
    sorted.sort_by_key(|(year, _)| *year);

    let window = (years as usize + 1).min(sorted.len());
    let recent = &sorted[sorted.len() - window..];

    let (first_year, first_value) = recent[0];
    let (last_year, last_value) = recent[recent.len() - 1];

    let span = last_year - first_year;
    if span <= 0 {
        return Err(CompsError::InvalidInput {
            field: "series".into(),
            reason: "Observations must span at least one year".into(),
        });
    }

    cagr(first_value, last_value, span as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_trip_recovers_rate() {
        // end = begin * (1+r)^N must recover r
        let cases: &[(Decimal, u32)] = &[
            (dec!(-0.5), 1),
            (dec!(-0.5), 3),
            (dec!(-0.5), 5),
            (dec!(0), 1),
            (dec!(0), 3),
            (dec!(0), 5),
            (dec!(0.3), 1),
            (dec!(0.3), 3),
            (dec!(0.3), 5),
        ];

        for (r, n) in cases {
            let growth = (Decimal::ONE + r).powi(*n as i64);
            let end = dec!(100) * growth;
            let out = cagr(dec!(100), end, *n).unwrap();
            assert!(
                (out.rate - r).abs() < dec!(0.0001),
                "r={r}, n={n}: got {}",
                out.rate
            );
            assert!(!out.sign_change);
        }
    }

    #[test]
    fn test_three_year_doubling() {
        // 100 -> 800 over 3 periods is 2x per period
        let out = cagr(dec!(100), dec!(800), 3).unwrap();
        assert!((out.rate - dec!(1)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_zero_or_negative_begin_rejected() {
        for begin in [dec!(0), dec!(-10)] {
            for end in [dec!(50), dec!(-50)] {
                for n in [1u32, 3, 5] {
                    match cagr(begin, end, n).unwrap_err() {
                        CompsError::InvalidInput { field, .. } => assert_eq!(field, "begin"),
                        other => panic!("Expected InvalidInput, got: {other}"),
                    }
                }
            }
        }
    }

    #[test]
    fn test_zero_periods_rejected() {
        match cagr(dec!(100), dec!(200), 0).unwrap_err() {
            CompsError::InvalidInput { field, .. } => assert_eq!(field, "periods"),
            other => panic!("Expected InvalidInput, got: {other}"),
        }
    }

    #[test]
    fn test_sign_change_flagged_not_hidden() {
        // Profit to loss: the number exists but must carry the caution
        let out = cagr(dec!(100), dec!(-50), 2).unwrap();
        assert!(out.sign_change);
        // (50/100)^(1/2) - 1 ~ -29.29%
        assert!((out.rate - dec!(-0.2929)).abs() < dec!(0.0001));
        assert!(out.label().contains("interpret with caution"));
    }

    #[test]
    fn test_plain_label_has_no_caution() {
        let out = cagr(dec!(100), dec!(130), 1).unwrap();
        assert_eq!(out.label(), "30.00%");
    }

    #[test]
    fn test_end_of_zero_is_total_loss() {
        let out = cagr(dec!(100), dec!(0), 4).unwrap();
        assert_eq!(out.rate, dec!(-1));
        assert!(!out.sign_change);
    }

    #[test]
    fn test_series_uses_last_n_plus_one_points() {
        let series = vec![
            (2019, dec!(100)),
            (2020, dec!(200)),
            (2021, dec!(400)),
            (2022, dec!(800)),
            (2023, dec!(1600)),
        ];
        // 3-year CAGR: 200 (2020) -> 1600 (2023), doubling each year
        let out = cagr_from_series(&series, 3).unwrap();
        assert_eq!(out.periods, 3);
        assert!((out.rate - dec!(1)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_series_shorter_than_window_uses_all() {
        let series = vec![(2022, dec!(100)), (2023, dec!(130))];
        let out = cagr_from_series(&series, 3).unwrap();
        assert_eq!(out.periods, 1);
        assert!((out.rate - dec!(0.3)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_series_single_point_rejected() {
        let series = vec![(2023, dec!(100))];
        assert!(cagr_from_series(&series, 3).is_err());
    }

    #[test]
    fn test_unsorted_series_is_sorted_first() {
        let series = vec![(2023, dec!(1600)), (2020, dec!(200)), (2022, dec!(800))];
        let out = cagr_from_series(&series, 3).unwrap();
        assert_eq!(out.periods, 3);
        // 200 -> 1600 over 3 years
        assert!((out.rate - dec!(1)).abs() < dec!(0.0001));
    }
}
