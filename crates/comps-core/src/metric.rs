use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// A single computed metric.
///
/// Absence and economic meaninglessness are first-class outcomes, decided
/// once by formula policy rather than patched up downstream:
///
/// - `NotAvailable`: an input the formula needs was never reported.
/// - `NotMeaningful`: the inputs exist but the ratio is economically
///   undefined (zero denominator, negative-earnings P/E). Never coerced
///   to zero or an arbitrarily large number.
///
/// Values computed from an estimated input (the D&A-as-%-of-revenue
/// EBITDA fallback) carry `estimated: true` so presentation can flag
/// them instead of blending them silently with measured figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Metric {
    Value { value: Decimal, estimated: bool },
    NotAvailable,
    NotMeaningful,
}

impl Metric {
    /// A metric computed entirely from reported figures.
    pub fn measured(value: Decimal) -> Self {
        Metric::Value {
            value,
            estimated: false,
        }
    }

    /// A metric that depends on at least one estimated input.
    pub fn estimated(value: Decimal) -> Self {
        Metric::Value {
            value,
            estimated: true,
        }
    }

    /// Lift an optional reported figure into a metric.
    pub fn from_reported(value: Option<Decimal>) -> Self {
        match value {
            Some(v) => Metric::measured(v),
            None => Metric::NotAvailable,
        }
    }

    pub fn value(&self) -> Option<Decimal> {
        match self {
            Metric::Value { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn is_estimated(&self) -> bool {
        matches!(self, Metric::Value { estimated: true, .. })
    }

    /// num / den. A zero denominator is `NotMeaningful`; a missing
    /// operand propagates as `NotAvailable`.
    pub fn ratio(num: Metric, den: Metric) -> Metric {
        Metric::combine(num, den, |n, d| {
            if d.is_zero() {
                None
            } else {
                Some(n / d)
            }
        })
    }

    /// num / den where the ratio is only economically defined for a
    /// strictly positive denominator (P/E, P/B, EV/EBITDA and friends).
    pub fn positive_ratio(num: Metric, den: Metric) -> Metric {
        Metric::combine(num, den, |n, d| {
            if d <= Decimal::ZERO {
                None
            } else {
                Some(n / d)
            }
        })
    }

    /// Multiply a metric by a plain factor, keeping sentinels and the
    /// estimated flag intact.
    pub fn scale(self, factor: Decimal) -> Metric {
        match self {
            Metric::Value { value, estimated } => Metric::Value {
                value: value * factor,
                estimated,
            },
            other => other,
        }
    }

    /// a + b, propagating absence and the estimated flag.
    pub fn sum(a: Metric, b: Metric) -> Metric {
        Metric::combine(a, b, |x, y| Some(x + y))
    }

    /// a - b, propagating absence and the estimated flag.
    pub fn difference(a: Metric, b: Metric) -> Metric {
        Metric::combine(a, b, |x, y| Some(x - y))
    }

    fn combine(a: Metric, b: Metric, f: impl FnOnce(Decimal, Decimal) -> Option<Decimal>) -> Metric {
        match (a, b) {
            (Metric::NotAvailable, _) | (_, Metric::NotAvailable) => Metric::NotAvailable,
            (Metric::NotMeaningful, _) | (_, Metric::NotMeaningful) => Metric::NotMeaningful,
            (
                Metric::Value {
                    value: x,
                    estimated: ex,
                },
                Metric::Value {
                    value: y,
                    estimated: ey,
                },
            ) => match f(x, y) {
                Some(v) => Metric::Value {
                    value: v,
                    estimated: ex || ey,
                },
                None => Metric::NotMeaningful,
            },
        }
    }

    // -----------------------------------------------------------------
    // Presentation. Rounding happens here and only here; internal
    // values stay at full precision, and percentages live as fractions
    // until this point.
    // -----------------------------------------------------------------

    /// Plain ratio, 2 decimal places ("1.52").
    pub fn display_ratio(&self) -> String {
        self.render(|v| format!("{:.2}", v.round_dp(2)))
    }

    /// Percentage display: fraction scaled x100, 2 decimal places ("35.21%").
    pub fn display_pct(&self) -> String {
        self.render(|v| format!("{:.2}%", (v * dec!(100)).round_dp(2)))
    }

    /// Valuation multiple ("12.45x").
    pub fn display_multiple(&self) -> String {
        self.render(|v| format!("{:.2}x", v.round_dp(2)))
    }

    /// Currency, scaled to the nearest readable unit ("$12.20B").
    pub fn display_money(&self) -> String {
        self.render(format_money)
    }

    fn render(&self, f: impl FnOnce(Decimal) -> String) -> String {
        match self {
            Metric::Value { value, estimated } => {
                let body = f(*value);
                // Asterisk marks values derived from an estimated input.
                if *estimated {
                    format!("{body}*")
                } else {
                    body
                }
            }
            Metric::NotAvailable => "N/A".to_string(),
            Metric::NotMeaningful => "NM".to_string(),
        }
    }
}

/// Scale a dollar amount into $T / $B / $M with 2 decimal places,
/// falling back to whole dollars below one million.
pub fn format_money(value: Decimal) -> String {
    let trillion = dec!(1000000000000);
    let billion = dec!(1000000000);
    let million = dec!(1000000);
    let abs = value.abs();

    if abs >= trillion {
        format!("${:.2}T", (value / trillion).round_dp(2))
    } else if abs >= billion {
        format!("${:.2}B", (value / billion).round_dp(2))
    } else if abs >= million {
        format!("${:.2}M", (value / million).round_dp(2))
    } else {
        format!("${:.0}", value.round_dp(0))
    }
}
