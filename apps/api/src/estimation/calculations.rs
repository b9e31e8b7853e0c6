//! Presentation helpers for the estimator: percentages, week/month
//! conversion, USD formatting and risk labels.
//!
//! Rounding is half-up (toward +∞ at .5) to match the numbers the browser
//! shows; currency rounds half away from zero and prints signed zero and
//! non-finite amounts like `Intl.NumberFormat` in `en-US`.

use serde::Serialize;

/// Average weeks per month.
pub const WEEKS_PER_MONTH: f64 = 4.345;

/// A risk bucket and the display color token that goes with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskLevel {
    pub level: &'static str,
    pub color: &'static str,
}

pub const LOW_RISK: RiskLevel = RiskLevel {
    level: "Low Risk",
    color: "bg-green-500",
};
pub const MODERATE_RISK: RiskLevel = RiskLevel {
    level: "Moderate Risk",
    color: "bg-yellow-500",
};
pub const HIGH_RISK: RiskLevel = RiskLevel {
    level: "High Risk",
    color: "bg-orange-500",
};
pub const CRITICAL_RISK: RiskLevel = RiskLevel {
    level: "Critical Risk",
    color: "bg-red-500",
};

fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// `value` as a whole-number percentage of `max`. A non-positive `max` yields 0.
pub fn percentage_of(value: f64, max: f64) -> i64 {
    if max <= 0.0 {
        return 0;
    }
    round_half_up(value / max * 100.0) as i64
}

pub fn months_to_weeks(months: f64) -> i64 {
    round_half_up(months * WEEKS_PER_MONTH) as i64
}

/// Weeks to months, one decimal place.
pub fn weeks_to_months(weeks: f64) -> f64 {
    round_half_up(weeks / WEEKS_PER_MONTH * 10.0) / 10.0
}

/// Whole-dollar USD with en-US grouping: `5000.0` → `"$5,000"`.
/// A negative amount that rounds to zero keeps its sign (`"-$0"`); `NaN`
/// and infinities print as `"$NaN"` and `"$∞"`.
pub fn format_currency(amount: f64) -> String {
    let sign = if amount.is_sign_negative() && !amount.is_nan() {
        "-"
    } else {
        ""
    };
    if amount.is_nan() {
        return "$NaN".to_string();
    }
    if amount.is_infinite() {
        return format!("{sign}$∞");
    }

    let digits = format!("{:.0}", amount.round().abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}${grouped}")
}

/// Four buckets: ≥80 low, ≥60 moderate, ≥40 high, otherwise critical.
pub fn risk_level_for(percentage: f64) -> RiskLevel {
    match percentage {
        p if p >= 80.0 => LOW_RISK,
        p if p >= 60.0 => MODERATE_RISK,
        p if p >= 40.0 => HIGH_RISK,
        _ => CRITICAL_RISK,
    }
}
