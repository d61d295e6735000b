//! Scalar money and calendar helpers shared by the projection and solver
//!
//! All rate conversions in the crate go through this module so that the
//! update step and the withdrawal solver compound on exactly the same basis.

use chrono::{Datelike, NaiveDate};

/// Days per year used to express elapsed days as fractional years
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Days per year used when converting annual rates to daily rates
pub const RATE_DAYS_PER_YEAR: f64 = 365.0;

/// Whole days from `from` to `to` (negative when `to` is earlier)
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Move `date` forward by whole calendar years.
///
/// February 29 rolls over to March 1 in non-leap target years.
/// Returns `None` only when the result is outside chrono's date range.
pub fn add_years(date: NaiveDate, years: i32) -> Option<NaiveDate> {
    let year = date.year().checked_add(years)?;
    date.with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
}

/// Effective daily growth rate for a nominal APR (in percent).
///
/// The APR compounds monthly; the monthly factor is then re-expressed as an
/// equivalent daily rate over a 365 day year.
pub fn daily_growth_rate(apr_pct: f64) -> f64 {
    let monthly_rate = apr_pct / 100.0 / 12.0;
    (1.0 + monthly_rate).powf(12.0 / RATE_DAYS_PER_YEAR) - 1.0
}

/// Effective daily inflation rate for an annual inflation rate (in percent)
pub fn daily_inflation_rate(annual_pct: f64) -> f64 {
    (1.0 + annual_pct / 100.0).powf(1.0 / RATE_DAYS_PER_YEAR) - 1.0
}

/// Format an amount as compact currency text.
///
/// ```
/// use lottery_projection::money::format_money;
///
/// assert_eq!(format_money(63_000_000.0), "$63.00M");
/// assert_eq!(format_money(1_250.0), "$1.25K");
/// assert_eq!(format_money(f64::NAN), "$0.00");
/// ```
pub fn format_money(value: f64) -> String {
    if !value.is_finite() {
        return "$0.00".to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();

    // Pick the smallest unit whose rounded figure stays below 1000
    let mut scaled = magnitude;
    let mut suffix = "";
    for (scale, unit) in MONEY_UNITS {
        if round_cents(scaled) < 1000.0 {
            break;
        }
        scaled = magnitude / scale;
        suffix = unit;
    }

    let formatted = format!("{:.2}", scaled);
    // Avoid "-$0.00" for tiny negatives that round to zero
    if formatted == "0.00" {
        return "$0.00".to_string();
    }
    format!("{}${}{}", sign, formatted, suffix)
}

/// Compact currency units, smallest first
const MONEY_UNITS: [(f64, &str); 3] = [(1e3, "K"), (1e6, "M"), (1e9, "B")];

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
