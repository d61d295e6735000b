//! Daily discounting for annuity present values and real-value conversion
//!
//! Supports:
//! - Present value of dated future payments at a flat daily rate
//! - Level-stream annuity factors (used to express nominal withdrawals in
//!   today's dollars)

use chrono::NaiveDate;

use crate::money::{add_years, days_between};
use crate::projection::InitialParameters;

/// Below this daily rate an annuity factor is just the number of periods
const NEGLIGIBLE_RATE: f64 = 1e-12;

/// Flat daily discount curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyDiscount {
    /// Effective daily rate
    pub daily_rate: f64,
}

impl DailyDiscount {
    pub fn new(daily_rate: f64) -> Self {
        Self { daily_rate }
    }

    /// Discount factor `days` ahead
    pub fn discount_to_day(&self, days: i64) -> f64 {
        (1.0 + self.daily_rate).powf(-(days as f64))
    }

    /// Present value of a stream of `(days_from_now, amount)` payments
    pub fn pv_stream(&self, payments: &[(i64, f64)]) -> f64 {
        payments
            .iter()
            .map(|(days, amount)| amount * self.discount_to_day(*days))
            .sum()
    }

    /// Present value factor of a level stream of `periods` end-of-day payments
    pub fn annuity_factor(&self, periods: i64) -> f64 {
        let n = periods.max(0) as f64;
        if self.daily_rate.abs() < NEGLIGIBLE_RATE {
            return n;
        }
        let v = 1.0 / (1.0 + self.daily_rate);
        (1.0 - v.powf(n)) / self.daily_rate
    }

    /// Average discount over a level stream of `periods` payments.
    ///
    /// Multiplying a nominal per-period amount by this gives its value in
    /// today's money, taking every payment's own date into account.
    pub fn average_discount(&self, periods: i64) -> f64 {
        if periods <= 0 {
            return 1.0;
        }
        self.annuity_factor(periods) / periods as f64
    }
}

/// Annuity payments still to come after `today`, as `(days_from_today, amount)`
pub fn future_annuity_payments(params: &InitialParameters, today: NaiveDate) -> Vec<(i64, f64)> {
    (0..params.annuity_years())
        .filter_map(|k| {
            let payment_date = add_years(params.initial_date, k as i32)?;
            (payment_date > today)
                .then(|| (days_between(today, payment_date), params.scheduled_payment(k)))
        })
        .collect()
}
