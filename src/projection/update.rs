//! Time-advance: roll both scenario balances forward to a new date

use chrono::{Datelike, NaiveDate};
use log::{debug, warn};

use crate::error::ProjectionError;
use crate::money::{add_years, daily_growth_rate, days_between, DAYS_PER_YEAR};
use super::state::{InitialParameters, LotteryData, State};

/// Produce the record as of `date` after `spending` has left both scenarios.
///
/// Balances grow at the tax-adjusted daily rate for the elapsed days, every
/// annuity payment that fell due in `(last_update_date, date]` is credited,
/// and `spending` is deducted from each scenario independently. Each call is
/// a distinct real-world update: repeating it deducts spending again.
pub fn calculate_update(
    data: &LotteryData,
    spending: f64,
    date: NaiveDate,
) -> Result<LotteryData, ProjectionError> {
    let params = &data.initial_parameters;
    let state = &data.state;

    if date < state.last_update_date {
        return Err(ProjectionError::InvalidDateOrder {
            last_update: state.last_update_date,
            target: date,
        });
    }
    if !spending.is_finite() {
        return Err(ProjectionError::invalid(format!(
            "spending must be a finite amount, got {}",
            spending
        )));
    }

    let days_passed = days_between(state.last_update_date, date);
    let daily_rate = daily_growth_rate(params.savings_apr());
    let tax_rate = params.investment_tax_rate / 100.0;

    let mut lump_balance = grow_balance(state.lump_balance, daily_rate, days_passed, tax_rate);
    let mut annual_balance = grow_balance(state.annual_balance, daily_rate, days_passed, tax_rate);

    let payments = annuity_payments_due(params, state.last_update_date, date);
    annual_balance += payments;

    lump_balance -= spending;
    annual_balance -= spending;

    if lump_balance < 0.0 {
        warn!("lump balance overdrawn by {:.2}, clamping to zero", -lump_balance);
        lump_balance = 0.0;
    }
    if annual_balance < 0.0 {
        warn!("annuity balance overdrawn by {:.2}, clamping to zero", -annual_balance);
        annual_balance = 0.0;
    }

    debug!(
        "update {} -> {}: days={} payments={:.2} spending={:.2} lump={:.2} annual={:.2}",
        state.last_update_date, date, days_passed, payments, spending, lump_balance, annual_balance
    );

    Ok(LotteryData {
        initial_parameters: params.clone(),
        state: State {
            last_update_date: date,
            lump_balance,
            annual_balance,
            years_passed: state.years_passed + days_passed as f64 / DAYS_PER_YEAR,
        },
    })
}

/// Compound a balance over `days` and take tax on any gain
fn grow_balance(balance: f64, daily_rate: f64, days: i64, tax_rate: f64) -> f64 {
    let gross = balance * (1.0 + daily_rate).powf(days as f64);
    let gain = gross - balance;
    // Losses are not taxed (and carry no credit)
    let tax = if gain > 0.0 { gain * tax_rate } else { 0.0 };
    gross - tax
}

/// Total of scheduled annuity payments whose anniversary falls in `(from, to]`.
///
/// Payment 0 is received at setup, so only indices `1..years` are credited.
fn annuity_payments_due(params: &InitialParameters, from: NaiveDate, to: NaiveDate) -> f64 {
    let start_year = params.initial_date.year();
    let mut total = 0.0;

    for year in from.year()..=to.year() {
        let years_since_start = year - start_year;
        if years_since_start <= 0 || years_since_start as u32 >= params.annuity_years() {
            continue;
        }

        let Some(anniversary) = add_years(params.initial_date, years_since_start) else {
            continue;
        };

        if anniversary > from && anniversary <= to {
            let payment = params.scheduled_payment(years_since_start as u32);
            debug!("annuity payment {} due {}: {:.2}", years_since_start, anniversary, payment);
            total += payment;
        }
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{calculate_initial_data, ProjectionConfig, ProjectionEngine, UserInputParameters};
    use approx::assert_relative_eq;
    use proptest::prelude::{prop_assert, proptest};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_inputs() -> UserInputParameters {
        UserInputParameters {
            total_winnings: 100_000_000.0,
            lump_sum_tax: 37.0,
            annuity_tax: 25.0,
            savings_apr: 5.0,
            age: 35,
            death_age: 85,
            years: 30,
            ml: 5_000_000.0,
            investment_tax_rate: 20.0,
            inflation_rate: 3.5,
        }
    }

    fn sample_data() -> LotteryData {
        calculate_initial_data(&sample_inputs(), date(2025, 3, 1)).unwrap()
    }

    #[test]
    fn test_same_day_zero_spending_is_noop() {
        let data = sample_data();
        let updated = calculate_update(&data, 0.0, date(2025, 3, 1)).unwrap();
        assert_eq!(updated.state.lump_balance, data.state.lump_balance);
        assert_eq!(updated.state.annual_balance, data.state.annual_balance);
        assert_eq!(updated.state.years_passed, 0.0);
    }

    #[test]
    fn test_date_before_last_update_fails() {
        let data = sample_data();
        let before = data.clone();
        let err = calculate_update(&data, 100.0, date(2025, 2, 28)).unwrap_err();
        assert_eq!(
            err,
            ProjectionError::InvalidDateOrder {
                last_update: date(2025, 3, 1),
                target: date(2025, 2, 28),
            }
        );
        assert_eq!(data, before);
    }

    #[test]
    fn test_non_finite_spending_rejected() {
        let data = sample_data();
        assert!(matches!(
            calculate_update(&data, f64::NAN, date(2025, 4, 1)),
            Err(ProjectionError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_growth_is_taxed_on_gain_only() {
        let data = sample_data();
        let updated = calculate_update(&data, 0.0, date(2025, 3, 31)).unwrap();

        let daily = daily_growth_rate(5.0);
        let gross = 63_000_000.0 * (1.0 + daily).powf(30.0);
        let expected = gross - (gross - 63_000_000.0) * 0.20;
        assert_relative_eq!(updated.state.lump_balance, expected, max_relative = 1e-12);
        assert_relative_eq!(updated.state.years_passed, 30.0 / 365.25, epsilon = 1e-12);
    }

    #[test]
    fn test_spending_deducted_from_each_scenario_and_clamped() {
        let data = sample_data();
        let base = data.state.annual_balance;

        // More than the annuity balance, less than the lump balance
        let spending = base + 1_000.0;
        let updated = calculate_update(&data, spending, date(2025, 3, 1)).unwrap();
        assert_eq!(updated.state.lump_balance, 63_000_000.0 - spending);
        assert_eq!(updated.state.annual_balance, 0.0);
    }

    #[test]
    fn test_deposit_increases_balances() {
        let data = sample_data();
        let updated = calculate_update(&data, -500.0, date(2025, 3, 1)).unwrap();
        assert_eq!(updated.state.lump_balance, 63_000_500.0);
    }

    #[test]
    fn test_annuity_payment_credited_on_anniversary() {
        let data = sample_data();
        let params = &data.initial_parameters;

        let day_before = calculate_update(&data, 0.0, date(2026, 2, 28)).unwrap();
        let on_anniversary = calculate_update(&day_before, 0.0, date(2026, 3, 1)).unwrap();

        let grown = grow_balance(
            day_before.state.annual_balance,
            daily_growth_rate(5.0),
            1,
            0.20,
        );
        assert_relative_eq!(
            on_anniversary.state.annual_balance,
            grown + params.scheduled_payment(1),
            max_relative = 1e-12
        );

        // No payment credited again the next day
        let next_day = calculate_update(&on_anniversary, 0.0, date(2026, 3, 2)).unwrap();
        let grown_next = grow_balance(
            on_anniversary.state.annual_balance,
            daily_growth_rate(5.0),
            1,
            0.20,
        );
        assert_relative_eq!(next_day.state.annual_balance, grown_next, max_relative = 1e-12);
    }

    #[test]
    fn test_leap_day_start_pays_on_march_first() {
        let data = calculate_initial_data(&sample_inputs(), date(2024, 2, 29)).unwrap();
        let params = &data.initial_parameters;
        assert_eq!(params.predicted_death_date, date(2074, 3, 1));

        assert_eq!(annuity_payments_due(params, date(2024, 2, 29), date(2025, 2, 28)), 0.0);
        assert_relative_eq!(
            annuity_payments_due(params, date(2025, 2, 28), date(2025, 3, 1)),
            params.scheduled_payment(1),
            max_relative = 1e-12
        );
        // Leap target years keep February 29
        assert_relative_eq!(
            annuity_payments_due(params, date(2028, 2, 28), date(2028, 2, 29)),
            params.scheduled_payment(4),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_multi_year_gap_credits_every_missed_payment() {
        let data = sample_data();
        let params = data.initial_parameters.clone();

        let due = annuity_payments_due(&params, date(2025, 3, 1), date(2029, 6, 1));
        let expected: f64 = (1..=4).map(|k| params.scheduled_payment(k)).sum();
        assert_relative_eq!(due, expected, max_relative = 1e-12);

        // Gap over the whole schedule: payments 1..29 only
        let due = annuity_payments_due(&params, date(2025, 3, 1), date(2080, 1, 1));
        let expected: f64 = (1..30).map(|k| params.scheduled_payment(k)).sum();
        assert_relative_eq!(due, expected, max_relative = 1e-12);
    }

    #[test]
    fn test_level_annuity_exhausts_after_schedule() {
        let engine = ProjectionEngine::new(ProjectionConfig { annuity_growth_rate: 1.0 });
        let mut inputs = sample_inputs();
        inputs.years = 3;
        let data = engine.initial_data(&inputs, date(2025, 1, 1)).unwrap();
        let params = &data.initial_parameters;

        assert_eq!(annuity_payments_due(params, date(2025, 1, 1), date(2026, 1, 1)), 25_000_000.0);
        assert_eq!(annuity_payments_due(params, date(2026, 1, 1), date(2027, 1, 1)), 25_000_000.0);
        assert_eq!(annuity_payments_due(params, date(2027, 1, 1), date(2035, 1, 1)), 0.0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_zero_spending_never_shrinks_balances(
            apr_bp in 1u32..2_000,
            tax_bp in 0u32..10_000,
            days in 0i64..20_000,
        ) {
            let mut inputs = sample_inputs();
            inputs.savings_apr = apr_bp as f64 / 100.0;
            inputs.investment_tax_rate = tax_bp as f64 / 100.0;
            let data = calculate_initial_data(&inputs, date(2025, 3, 1)).unwrap();

            let target = date(2025, 3, 1) + chrono::Duration::days(days);
            let updated = calculate_update(&data, 0.0, target).unwrap();
            prop_assert!(updated.state.lump_balance >= data.state.lump_balance);
            prop_assert!(updated.state.annual_balance >= data.state.annual_balance);
        }

        #[test]
        fn prop_earlier_date_always_rejected(back in 1i64..5_000) {
            let data = sample_data();
            let target = data.state.last_update_date - chrono::Duration::days(back);
            let is_order_error = matches!(
                calculate_update(&data, 0.0, target),
                Err(ProjectionError::InvalidDateOrder { .. })
            );
            prop_assert!(is_order_error);
        }
    }
}
