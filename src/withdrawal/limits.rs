//! Sustainable withdrawal limits for both payout scenarios

use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::money::{daily_growth_rate, daily_inflation_rate, days_between, DAYS_PER_YEAR};
use crate::projection::LotteryData;
use super::discount::{future_annuity_payments, DailyDiscount};
use super::solver::sustainable_withdrawal;

/// Withdrawal cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
}

impl Frequency {
    pub const ALL: [Frequency; 4] = [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Biweekly,
        Frequency::Monthly,
    ];

    /// Days per period (average month length for monthly)
    pub fn days(&self) -> f64 {
        match self {
            Frequency::Daily => 1.0,
            Frequency::Weekly => 7.0,
            Frequency::Biweekly => 14.0,
            Frequency::Monthly => 30.44,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Biweekly => "Biweekly",
            Frequency::Monthly => "Monthly",
        }
    }
}

/// A withdrawal amount in future dollars and in today's dollars
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalAmount {
    pub nominal: f64,
    pub real: f64,
}

/// Withdrawal amounts at every cadence for one scenario
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioLimits {
    pub daily: WithdrawalAmount,
    pub weekly: WithdrawalAmount,
    pub biweekly: WithdrawalAmount,
    pub monthly: WithdrawalAmount,
}

impl ScenarioLimits {
    /// Scale a daily amount to every cadence; `real_factor` converts nominal to real
    fn from_daily(daily_nominal: f64, real_factor: f64) -> Self {
        let at = |frequency: Frequency| {
            let nominal = daily_nominal * frequency.days();
            WithdrawalAmount {
                nominal,
                real: nominal * real_factor,
            }
        };

        Self {
            daily: at(Frequency::Daily),
            weekly: at(Frequency::Weekly),
            biweekly: at(Frequency::Biweekly),
            monthly: at(Frequency::Monthly),
        }
    }

    pub fn get(&self, frequency: Frequency) -> WithdrawalAmount {
        match frequency {
            Frequency::Daily => self.daily,
            Frequency::Weekly => self.weekly,
            Frequency::Biweekly => self.biweekly,
            Frequency::Monthly => self.monthly,
        }
    }
}

/// Display view computed from the current record; never persisted
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalLimits {
    /// Lump-sum scenario
    pub lump: ScenarioLimits,

    /// Annuity scenario (cash balance plus value of payments still to come)
    pub annual: ScenarioLimits,

    /// Years until the predicted death date
    pub years_remaining: f64,

    /// Legacy target in dollars of the predicted death date
    pub inflation_adjusted_target: f64,
}

/// Solve the sustainable withdrawal limits as of `today`.
///
/// Returns `None` once `today` is on or after the predicted death date:
/// there is no horizon left to plan over.
pub fn calculate_withdrawal_limits(data: &LotteryData, today: NaiveDate) -> Option<WithdrawalLimits> {
    let params = &data.initial_parameters;
    let state = &data.state;

    let days_remaining = days_between(today, params.predicted_death_date);
    if days_remaining <= 0 {
        warn!(
            "no withdrawal plan: {} is on or past predicted death date {}",
            today, params.predicted_death_date
        );
        return None;
    }

    let daily_rate = daily_growth_rate(params.savings_apr());
    let tax_rate = params.investment_tax_rate / 100.0;
    let daily_inflation = daily_inflation_rate(params.inflation_rate);

    // Legacy goal is in today's dollars; express it in dollars of the end date
    let inflation_adjusted_target =
        params.user_inputs.ml * (1.0 + daily_inflation).powf(days_remaining as f64);

    let daily_lump = sustainable_withdrawal(
        state.lump_balance,
        inflation_adjusted_target,
        daily_rate,
        days_remaining,
        tax_rate,
    );

    // Future annuity payments count as principal, discounted at the growth rate
    let growth_curve = DailyDiscount::new(daily_rate);
    let pv_future_payments = growth_curve.pv_stream(&future_annuity_payments(params, today));
    let annuity_principal = state.annual_balance + pv_future_payments;

    let daily_annual = sustainable_withdrawal(
        annuity_principal,
        inflation_adjusted_target,
        daily_rate,
        days_remaining,
        tax_rate,
    );

    // Real value of a level stream, not of a single payment at the horizon
    let real_factor = DailyDiscount::new(daily_inflation).average_discount(days_remaining);

    debug!(
        "withdrawal limits as of {}: days={} target={:.2} pv_future={:.2} lump={:.2}/day annual={:.2}/day",
        today, days_remaining, inflation_adjusted_target, pv_future_payments, daily_lump, daily_annual
    );

    Some(WithdrawalLimits {
        lump: ScenarioLimits::from_daily(daily_lump, real_factor),
        annual: ScenarioLimits::from_daily(daily_annual, real_factor),
        years_remaining: days_remaining as f64 / DAYS_PER_YEAR,
        inflation_adjusted_target,
    })
}
