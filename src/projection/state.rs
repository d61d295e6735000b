//! Persisted projection records: derived parameters and the rolling state

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::inputs::UserInputParameters;

/// Parameters derived once at setup and never changed afterwards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialParameters {
    /// User inputs, kept for reference and export
    pub user_inputs: UserInputParameters,

    /// Calendar year of the setup date
    pub start_year: i32,

    /// Setup date; annuity payments fall on its anniversaries
    pub initial_date: NaiveDate,

    /// Setup date moved forward by (death_age - age) years
    pub predicted_death_date: NaiveDate,

    /// Lump sum after tax
    pub lump_sum_net: f64,

    /// First year's annuity payment
    pub base_annuity_payment: f64,

    /// Year-over-year payment multiplier (1.05 = payments grow 5% a year)
    pub annuity_growth_rate: f64,

    /// Copied from user inputs (percent)
    pub investment_tax_rate: f64,

    /// Copied from user inputs (percent)
    pub inflation_rate: f64,
}

impl InitialParameters {
    /// Scheduled annuity payment for a year index (0 = first payment)
    pub fn scheduled_payment(&self, years_since_start: u32) -> f64 {
        self.base_annuity_payment * self.annuity_growth_rate.powi(years_since_start as i32)
    }

    /// Number of annual annuity payments
    pub fn annuity_years(&self) -> u32 {
        self.user_inputs.years
    }

    /// Nominal savings APR (percent)
    pub fn savings_apr(&self) -> f64 {
        self.user_inputs.savings_apr
    }
}

/// Balances of both payout scenarios as of the last update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Date the balances were last rolled forward to
    pub last_update_date: NaiveDate,

    /// Lump-sum scenario balance
    pub lump_balance: f64,

    /// Annuity scenario cash balance (payments received so far, grown)
    pub annual_balance: f64,

    /// Fractional years elapsed since setup
    pub years_passed: f64,
}

/// Complete saved record for one winner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotteryData {
    pub initial_parameters: InitialParameters,
    pub state: State,
}
