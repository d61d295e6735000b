//! User-supplied scenario parameters

use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;

/// Oldest accepted age at death
pub const MAX_AGE: u32 = 150;

/// Longest accepted annuity schedule, in annual payments
pub const MAX_ANNUITY_YEARS: u32 = 200;

/// Parameters entered once when the projection is set up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInputParameters {
    /// Advertised jackpot before any tax
    pub total_winnings: f64,

    /// Effective tax on the lump-sum payout (percent)
    pub lump_sum_tax: f64,

    /// Effective tax on the annuity payouts (percent)
    pub annuity_tax: f64,

    /// Nominal savings APR applied to both scenarios (percent)
    pub savings_apr: f64,

    /// Current age of the winner
    pub age: u32,

    /// Expected age at death, end of the planning horizon
    pub death_age: u32,

    /// Number of annual annuity payments
    pub years: u32,

    /// Amount to leave behind, in today's dollars
    pub ml: f64,

    /// Tax on investment gains (percent)
    pub investment_tax_rate: f64,

    /// Expected annual inflation (percent)
    pub inflation_rate: f64,
}

impl UserInputParameters {
    /// Check domain constraints before projecting
    pub fn validate(&self) -> Result<(), ProjectionError> {
        check_amount("total_winnings", self.total_winnings)?;
        check_amount("ml", self.ml)?;

        check_rate("lump_sum_tax", self.lump_sum_tax)?;
        check_rate("annuity_tax", self.annuity_tax)?;
        check_rate("savings_apr", self.savings_apr)?;
        check_rate("investment_tax_rate", self.investment_tax_rate)?;
        check_rate("inflation_rate", self.inflation_rate)?;

        if self.age == 0 {
            return Err(ProjectionError::invalid("age must be greater than zero"));
        }
        if self.death_age <= self.age {
            return Err(ProjectionError::invalid(format!(
                "death_age ({}) must be greater than age ({})",
                self.death_age, self.age
            )));
        }
        if self.death_age > MAX_AGE {
            return Err(ProjectionError::invalid(format!(
                "death_age ({}) must not exceed {}",
                self.death_age, MAX_AGE
            )));
        }
        if self.years == 0 {
            return Err(ProjectionError::invalid("years must be greater than zero"));
        }
        if self.years > MAX_ANNUITY_YEARS {
            return Err(ProjectionError::invalid(format!(
                "years ({}) must not exceed {}",
                self.years, MAX_ANNUITY_YEARS
            )));
        }

        Ok(())
    }

    /// Whole years between the current age and the expected age at death
    pub fn horizon_years(&self) -> u32 {
        self.death_age.saturating_sub(self.age)
    }
}

impl Default for UserInputParameters {
    /// Setup-form defaults; ages and amounts still need filling in
    fn default() -> Self {
        Self {
            total_winnings: 0.0,
            lump_sum_tax: 37.0,
            annuity_tax: 25.0,
            savings_apr: 5.0,
            age: 0,
            death_age: 0,
            years: 30,
            ml: 0.0,
            investment_tax_rate: 20.0,
            inflation_rate: 3.5,
        }
    }
}

fn check_amount(name: &str, value: f64) -> Result<(), ProjectionError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ProjectionError::invalid(format!(
            "{} must be a finite non-negative amount, got {}",
            name, value
        )));
    }
    Ok(())
}

fn check_rate(name: &str, value: f64) -> Result<(), ProjectionError> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(ProjectionError::invalid(format!(
            "{} must be a percentage between 0 and 100, got {}",
            name, value
        )));
    }
    Ok(())
}
