//! Initial projection: turns user inputs into the starting record

use chrono::{Datelike, NaiveDate};
use log::debug;

use crate::error::ProjectionError;
use crate::money::add_years;
use super::inputs::UserInputParameters;
use super::state::{InitialParameters, LotteryData, State};

/// Default year-over-year annuity payment growth (payments grow 5% a year)
pub const DEFAULT_ANNUITY_GROWTH_RATE: f64 = 1.05;

/// Environment variable overriding the annuity growth rate
pub const ANNUITY_GROWTH_RATE_ENV: &str = "LOTTERY_ANNUITY_GROWTH_RATE";

/// Configuration for setting up a projection
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionConfig {
    /// Year-over-year multiplier applied to annuity payments.
    /// 1.0 means level payments.
    pub annuity_growth_rate: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            annuity_growth_rate: DEFAULT_ANNUITY_GROWTH_RATE,
        }
    }
}

impl ProjectionConfig {
    /// Build a config from the environment, falling back to defaults
    pub fn from_env() -> Self {
        let annuity_growth_rate: f64 = std::env::var(ANNUITY_GROWTH_RATE_ENV)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_ANNUITY_GROWTH_RATE);

        Self { annuity_growth_rate }
    }

    fn validate(&self) -> Result<(), ProjectionError> {
        if !self.annuity_growth_rate.is_finite() || self.annuity_growth_rate <= 0.0 {
            return Err(ProjectionError::invalid(format!(
                "annuity growth rate must be a positive multiplier, got {}",
                self.annuity_growth_rate
            )));
        }
        Ok(())
    }
}

/// Builds the starting record for a new winner
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with the given config
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Derive initial parameters and state from user inputs as of `start_date`
    pub fn initial_data(
        &self,
        inputs: &UserInputParameters,
        start_date: NaiveDate,
    ) -> Result<LotteryData, ProjectionError> {
        inputs.validate()?;
        self.config.validate()?;

        let predicted_death_date = i32::try_from(inputs.horizon_years())
            .ok()
            .and_then(|years| add_years(start_date, years))
            .ok_or_else(|| {
                ProjectionError::invalid(format!(
                    "predicted death date is out of range ({} + {} years)",
                    start_date,
                    inputs.horizon_years()
                ))
            })?;

        // Lump sum scenario: the whole net payout lands on day one
        let lump_sum_net = inputs.total_winnings * (1.0 - inputs.lump_sum_tax / 100.0);

        // Annuity scenario: the after-tax pool is spread over a growing payment stream
        let annuity_pool = inputs.total_winnings * (1.0 - inputs.annuity_tax / 100.0);
        let growth_rate = self.config.annuity_growth_rate;
        let base_annuity_payment = base_payment(annuity_pool, growth_rate, inputs.years);

        debug!(
            "initial projection: lump_sum_net={:.2} annuity_pool={:.2} base_payment={:.2} growth={}",
            lump_sum_net, annuity_pool, base_annuity_payment, growth_rate
        );

        let initial_parameters = InitialParameters {
            user_inputs: inputs.clone(),
            start_year: start_date.year(),
            initial_date: start_date,
            predicted_death_date,
            lump_sum_net,
            base_annuity_payment,
            annuity_growth_rate: growth_rate,
            investment_tax_rate: inputs.investment_tax_rate,
            inflation_rate: inputs.inflation_rate,
        };

        // First annuity payment is received at setup
        let state = State {
            last_update_date: start_date,
            lump_balance: lump_sum_net,
            annual_balance: base_annuity_payment,
            years_passed: 0.0,
        };

        Ok(LotteryData { initial_parameters, state })
    }
}

/// Initial projection with the default configuration
pub fn calculate_initial_data(
    inputs: &UserInputParameters,
    start_date: NaiveDate,
) -> Result<LotteryData, ProjectionError> {
    ProjectionEngine::default().initial_data(inputs, start_date)
}

/// First payment of a geometric stream of `years` payments summing to `pool`
fn base_payment(pool: f64, growth_rate: f64, years: u32) -> f64 {
    if growth_rate == 1.0 {
        return pool / years as f64;
    }
    pool * (growth_rate - 1.0) / (growth_rate.powi(years as i32) - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
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

    #[test]
    fn test_reference_scenario() {
        let data = calculate_initial_data(&sample_inputs(), date(2025, 3, 1)).unwrap();
        let params = &data.initial_parameters;

        assert_eq!(data.state.lump_balance, 63_000_000.0);
        assert_eq!(params.lump_sum_net, 63_000_000.0);

        // 75M pool, 30 payments growing 5%: first payment = 75M * 0.05 / (1.05^30 - 1)
        let expected = 75_000_000.0 * 0.05 / (1.05_f64.powi(30) - 1.0);
        assert_relative_eq!(params.base_annuity_payment, expected, max_relative = 1e-12);
        assert_relative_eq!(params.base_annuity_payment / 75_000_000.0, 0.01505, epsilon = 1e-4);

        assert_eq!(data.state.annual_balance, params.base_annuity_payment);
        assert_eq!(data.state.years_passed, 0.0);
        assert_eq!(data.state.last_update_date, date(2025, 3, 1));
        assert_eq!(params.start_year, 2025);
        assert_eq!(params.predicted_death_date, date(2075, 3, 1));
        assert_eq!(params.annuity_growth_rate, DEFAULT_ANNUITY_GROWTH_RATE);
    }

    #[test]
    fn test_level_payments_when_growth_is_one() {
        let engine = ProjectionEngine::new(ProjectionConfig { annuity_growth_rate: 1.0 });
        let data = engine.initial_data(&sample_inputs(), date(2025, 1, 1)).unwrap();
        let params = &data.initial_parameters;

        assert_eq!(params.base_annuity_payment, 2_500_000.0);
        assert_eq!(params.base_annuity_payment * 30.0, 75_000_000.0);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let mut inputs = sample_inputs();
        inputs.death_age = 30;
        assert!(matches!(
            calculate_initial_data(&inputs, date(2025, 1, 1)),
            Err(ProjectionError::InvalidInput(_))
        ));

        let engine = ProjectionEngine::new(ProjectionConfig { annuity_growth_rate: f64::NAN });
        assert!(engine.initial_data(&sample_inputs(), date(2025, 1, 1)).is_err());
    }

    #[test]
    fn test_oversized_horizons_never_project() {
        let mut inputs = sample_inputs();
        inputs.years = u32::MAX;
        assert!(matches!(
            calculate_initial_data(&inputs, date(2025, 3, 1)),
            Err(ProjectionError::InvalidInput(_))
        ));

        let mut inputs = sample_inputs();
        inputs.age = 1;
        inputs.death_age = u32::MAX;
        assert!(matches!(
            calculate_initial_data(&inputs, date(2025, 3, 1)),
            Err(ProjectionError::InvalidInput(_))
        ));

        // Longest accepted schedule still yields a positive starting balance
        let mut inputs = sample_inputs();
        inputs.years = crate::projection::MAX_ANNUITY_YEARS;
        let data = calculate_initial_data(&inputs, date(2025, 3, 1)).unwrap();
        assert!(data.state.annual_balance > 0.0);
        assert!(data.initial_parameters.predicted_death_date > date(2025, 3, 1));
    }

    #[test]
    fn test_config_defaults() {
        assert_eq!(ProjectionConfig::default().annuity_growth_rate, 1.05);
        assert_eq!(ProjectionEngine::default().config().annuity_growth_rate, 1.05);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_growing_payments_sum_to_pool(
            winnings in 1_000u32..2_000_000_000,
            annuity_tax_bp in 0u32..10_000,
            years in 1u32..60,
            growth_bp in 1u32..2_000,
        ) {
            let mut inputs = sample_inputs();
            inputs.total_winnings = winnings as f64;
            inputs.annuity_tax = annuity_tax_bp as f64 / 100.0;
            inputs.years = years;
            let growth = 1.0 + growth_bp as f64 / 10_000.0;

            let engine = ProjectionEngine::new(ProjectionConfig { annuity_growth_rate: growth });
            let data = engine.initial_data(&inputs, date(2025, 1, 1)).unwrap();
            let params = &data.initial_parameters;

            let pool = inputs.total_winnings * (1.0 - inputs.annuity_tax / 100.0);
            let total: f64 = (0..years).map(|k| params.scheduled_payment(k)).sum();
            prop_assert!((total - pool).abs() <= pool.abs() * 1e-9 + 1e-6,
                "payments sum {} != pool {}", total, pool);
        }

        #[test]
        fn prop_level_payments_split_pool_evenly(
            winnings in 1u32..2_000_000_000,
            years in 1u32..60,
        ) {
            let mut inputs = sample_inputs();
            inputs.total_winnings = winnings as f64;
            inputs.years = years;

            let engine = ProjectionEngine::new(ProjectionConfig { annuity_growth_rate: 1.0 });
            let data = engine.initial_data(&inputs, date(2025, 1, 1)).unwrap();
            let pool = inputs.total_winnings * 0.75;
            let total = data.initial_parameters.base_annuity_payment * years as f64;
            prop_assert!((total - pool).abs() <= pool * 1e-12);
        }
    }
}
