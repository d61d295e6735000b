//! Projection of both payout scenarios: setup and time-advance

mod inputs;
mod state;
mod engine;
mod update;

pub use inputs::{UserInputParameters, MAX_AGE, MAX_ANNUITY_YEARS};
pub use state::{InitialParameters, LotteryData, State};
pub use engine::{
    calculate_initial_data, ProjectionConfig, ProjectionEngine,
    ANNUITY_GROWTH_RATE_ENV, DEFAULT_ANNUITY_GROWTH_RATE,
};
pub use update::calculate_update;
