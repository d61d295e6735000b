//! Lottery Projection - lump sum vs. annuity payout planning engine
//!
//! This library provides:
//! - Initial projection of both payout scenarios from user inputs
//! - Time-advance of balances with tax-adjusted growth, annuity payments and spending
//! - Sustainable withdrawal limits that preserve an inflation-adjusted legacy target
//! - JSON persistence and CSV/JSON/text export of a saved projection
//!
//! The engine is pure: every operation takes the current date explicitly and
//! returns a new record instead of modifying its input.

pub mod error;
pub mod money;
pub mod projection;
pub mod withdrawal;
pub mod store;
pub mod export;

// Re-export commonly used types
pub use error::{ExportError, ProjectionError, StoreError};
pub use money::format_money;
pub use projection::{
    calculate_initial_data, calculate_update, InitialParameters, LotteryData, ProjectionConfig,
    ProjectionEngine, State, UserInputParameters,
};
pub use withdrawal::{calculate_withdrawal_limits, Frequency, WithdrawalLimits};
