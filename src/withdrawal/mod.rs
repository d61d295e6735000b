//! Sustainable withdrawal planning
//!
//! Given the current record, solves the level daily withdrawal that leaves the
//! inflation-adjusted legacy target at the predicted death date, for both the
//! lump-sum and annuity scenarios:
//! 1. **Solver**: closed-form level withdrawal with after-tax growth
//! 2. **Discounting**: present value of remaining annuity payments and the
//!    today's-dollars value of a withdrawal stream
//! 3. **Limits**: per-cadence nominal/real view for display and export
//!
//! The solver never modifies the record and takes "today" explicitly.

mod solver;
mod discount;
mod limits;

pub use solver::sustainable_withdrawal;
pub use discount::{future_annuity_payments, DailyDiscount};
pub use limits::{
    calculate_withdrawal_limits, Frequency, ScenarioLimits, WithdrawalAmount, WithdrawalLimits,
};
