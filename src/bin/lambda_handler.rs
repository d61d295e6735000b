//! AWS Lambda handler for one-shot projections
//!
//! Accepts the winner's inputs plus a sequence of dated spending updates as
//! JSON, replays them through the engine, and returns the final record along
//! with the sustainable withdrawal limits. Nothing is persisted: the caller
//! owns the record.

use std::time::Instant;

use chrono::NaiveDate;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use lottery_projection::{
    calculate_update, calculate_withdrawal_limits, LotteryData, ProjectionConfig, ProjectionEngine,
    ProjectionError, UserInputParameters, WithdrawalLimits,
};
use lottery_projection::projection::DEFAULT_ANNUITY_GROWTH_RATE;

/// Input for a projection
#[derive(Debug, Deserialize)]
pub struct ProjectionRequest {
    /// Winner's setup inputs
    pub inputs: UserInputParameters,

    /// Setup date (YYYY-MM-DD)
    pub start_date: NaiveDate,

    /// Spending updates, applied in order
    #[serde(default)]
    pub updates: Vec<SpendingUpdate>,

    /// Date to solve withdrawal limits for (default: date of the last update)
    #[serde(default)]
    pub as_of: Option<NaiveDate>,

    /// Annual annuity payment multiplier (default: 1.05)
    #[serde(default = "default_growth_rate")]
    pub annuity_growth_rate: f64,
}

/// One dated spending entry
#[derive(Debug, Deserialize)]
pub struct SpendingUpdate {
    pub date: NaiveDate,
    #[serde(default)]
    pub spending: f64,
}

fn default_growth_rate() -> f64 { DEFAULT_ANNUITY_GROWTH_RATE }

/// Output from the projection
#[derive(Debug, Serialize)]
pub struct ProjectionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<LotteryData>,
    /// `None` when the plan date is past the predicted death date
    pub limits: Option<WithdrawalLimits>,
    pub updates_applied: usize,
    pub execution_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Replay the request through the engine
fn run_projection(
    request: &ProjectionRequest,
) -> Result<(LotteryData, Option<WithdrawalLimits>), ProjectionError> {
    let config = ProjectionConfig {
        annuity_growth_rate: request.annuity_growth_rate,
    };
    let mut data = ProjectionEngine::new(config).initial_data(&request.inputs, request.start_date)?;

    for update in &request.updates {
        data = calculate_update(&data, update.spending, update.date)?;
    }

    let as_of = request.as_of.unwrap_or(data.state.last_update_date);
    let limits = calculate_withdrawal_limits(&data, as_of);
    Ok((data, limits))
}

/// Run the projection and wrap the outcome, success or failure, in a response
fn build_response(request: &ProjectionRequest, start: Instant) -> ProjectionResponse {
    match run_projection(request) {
        Ok((data, limits)) => ProjectionResponse {
            data: Some(data),
            limits,
            updates_applied: request.updates.len(),
            execution_time_ms: start.elapsed().as_millis() as u64,
            error: None,
        },
        Err(e) => {
            warn!("projection failed: {}", e);
            ProjectionResponse {
                data: None,
                limits: None,
                updates_applied: 0,
                execution_time_ms: start.elapsed().as_millis() as u64,
                error: Some(e.to_string()),
            }
        }
    }
}

async fn handler(event: LambdaEvent<ProjectionRequest>) -> Result<ProjectionResponse, Error> {
    let start = Instant::now();
    let request = event.payload;
    info!(
        "projection request: start {} with {} updates",
        request.start_date,
        request.updates.len()
    );

    Ok(build_response(&request, start))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
