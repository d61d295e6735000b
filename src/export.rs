//! Export a projection as CSV, JSON, or a plain-text report

use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::money::format_money;
use crate::projection::LotteryData;
use crate::withdrawal::{Frequency, WithdrawalLimits};

/// Output format for an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
    Text,
}

/// Render a projection in the requested format
pub fn render(
    data: &LotteryData,
    limits: Option<&WithdrawalLimits>,
    format: ExportFormat,
) -> Result<String, ExportError> {
    match format {
        ExportFormat::Csv => to_csv(data),
        ExportFormat::Json => to_json(data),
        ExportFormat::Text => Ok(to_text(data, limits)),
    }
}

/// Two-column `Parameter,Value` sheet of inputs and current balances
pub fn to_csv(data: &LotteryData) -> Result<String, ExportError> {
    let inputs = &data.initial_parameters.user_inputs;
    let state = &data.state;

    let rows: Vec<(&str, String)> = vec![
        ("Total Winnings", format_money(inputs.total_winnings)),
        ("Lump Sum Tax Rate", format!("{}%", inputs.lump_sum_tax)),
        ("Annuity Tax Rate", format!("{}%", inputs.annuity_tax)),
        ("Savings APR", format!("{}%", inputs.savings_apr)),
        ("Age", inputs.age.to_string()),
        ("Expected Death Age", inputs.death_age.to_string()),
        ("Annuity Years", inputs.years.to_string()),
        ("Money to Leave", format_money(inputs.ml)),
        ("Investment Tax Rate", format!("{}%", inputs.investment_tax_rate)),
        ("Inflation Rate", format!("{}%", inputs.inflation_rate)),
        ("", String::new()),
        ("Current Lump Balance", format_money(state.lump_balance)),
        ("Current Annual Balance", format_money(state.annual_balance)),
        ("Years Passed", format!("{:.2}", state.years_passed)),
        ("Last Update Date", state.last_update_date.to_string()),
    ];

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["Parameter", "Value"])?;
    for (parameter, value) in &rows {
        writer.write_record([*parameter, value.as_str()])?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

/// Pretty-printed JSON of the full record
pub fn to_json(data: &LotteryData) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Human-readable summary with the withdrawal table
pub fn to_text(data: &LotteryData, limits: Option<&WithdrawalLimits>) -> String {
    let params = &data.initial_parameters;
    let inputs = &params.user_inputs;
    let state = &data.state;

    let mut lines = vec![
        "Lottery Payout Projection".to_string(),
        "=========================".to_string(),
        format!("Total winnings:        {}", format_money(inputs.total_winnings)),
        format!("Net lump sum:          {}", format_money(params.lump_sum_net)),
        format!(
            "First annuity payment: {} ({} years, {:.1}% annual growth)",
            format_money(params.base_annuity_payment),
            inputs.years,
            (params.annuity_growth_rate - 1.0) * 100.0
        ),
        format!("Goal at death:         {} (today's dollars)", format_money(inputs.ml)),
        format!("Predicted death date:  {}", params.predicted_death_date),
        String::new(),
        format!("As of {} ({:.2} years since start)", state.last_update_date, state.years_passed),
        format!("  Lump sum balance:    {}", format_money(state.lump_balance)),
        format!("  Annuity balance:     {}", format_money(state.annual_balance)),
        String::new(),
    ];

    match limits {
        Some(limits) => {
            lines.push(format!(
                "Sustainable withdrawals ({:.1} years remaining, goal {} at death):",
                limits.years_remaining,
                format_money(limits.inflation_adjusted_target)
            ));
            lines.push(format!(
                "  {:<10} {:>14} {:>14} {:>14} {:>14}",
                "", "Lump", "Lump (now)", "Annuity", "Annuity (now)"
            ));
            for frequency in Frequency::ALL {
                let lump = limits.lump.get(frequency);
                let annual = limits.annual.get(frequency);
                lines.push(format!(
                    "  {:<10} {:>14} {:>14} {:>14} {:>14}",
                    frequency.label(),
                    format_money(lump.nominal),
                    format_money(lump.real),
                    format_money(annual.nominal),
                    format_money(annual.real),
                ));
            }
        }
        None => {
            lines.push("No withdrawal plan available: the predicted death date has passed.".to_string());
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
