//! Lottery Projection CLI
//!
//! Command-line front end over a saved projection file

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;

use lottery_projection::{
    calculate_update, calculate_withdrawal_limits, export, format_money, store, Frequency,
    LotteryData, ProjectionConfig, ProjectionEngine, UserInputParameters, WithdrawalLimits,
};
use lottery_projection::export::ExportFormat;
use lottery_projection::store::DEFAULT_DATA_FILE;

#[derive(Debug, Parser)]
#[command(name = "lottery", version, about = "Compare lottery lump-sum and annuity payouts over time")]
struct Cli {
    /// Saved projection file
    #[arg(long, global = true, default_value = DEFAULT_DATA_FILE)]
    data: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Set up a new projection from the winner's inputs
    Init(InitArgs),

    /// Roll balances forward to a date after spending an amount
    Update {
        /// Amount spent since the last update (negative for a deposit)
        #[arg(long, allow_hyphen_values = true)]
        spending: f64,

        /// Update date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show sustainable withdrawal limits
    Limits {
        /// Plan date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Print the limits as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export the projection
    Export {
        #[arg(long, value_enum, default_value_t = FormatArg::Text)]
        format: FormatArg,

        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Date for the withdrawal table in text reports (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Delete the saved projection
    Reset,
}

#[derive(Debug, Args)]
struct InitArgs {
    /// Total winnings before tax
    #[arg(long)]
    winnings: f64,

    /// Lump sum tax (%)
    #[arg(long, default_value_t = 37.0)]
    lump_sum_tax: f64,

    /// Annuity tax (%)
    #[arg(long, default_value_t = 25.0)]
    annuity_tax: f64,

    /// Savings APR (%)
    #[arg(long, default_value_t = 5.0)]
    savings_apr: f64,

    /// Current age
    #[arg(long)]
    age: u32,

    /// Expected age at death
    #[arg(long)]
    death_age: u32,

    /// Years of annuity payments
    #[arg(long, default_value_t = 30)]
    years: u32,

    /// Amount to leave behind, in today's dollars
    #[arg(long, default_value_t = 0.0)]
    legacy: f64,

    /// Tax on investment gains (%)
    #[arg(long, default_value_t = 20.0)]
    investment_tax_rate: f64,

    /// Annual inflation (%)
    #[arg(long, default_value_t = 3.5)]
    inflation_rate: f64,

    /// Annual annuity payment multiplier (overrides LOTTERY_ANNUITY_GROWTH_RATE)
    #[arg(long)]
    growth_rate: Option<f64>,

    /// Setup date, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Replace an existing projection file
    #[arg(long)]
    force: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Json,
    Text,
}

impl From<FormatArg> for ExportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Text => ExportFormat::Text,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Init(args) => init(&cli.data, args),
        Command::Update { spending, date } => update(&cli.data, spending, date.unwrap_or_else(today)),
        Command::Limits { date, json } => limits(&cli.data, date.unwrap_or_else(today), json),
        Command::Export { format, output, date } => {
            export_data(&cli.data, format.into(), output, date.unwrap_or_else(today))
        }
        Command::Reset => {
            store::clear(&cli.data)
                .with_context(|| format!("failed to remove {}", cli.data.display()))?;
            println!("Removed {}", cli.data.display());
            Ok(())
        }
    }
}

/// The only place the wall clock is read
fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn load(path: &Path) -> Result<LotteryData> {
    store::load(path).with_context(|| {
        format!("failed to load {} (run `lottery init` first?)", path.display())
    })
}

fn init(path: &Path, args: InitArgs) -> Result<()> {
    if path.exists() && !args.force {
        bail!("{} already exists; pass --force to replace it", path.display());
    }

    let inputs = UserInputParameters {
        total_winnings: args.winnings,
        lump_sum_tax: args.lump_sum_tax,
        annuity_tax: args.annuity_tax,
        savings_apr: args.savings_apr,
        age: args.age,
        death_age: args.death_age,
        years: args.years,
        ml: args.legacy,
        investment_tax_rate: args.investment_tax_rate,
        inflation_rate: args.inflation_rate,
    };

    let mut config = ProjectionConfig::from_env();
    if let Some(growth_rate) = args.growth_rate {
        config.annuity_growth_rate = growth_rate;
    }

    let start = args.date.unwrap_or_else(today);
    let data = ProjectionEngine::new(config).initial_data(&inputs, start)?;
    store::save(path, &data).with_context(|| format!("failed to save {}", path.display()))?;
    info!("initialized projection in {}", path.display());

    let params = &data.initial_parameters;
    println!("Projection created {}", start);
    println!("  Net lump sum:          {}", format_money(params.lump_sum_net));
    println!("  First annuity payment: {}", format_money(params.base_annuity_payment));
    println!("  Predicted death date:  {}", params.predicted_death_date);
    Ok(())
}

fn update(path: &Path, spending: f64, date: NaiveDate) -> Result<()> {
    let data = load(path)?;
    let updated = calculate_update(&data, spending, date)?;
    store::save(path, &updated).with_context(|| format!("failed to save {}", path.display()))?;

    println!("Updated to {}", updated.state.last_update_date);
    println!("  Lump sum balance: {}", format_money(updated.state.lump_balance));
    println!("  Annuity balance:  {}", format_money(updated.state.annual_balance));
    Ok(())
}

fn limits(path: &Path, date: NaiveDate, json: bool) -> Result<()> {
    let data = load(path)?;
    let limits = calculate_withdrawal_limits(&data, date);

    if json {
        println!("{}", serde_json::to_string_pretty(&limits)?);
        return Ok(());
    }

    match limits {
        Some(limits) => print_limits(&limits),
        None => println!("No withdrawal plan available: {} is past the predicted death date.", date),
    }
    Ok(())
}

fn print_limits(limits: &WithdrawalLimits) {
    println!(
        "Time remaining: {:.1} years, goal at death {}",
        limits.years_remaining,
        format_money(limits.inflation_adjusted_target)
    );
    println!("{:<10} {:>14} {:>14} {:>14} {:>14}", "", "Lump", "(now)", "Annuity", "(now)");
    println!("{}", "-".repeat(70));
    for frequency in Frequency::ALL {
        let lump = limits.lump.get(frequency);
        let annual = limits.annual.get(frequency);
        println!(
            "{:<10} {:>14} {:>14} {:>14} {:>14}",
            frequency.label(),
            format_money(lump.nominal),
            format_money(lump.real),
            format_money(annual.nominal),
            format_money(annual.real),
        );
    }
}

fn export_data(
    path: &Path,
    format: ExportFormat,
    output: Option<PathBuf>,
    date: NaiveDate,
) -> Result<()> {
    let data = load(path)?;
    let limits = calculate_withdrawal_limits(&data, date);
    let rendered = export::render(&data, limits.as_ref(), format)?;

    match output {
        Some(output) => {
            fs::write(&output, rendered)
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!("Exported to {}", output.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}
