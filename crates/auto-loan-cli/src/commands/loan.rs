use chrono::{Local, NaiveDate};
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use auto_loan_core::loan::{self, LoanInput};
use auto_loan_core::DownPaymentMode;

use crate::input;

/// clap-facing mirror of the engine's down-payment mode
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DownPaymentModeArg {
    Percentage,
    Amount,
}

impl From<DownPaymentModeArg> for DownPaymentMode {
    fn from(arg: DownPaymentModeArg) -> Self {
        match arg {
            DownPaymentModeArg::Percentage => DownPaymentMode::Percentage,
            DownPaymentModeArg::Amount => DownPaymentMode::Amount,
        }
    }
}

/// Arguments shared by the payment and schedule commands.
///
/// Defaults for the recurring-expense flags match the calculator form's
/// prefilled values.
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct LoanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Vehicle price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Down payment, interpreted per --down-payment-mode
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// How the down payment is expressed
    #[arg(long, value_enum, default_value = "percentage")]
    pub down_payment_mode: DownPaymentModeArg,

    /// Loan term in months
    #[arg(long, default_value = "48")]
    pub term_months: u32,

    /// Nominal annual interest rate in percent
    #[arg(long, default_value = "5.6")]
    pub annual_rate: Decimal,

    /// Monthly fuel budget
    #[arg(long, default_value = "225")]
    pub fuel: Decimal,

    /// Monthly insurance premium
    #[arg(long, default_value = "50")]
    pub insurance: Decimal,

    /// Annual maintenance budget
    #[arg(long, default_value = "400")]
    pub maintenance: Decimal,

    /// Other recurring monthly expenses
    #[arg(long, default_value = "10")]
    pub other: Decimal,

    /// First installment due date, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
}

/// Arguments for the down-payment breakdown command
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct BreakdownArgs {
    /// Vehicle price
    #[arg(long)]
    pub price: Decimal,

    /// Down payment, interpreted per --down-payment-mode
    #[arg(long)]
    pub down_payment: Decimal,

    /// How the down payment is expressed
    #[arg(long, value_enum, default_value = "percentage")]
    pub down_payment_mode: DownPaymentModeArg,
}

pub fn run_payment(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input = build_loan_input(&args)?;
    let output = loan::calculate_loan(&loan_input)?;

    // Summary view: keep the envelope, drop the schedule rows
    let mut value = serde_json::to_value(&output)?;
    value["result"] = serde_json::to_value(&output.result.summary)?;
    Ok(value)
}

pub fn run_schedule(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input = build_loan_input(&args)?;
    let output = loan::calculate_loan(&loan_input)?;

    // Row-per-month array so table and CSV output render the full schedule
    Ok(serde_json::to_value(&output.result.schedule)?)
}

pub fn run_breakdown(args: BreakdownArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let breakdown = loan::down_payment_breakdown(
        args.price,
        args.down_payment,
        args.down_payment_mode.into(),
    )?;
    Ok(serde_json::to_value(breakdown)?)
}

fn build_loan_input(args: &LoanArgs) -> Result<LoanInput, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_json(path);
    }
    if let Some(data) = input::stdin::read_stdin()? {
        return Ok(serde_json::from_value(data)?);
    }

    Ok(LoanInput {
        vehicle_price: args
            .price
            .ok_or("--price is required (or provide --input)")?,
        down_payment: args
            .down_payment
            .ok_or("--down-payment is required (or provide --input)")?,
        down_payment_mode: args.down_payment_mode.into(),
        term_months: args.term_months,
        annual_rate_pct: args.annual_rate,
        monthly_fuel: args.fuel,
        monthly_insurance: args.insurance,
        annual_maintenance: args.maintenance,
        monthly_other: args.other,
        start_date: args
            .start_date
            .unwrap_or_else(|| Local::now().date_naive()),
    })
}
