//! Auto-loan payment engine.
//!
//! Down-payment normalization, fixed-rate amortized-payment calculation,
//! and amortization-schedule generation. All math uses
//! `rust_decimal::Decimal`; running balances are carried at full precision
//! and only the emitted fields are rounded for display.

use chrono::{Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::AutoLoanError;
use crate::types::{with_metadata, ComputationOutput, DownPaymentMode, Money, Rate};
use crate::AutoLoanResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT_DIVISOR: Decimal = dec!(100);
/// Decimal places for presented currency values
const DISPLAY_DP: u32 = 2;

// ---------------------------------------------------------------------------
// Input / Output Types
// ---------------------------------------------------------------------------

/// Caller-supplied parameter set for one loan calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInput {
    /// Vehicle purchase price. Must be positive.
    pub vehicle_price: Money,
    /// Down payment figure, interpreted per `down_payment_mode`.
    pub down_payment: Money,
    pub down_payment_mode: DownPaymentMode,
    /// Number of monthly installments. Must be at least 1.
    pub term_months: u32,
    /// Nominal annual interest rate in percent (5.6 = 5.6%).
    pub annual_rate_pct: Rate,
    /// Recurring monthly fuel budget.
    pub monthly_fuel: Money,
    /// Recurring monthly insurance premium.
    pub monthly_insurance: Money,
    /// Annual maintenance budget, converted internally to a monthly equivalent.
    pub annual_maintenance: Money,
    /// Other recurring monthly expenses.
    pub monthly_other: Money,
    /// Due date of the first installment.
    pub start_date: NaiveDate,
}

/// Headline figures for a loan. All fields are rounded to 2 decimal places;
/// the totals are exact sums/products of the rounded terms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanSummary {
    /// Fixed monthly amortized payment (principal + interest only).
    pub base_payment: Money,
    /// Fuel + insurance + maintenance/12 + other.
    pub additional_monthly_expenses: Money,
    /// base_payment + additional_monthly_expenses.
    pub total_monthly_payment: Money,
    /// Down payment expressed in absolute currency regardless of input mode.
    pub effective_down_payment: Money,
    /// vehicle_price - effective_down_payment.
    pub financed_amount: Money,
    /// total_monthly_payment * term_months.
    pub total_paid: Money,
}

/// One installment in the amortization schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// Month number, 1..=term_months.
    pub month: u32,
    /// start_date + (month - 1) calendar months, day clamped to month length.
    pub due_date: NaiveDate,
    /// Equals the base payment on every row.
    pub installment: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    /// Outstanding principal after this installment, floored at zero.
    pub remaining_balance: Money,
}

/// Full output of a loan calculation: summary plus schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanAnalysis {
    pub summary: LoanSummary,
    pub schedule: Vec<AmortizationRow>,
}

/// A down payment expressed both ways, for the percentage/amount dual view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownPaymentBreakdown {
    /// Absolute currency amount.
    pub amount: Money,
    /// Percent of the vehicle price (20 = 20%).
    pub pct_of_price: Rate,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Normalize a down payment to an absolute currency amount.
///
/// No range validation is performed: a down payment at or above the price
/// yields a non-positive financed amount downstream, which is degenerate
/// but mathematically well-defined.
pub fn effective_down_payment(price: Money, down_payment: Money, mode: DownPaymentMode) -> Money {
    match mode {
        DownPaymentMode::Percentage => price * down_payment / PERCENT_DIVISOR,
        DownPaymentMode::Amount => down_payment,
    }
}

/// Periodic rate as a decimal fraction: annual percent / 12 / 100.
pub fn monthly_rate(annual_rate_pct: Rate) -> Rate {
    annual_rate_pct / MONTHS_PER_YEAR / PERCENT_DIVISOR
}

/// Fixed monthly payment for a fully amortizing loan.
///
/// Standard annuity formula `P * r * (1+r)^n / ((1+r)^n - 1)`. A zero rate
/// leaves that formula undefined and is special-cased to linear
/// amortization `P / n`. A negative rate is rejected.
pub fn base_payment(
    financed_amount: Money,
    monthly_rate: Rate,
    term_months: u32,
) -> AutoLoanResult<Money> {
    if term_months == 0 {
        return Err(AutoLoanError::InvalidInput {
            field: "term_months".into(),
            reason: "Term must be at least 1 month".into(),
        });
    }
    if monthly_rate < Decimal::ZERO {
        return Err(AutoLoanError::DegenerateRate { monthly_rate });
    }
    if monthly_rate.is_zero() {
        return Ok(financed_amount / Decimal::from(term_months));
    }

    let growth = (Decimal::ONE + monthly_rate).powi(term_months as i64);
    Ok(financed_amount * monthly_rate * growth / (growth - Decimal::ONE))
}

/// Sum of the recurring monthly costs on top of the loan payment.
pub fn additional_monthly_expenses(
    monthly_fuel: Money,
    monthly_insurance: Money,
    annual_maintenance: Money,
    monthly_other: Money,
) -> Money {
    monthly_fuel + monthly_insurance + annual_maintenance / MONTHS_PER_YEAR + monthly_other
}

/// Generate the month-by-month amortization schedule.
///
/// The running balance is kept at full precision across iterations; each
/// emitted field is rounded independently. Due dates are computed from the
/// start date so day-of-month clamping in a short month does not carry
/// over to later months.
pub fn amortization_schedule(
    financed_amount: Money,
    monthly_rate: Rate,
    base_payment: Money,
    term_months: u32,
    start_date: NaiveDate,
) -> AutoLoanResult<Vec<AmortizationRow>> {
    let mut schedule: Vec<AmortizationRow> = Vec::with_capacity(term_months as usize);
    let mut balance = financed_amount;

    for month in 1..=term_months {
        let due_date = start_date
            .checked_add_months(Months::new(month - 1))
            .ok_or_else(|| {
                AutoLoanError::DateError(format!(
                    "Cannot add {} months to {}",
                    month - 1,
                    start_date
                ))
            })?;

        let interest = balance * monthly_rate;
        let principal = base_payment - interest;
        balance -= principal;

        schedule.push(AmortizationRow {
            month,
            due_date,
            installment: round_display(base_payment),
            principal_portion: round_display(principal),
            interest_portion: round_display(interest),
            remaining_balance: round_display(balance.max(Decimal::ZERO)),
        });
    }

    Ok(schedule)
}

/// Express a down payment as both an absolute amount and a percent of price.
///
/// This backs the dual percentage/amount readout next to the down-payment
/// field; unlike the main calculation it needs a positive price for the
/// percent conversion in both directions.
pub fn down_payment_breakdown(
    price: Money,
    down_payment: Money,
    mode: DownPaymentMode,
) -> AutoLoanResult<DownPaymentBreakdown> {
    if price <= Decimal::ZERO {
        return Err(AutoLoanError::InvalidInput {
            field: "vehicle_price".into(),
            reason: "Vehicle price must be positive".into(),
        });
    }

    let (amount, pct_of_price) = match mode {
        DownPaymentMode::Percentage => (price * down_payment / PERCENT_DIVISOR, down_payment),
        DownPaymentMode::Amount => (down_payment, down_payment / price * PERCENT_DIVISOR),
    };

    Ok(DownPaymentBreakdown {
        amount: round_display(amount),
        pct_of_price: pct_of_price.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero),
    })
}

/// Compute the full loan analysis: summary figures plus amortization schedule.
///
/// Pure and synchronous. Returns either a complete result or an error,
/// never a partially populated schedule.
pub fn calculate_loan(input: &LoanInput) -> AutoLoanResult<ComputationOutput<LoanAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_loan_input(input)?;

    let effective_dp = effective_down_payment(
        input.vehicle_price,
        input.down_payment,
        input.down_payment_mode,
    );
    let financed = input.vehicle_price - effective_dp;
    let rate = monthly_rate(input.annual_rate_pct);
    let payment = base_payment(financed, rate, input.term_months)?;
    let extras = additional_monthly_expenses(
        input.monthly_fuel,
        input.monthly_insurance,
        input.annual_maintenance,
        input.monthly_other,
    );

    if input.down_payment_mode == DownPaymentMode::Percentage
        && !(Decimal::ZERO..=PERCENT_DIVISOR).contains(&input.down_payment)
    {
        warnings.push(format!(
            "Down payment of {}% is outside the conventional 0-100% range",
            input.down_payment
        ));
    }
    if financed <= Decimal::ZERO {
        warnings.push(format!(
            "Down payment {} covers the full vehicle price {}; financed amount is not positive",
            effective_dp, input.vehicle_price
        ));
    }

    let schedule = amortization_schedule(financed, rate, payment, input.term_months, input.start_date)?;

    // Totals are formed from the rounded terms so that the presented
    // identities hold exactly: total = base + extras, paid = total * n.
    let base_display = round_display(payment);
    let extras_display = round_display(extras);
    let total_monthly = base_display + extras_display;
    let total_paid = total_monthly * Decimal::from(input.term_months);

    let summary = LoanSummary {
        base_payment: base_display,
        additional_monthly_expenses: extras_display,
        total_monthly_payment: total_monthly,
        effective_down_payment: round_display(effective_dp),
        financed_amount: round_display(financed),
        total_paid,
    };

    let analysis = LoanAnalysis { summary, schedule };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-rate annuity payment with monthly amortization schedule",
        &serde_json::json!({
            "vehicle_price": input.vehicle_price.to_string(),
            "financed_amount": financed.to_string(),
            "monthly_rate": rate.to_string(),
            "term_months": input.term_months,
            "start_date": input.start_date.to_string(),
            "zero_rate_fallback": "linear",
        }),
        warnings,
        elapsed,
        analysis,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_loan_input(input: &LoanInput) -> AutoLoanResult<()> {
    if input.vehicle_price <= Decimal::ZERO {
        return Err(AutoLoanError::InvalidInput {
            field: "vehicle_price".into(),
            reason: "Vehicle price must be positive".into(),
        });
    }
    if input.term_months == 0 {
        return Err(AutoLoanError::InvalidInput {
            field: "term_months".into(),
            reason: "Term must be at least 1 month".into(),
        });
    }
    for (field, value) in [
        ("monthly_fuel", input.monthly_fuel),
        ("monthly_insurance", input.monthly_insurance),
        ("annual_maintenance", input.annual_maintenance),
        ("monthly_other", input.monthly_other),
    ] {
        if value < Decimal::ZERO {
            return Err(AutoLoanError::InvalidInput {
                field: field.into(),
                reason: "Recurring expenses cannot be negative".into(),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Round a presented currency value to 2 decimal places, half away from zero.
fn round_display(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DISPLAY_DP, RoundingStrategy::MidpointAwayFromZero)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
