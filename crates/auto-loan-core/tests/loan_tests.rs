use auto_loan_core::loan::{self, LoanInput};
use auto_loan_core::{AutoLoanError, DownPaymentMode};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Loan calculation tests
// ===========================================================================

fn family_sedan_loan() -> LoanInput {
    // Mid-range sedan financed over four years with a 20% down payment
    LoanInput {
        vehicle_price: dec!(300_000),
        down_payment: dec!(20),
        down_payment_mode: DownPaymentMode::Percentage,
        term_months: 48,
        annual_rate_pct: dec!(5.6),
        monthly_fuel: dec!(225),
        monthly_insurance: dec!(50),
        annual_maintenance: dec!(400),
        monthly_other: dec!(10),
        start_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
    }
}

#[test]
fn test_family_sedan_summary() {
    let input = family_sedan_loan();
    let result = loan::calculate_loan(&input).unwrap();
    let s = &result.result.summary;

    // 20% of 300k = 60k down, 240k financed
    assert_eq!(s.effective_down_payment, dec!(60_000));
    assert_eq!(s.financed_amount, dec!(240_000));

    // 225 + 50 + 400/12 + 10 = 318.33
    assert_eq!(s.additional_monthly_expenses, dec!(318.33));

    assert_eq!(
        s.total_monthly_payment,
        s.base_payment + s.additional_monthly_expenses
    );
    assert_eq!(s.total_paid, s.total_monthly_payment * dec!(48));
}

#[test]
fn test_family_sedan_schedule_shape() {
    let input = family_sedan_loan();
    let result = loan::calculate_loan(&input).unwrap();
    let schedule = &result.result.schedule;

    assert_eq!(schedule.len(), 48);

    // First installment due on the start date, then monthly
    assert_eq!(
        schedule[0].due_date,
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    );
    assert_eq!(
        schedule[47].due_date,
        NaiveDate::from_ymd_opt(2027, 12, 15).unwrap()
    );

    // Every installment equals the base payment
    for row in schedule {
        assert_eq!(row.installment, result.result.summary.base_payment);
    }

    // The loan pays off
    assert!(schedule.last().unwrap().remaining_balance < dec!(0.01));
}

#[test]
fn test_schedule_principal_recovers_financed_amount() {
    let input = family_sedan_loan();
    let result = loan::calculate_loan(&input).unwrap();

    let total_principal: Decimal = result
        .result
        .schedule
        .iter()
        .map(|r| r.principal_portion)
        .sum();
    let diff = (total_principal - dec!(240_000)).abs();
    assert!(
        diff < dec!(0.5),
        "Principal portions should sum to ~240,000, got {}",
        total_principal
    );
}

#[test]
fn test_interest_free_promotional_loan() {
    // 0% promotional financing must be linear, not a division by zero
    let input = LoanInput {
        vehicle_price: dec!(100_000),
        down_payment: Decimal::ZERO,
        down_payment_mode: DownPaymentMode::Amount,
        term_months: 10,
        annual_rate_pct: Decimal::ZERO,
        monthly_fuel: Decimal::ZERO,
        monthly_insurance: Decimal::ZERO,
        annual_maintenance: Decimal::ZERO,
        monthly_other: Decimal::ZERO,
        start_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
    };

    let result = loan::calculate_loan(&input).unwrap();
    let s = &result.result.summary;

    assert_eq!(s.base_payment, dec!(10_000));
    assert_eq!(s.total_monthly_payment, dec!(10_000));
    assert_eq!(s.total_paid, dec!(100_000));

    for row in &result.result.schedule {
        assert_eq!(row.interest_portion, Decimal::ZERO);
    }
}

#[test]
fn test_absolute_down_payment_mode() {
    let mut input = family_sedan_loan();
    input.down_payment = dec!(60_000);
    input.down_payment_mode = DownPaymentMode::Amount;

    let result = loan::calculate_loan(&input).unwrap();
    // Same financed amount as the 20% percentage case
    assert_eq!(result.result.summary.financed_amount, dec!(240_000));
}

#[test]
fn test_end_of_month_start_date_clamps() {
    let mut input = family_sedan_loan();
    input.start_date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
    input.term_months = 3;

    let result = loan::calculate_loan(&input).unwrap();
    let schedule = &result.result.schedule;

    assert_eq!(
        schedule[1].due_date,
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    );
    assert_eq!(
        schedule[2].due_date,
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
    );
}

#[test]
fn test_invalid_price_rejected_before_computation() {
    let mut input = family_sedan_loan();
    input.vehicle_price = dec!(-1);

    let err = loan::calculate_loan(&input).unwrap_err();
    match err {
        AutoLoanError::InvalidInput { field, .. } => assert_eq!(field, "vehicle_price"),
        other => panic!("Expected InvalidInput, got {:?}", other),
    }
}

#[test]
fn test_envelope_round_trips_through_json() {
    let input = family_sedan_loan();
    let result = loan::calculate_loan(&input).unwrap();

    let json = serde_json::to_string(&result).unwrap();
    let parsed: auto_loan_core::ComputationOutput<loan::LoanAnalysis> =
        serde_json::from_str(&json).unwrap();

    assert_eq!(
        parsed.result.summary.total_paid,
        result.result.summary.total_paid
    );
    assert_eq!(parsed.result.schedule.len(), 48);
}
