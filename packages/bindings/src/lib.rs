use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Loan engine
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_loan(input_json: String) -> NapiResult<String> {
    let input: auto_loan_core::loan::LoanInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = auto_loan_core::loan::calculate_loan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn down_payment_breakdown(input_json: String) -> NapiResult<String> {
    #[derive(serde::Deserialize)]
    struct BreakdownInput {
        vehicle_price: rust_decimal::Decimal,
        down_payment: rust_decimal::Decimal,
        down_payment_mode: auto_loan_core::DownPaymentMode,
    }

    let input: BreakdownInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = auto_loan_core::loan::down_payment_breakdown(
        input.vehicle_price,
        input.down_payment,
        input.down_payment_mode,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
