use chrono::{Local, NaiveDate};
use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Serialize;

use loan_tracker_core::status::{deadline_label, DeadlineStatus};
use loan_tracker_core::Loan;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parse an optional `YYYY-MM-DD` reference date, defaulting to today.
fn as_of(date: Option<String>) -> NapiResult<NaiveDate> {
    match date {
        Some(d) => NaiveDate::parse_from_str(&d, "%Y-%m-%d").map_err(to_napi_error),
        None => Ok(Local::now().date_naive()),
    }
}

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

#[napi]
pub fn loan_summary(loan_json: String, as_of_date: Option<String>) -> NapiResult<String> {
    let loan: Loan = serde_json::from_str(&loan_json).map_err(to_napi_error)?;
    let output = loan_tracker_core::calculator::summarize_loan(&loan, as_of(as_of_date)?)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn portfolio_summary(loans_json: String, as_of_date: Option<String>) -> NapiResult<String> {
    let loans: Vec<Loan> = serde_json::from_str(&loans_json).map_err(to_napi_error)?;
    let output = loan_tracker_core::calculator::summarize_portfolio(&loans, as_of(as_of_date)?)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

#[napi]
pub fn monthly_payment_totals(loan_json: String) -> NapiResult<String> {
    let loan: Loan = serde_json::from_str(&loan_json).map_err(to_napi_error)?;
    let totals = loan_tracker_core::monthly::monthly_payment_totals(&loan.payments);
    serde_json::to_string(&totals).map_err(to_napi_error)
}

#[napi]
pub fn portfolio_monthly_totals(loans_json: String) -> NapiResult<String> {
    let loans: Vec<Loan> = serde_json::from_str(&loans_json).map_err(to_napi_error)?;
    let totals = loan_tracker_core::monthly::portfolio_monthly_totals(&loans);
    serde_json::to_string(&totals).map_err(to_napi_error)
}

#[napi]
pub fn payment_history(loan_json: String) -> NapiResult<String> {
    let loan: Loan = serde_json::from_str(&loan_json).map_err(to_napi_error)?;
    serde_json::to_string(&loan_tracker_core::monthly::payment_history(&loan)).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Deadline badge
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct DeadlineBadge {
    status: DeadlineStatus,
    colour: &'static str,
    label: String,
}

#[napi]
pub fn deadline_status(days_remaining: i64) -> NapiResult<String> {
    let status = DeadlineStatus::from_days_remaining(days_remaining);
    let badge = DeadlineBadge {
        status,
        colour: status.colour(),
        label: deadline_label(days_remaining),
    };
    serde_json::to_string(&badge).map_err(to_napi_error)
}
