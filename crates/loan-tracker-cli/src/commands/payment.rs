use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use loan_tracker_core::app_state::{AppState, Command};
use loan_tracker_core::monthly::payment_history;
use loan_tracker_core::{NewPayment, PaymentUpdate};

use crate::commands::open_state;
use crate::{input, Context};

/// Arguments for recording a payment
#[derive(Args)]
pub struct AddPaymentArgs {
    /// Loan the payment is made against
    #[arg(long)]
    pub loan: String,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount received
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Date received (YYYY-MM-DD, defaults to the --as-of date)
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

/// Arguments for editing a payment
#[derive(Args)]
pub struct EditPaymentArgs {
    /// Payment id
    pub id: String,

    /// Loan the payment belongs to (looked up when omitted)
    #[arg(long)]
    pub loan: Option<String>,

    /// Path to JSON file with the fields to change
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long)]
    pub amount: Option<Decimal>,

    #[arg(long)]
    pub date: Option<NaiveDate>,
}

/// Arguments for deleting a payment
#[derive(Args)]
pub struct DeletePaymentArgs {
    /// Payment id
    pub id: String,

    /// Loan the payment belongs to (looked up when omitted)
    #[arg(long)]
    pub loan: Option<String>,
}

/// Arguments for listing a loan's payments
#[derive(Args)]
pub struct PaymentsArgs {
    /// Loan id
    #[arg(long)]
    pub loan: String,
}

pub fn run_add_payment(args: AddPaymentArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let new_payment: NewPayment = match input::read_structured(args.input.as_deref())? {
        Some(payment) => payment,
        None => NewPayment {
            amount: args.amount
                .ok_or("--amount is required (or provide --input)")?,
            date: args.date.unwrap_or(ctx.today),
        },
    };

    let (mut store, state) = open_state(ctx)?;
    let state = state.apply(
        &mut store,
        Command::AddPayment {
            loan_id: args.loan.clone(),
            payment: new_payment,
        },
    )?;
    let created = state
        .loan(&args.loan)
        .and_then(|l| l.payments.last())
        .ok_or("payment was not stored")?;
    Ok(serde_json::to_value(created)?)
}

pub fn run_edit_payment(args: EditPaymentArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let update: PaymentUpdate = match input::read_structured(args.input.as_deref())? {
        Some(update) => update,
        None => PaymentUpdate {
            amount: args.amount,
            date: args.date,
        },
    };
    if update == PaymentUpdate::default() {
        return Err("Nothing to update: pass --amount, --date or --input".into());
    }

    let (mut store, state) = open_state(ctx)?;
    let loan_id = resolve_loan(&state, args.loan, &args.id)?;
    let state = state.apply(
        &mut store,
        Command::EditPayment {
            loan_id: loan_id.clone(),
            payment_id: args.id.clone(),
            update,
        },
    )?;
    let edited = state
        .loan(&loan_id)
        .and_then(|l| l.payments.iter().find(|p| p.id == args.id))
        .ok_or_else(|| format!("Payment not found: {}", args.id))?;
    Ok(serde_json::to_value(edited)?)
}

pub fn run_delete_payment(args: DeletePaymentArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let (mut store, state) = open_state(ctx)?;
    let loan_id = resolve_loan(&state, args.loan, &args.id)?;
    state.apply(
        &mut store,
        Command::DeletePayment {
            loan_id: loan_id.clone(),
            payment_id: args.id.clone(),
        },
    )?;
    Ok(json!({ "deleted": args.id, "loan_id": loan_id }))
}

pub fn run_payments(args: PaymentsArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let (_, state) = open_state(ctx)?;
    let loan = state
        .loan(&args.loan)
        .ok_or_else(|| format!("Loan not found: {}", args.loan))?;
    Ok(serde_json::to_value(payment_history(loan))?)
}

/// The loan holding `payment_id`, unless the caller named one.
fn resolve_loan(
    state: &AppState,
    loan: Option<String>,
    payment_id: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(loan) = loan {
        return Ok(loan);
    }
    state
        .loans
        .iter()
        .find(|l| l.payments.iter().any(|p| p.id == payment_id))
        .map(|l| l.id.clone())
        .ok_or_else(|| format!("Payment not found: {payment_id}").into())
}
