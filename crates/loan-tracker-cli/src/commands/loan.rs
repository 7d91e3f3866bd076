use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use loan_tracker_core::app_state::Command;
use loan_tracker_core::{InterestType, LoanUpdate, NewLoan};

use crate::commands::open_state;
use crate::{input, Context};

/// Arguments for recording a new loan
#[derive(Args)]
pub struct AddLoanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Borrower name
    #[arg(long)]
    pub borrower: Option<String>,

    /// Principal amount lent
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Interest rate in percent per period (12 = 12%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Period the rate refers to: monthly, quarterly or yearly
    #[arg(long, default_value = "monthly")]
    pub interest_type: InterestType,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,
}

/// Arguments for editing a loan
#[derive(Args)]
pub struct EditLoanArgs {
    /// Loan id
    pub id: String,

    /// Path to JSON file with the fields to change
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long)]
    pub borrower: Option<String>,

    #[arg(long)]
    pub principal: Option<Decimal>,

    #[arg(long)]
    pub rate: Option<Decimal>,

    #[arg(long)]
    pub interest_type: Option<InterestType>,

    #[arg(long)]
    pub start: Option<NaiveDate>,

    #[arg(long)]
    pub end: Option<NaiveDate>,
}

/// Arguments for deleting a loan
#[derive(Args)]
pub struct DeleteLoanArgs {
    /// Loan id
    pub id: String,
}

pub fn run_add_loan(args: AddLoanArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let new_loan: NewLoan = match input::read_structured(args.input.as_deref())? {
        Some(loan) => loan,
        None => NewLoan {
            borrower_name: args.borrower
                .ok_or("--borrower is required (or provide --input)")?,
            principal_amount: args.principal
                .ok_or("--principal is required (or provide --input)")?,
            interest_rate: args.rate
                .ok_or("--rate is required (or provide --input)")?,
            interest_type: args.interest_type,
            start_date: args.start
                .ok_or("--start is required (or provide --input)")?,
            end_date: args.end
                .ok_or("--end is required (or provide --input)")?,
        },
    };

    let (mut store, state) = open_state(ctx)?;
    let state = state.apply(&mut store, Command::AddLoan { loan: new_loan })?;
    let created = state.loans.first().ok_or("loan was not stored")?;
    Ok(serde_json::to_value(created)?)
}

pub fn run_list_loans(ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let (_, state) = open_state(ctx)?;
    Ok(serde_json::to_value(&state.loans)?)
}

pub fn run_edit_loan(args: EditLoanArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let update: LoanUpdate = match input::read_structured(args.input.as_deref())? {
        Some(update) => update,
        None => LoanUpdate {
            borrower_name: args.borrower,
            principal_amount: args.principal,
            interest_rate: args.rate,
            interest_type: args.interest_type,
            start_date: args.start,
            end_date: args.end,
        },
    };
    if update == LoanUpdate::default() {
        return Err("Nothing to update: pass at least one field flag or --input".into());
    }

    let (mut store, state) = open_state(ctx)?;
    let state = state.apply(
        &mut store,
        Command::EditLoan {
            loan_id: args.id.clone(),
            update,
        },
    )?;
    let edited = state
        .loan(&args.id)
        .ok_or_else(|| format!("Loan not found: {}", args.id))?;
    Ok(serde_json::to_value(edited)?)
}

pub fn run_delete_loan(args: DeleteLoanArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let (mut store, state) = open_state(ctx)?;
    let payments = state.loan(&args.id).map_or(0, |l| l.payments.len());
    state.apply(&mut store, Command::DeleteLoan { loan_id: args.id.clone() })?;
    Ok(json!({
        "deleted": args.id,
        "payments_removed": payments,
    }))
}
