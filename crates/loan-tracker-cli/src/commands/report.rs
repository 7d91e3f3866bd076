use clap::Args;
use serde_json::Value;

use loan_tracker_core::calculator::summarize_loan;
use loan_tracker_core::monthly::monthly_payment_totals;
use loan_tracker_core::Loan;

use crate::commands::open_state;
use crate::{input, Context};

/// Arguments for loan or portfolio summaries
#[derive(Args)]
pub struct SummaryArgs {
    /// Summarise a single loan instead of the whole portfolio
    #[arg(long)]
    pub loan: Option<String>,
}

/// Arguments for monthly payment totals
#[derive(Args)]
pub struct MonthlyArgs {
    /// Only this loan's payments (defaults to every loan)
    #[arg(long)]
    pub loan: Option<String>,
}

/// Arguments for the stateless calculator
#[derive(Args)]
pub struct CalculateArgs {
    /// Path to a JSON loan (with payments); read from stdin when omitted
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_summary(args: SummaryArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let (_, state) = open_state(ctx)?;
    match args.loan {
        Some(id) => {
            let loan = state
                .loan(&id)
                .ok_or_else(|| format!("Loan not found: {id}"))?;
            Ok(serde_json::to_value(summarize_loan(loan, ctx.today)?)?)
        }
        None => Ok(serde_json::to_value(state.summary(ctx.today)?)?),
    }
}

pub fn run_monthly(args: MonthlyArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let (_, state) = open_state(ctx)?;
    let totals = match args.loan {
        Some(id) => {
            let loan = state
                .loan(&id)
                .ok_or_else(|| format!("Loan not found: {id}"))?;
            monthly_payment_totals(&loan.payments)
        }
        None => state.monthly_totals(),
    };
    Ok(serde_json::to_value(totals)?)
}

pub fn run_calculate(args: CalculateArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let loan: Loan = input::read_structured(args.input.as_deref())?
        .ok_or("--input file or piped JSON is required for calculate")?;
    Ok(serde_json::to_value(summarize_loan(&loan, ctx.today)?)?)
}
