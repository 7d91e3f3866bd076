//! Input checks applied when loans and payments are written to a store.
//!
//! The calculator accepts any `Loan` value; these rules only guard what gets
//! persisted.

use rust_decimal::Decimal;

use crate::{Loan, LoanTrackerError, LoanTrackerResult, Payment};

pub fn validate_loan(loan: &Loan) -> LoanTrackerResult<()> {
    if loan.borrower_name.trim().is_empty() {
        return Err(LoanTrackerError::InvalidInput {
            field: "borrower_name".into(),
            reason: "Borrower name must not be blank.".into(),
        });
    }
    if loan.principal_amount < Decimal::ZERO {
        return Err(LoanTrackerError::InvalidInput {
            field: "principal_amount".into(),
            reason: "Principal amount cannot be negative.".into(),
        });
    }
    if loan.interest_rate < Decimal::ZERO {
        return Err(LoanTrackerError::InvalidInput {
            field: "interest_rate".into(),
            reason: "Interest rate cannot be negative.".into(),
        });
    }
    if loan.end_date < loan.start_date {
        return Err(LoanTrackerError::InvalidInput {
            field: "end_date".into(),
            reason: format!(
                "End date {} is before start date {}.",
                loan.end_date, loan.start_date
            ),
        });
    }
    Ok(())
}

pub fn validate_payment(payment: &Payment) -> LoanTrackerResult<()> {
    if payment.amount < Decimal::ZERO {
        return Err(LoanTrackerError::InvalidInput {
            field: "amount".into(),
            reason: "Payment amount cannot be negative.".into(),
        });
    }
    Ok(())
}
