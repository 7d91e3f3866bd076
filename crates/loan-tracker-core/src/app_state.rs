//! Explicit application state for a signed-in user.
//!
//! `AppState` caches the user's loans in memory. Commands are applied to the
//! record store first, which stays the source of truth, and the returned
//! state reflects what the store accepted. The previous state is left intact
//! when a command fails.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calculator::{summarize_portfolio, PortfolioSummary};
use crate::monthly::{portfolio_monthly_totals, MonthlyTotal};
use crate::store::LoanStore;
use crate::types::{ComputationOutput, Loan, LoanUpdate, NewLoan, NewPayment, PaymentUpdate, UserId};
use crate::{LoanTrackerError, LoanTrackerResult};

/// A user action that changes loans or payments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    AddLoan {
        loan: NewLoan,
    },
    EditLoan {
        loan_id: String,
        update: LoanUpdate,
    },
    DeleteLoan {
        loan_id: String,
    },
    AddPayment {
        loan_id: String,
        payment: NewPayment,
    },
    EditPayment {
        loan_id: String,
        payment_id: String,
        update: PaymentUpdate,
    },
    DeletePayment {
        loan_id: String,
        payment_id: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub user: UserId,
    /// Newest first, mirroring the store's listing order.
    pub loans: Vec<Loan>,
}

impl AppState {
    /// Empty state for a user with nothing loaded yet.
    pub fn new(user: impl Into<UserId>) -> Self {
        AppState {
            user: user.into(),
            loans: Vec::new(),
        }
    }

    /// Fill the cache from the store.
    pub fn load<S: LoanStore>(store: &S, user: impl Into<UserId>) -> LoanTrackerResult<Self> {
        let user = user.into();
        let loans = store.list_loans(&user)?;
        tracing::debug!(user = %user, loans = loans.len(), "application state loaded");
        Ok(AppState { user, loans })
    }

    pub fn loan(&self, loan_id: &str) -> Option<&Loan> {
        self.loans.iter().find(|l| l.id == loan_id)
    }

    /// Apply `command` to the store, then return the updated state.
    pub fn apply<S: LoanStore>(&self, store: &mut S, command: Command) -> LoanTrackerResult<Self> {
        let mut next = self.clone();
        match command {
            Command::AddLoan { loan } => {
                let created = store.create_loan(&self.user, loan)?;
                next.loans.insert(0, created);
            }
            Command::EditLoan { loan_id, update } => {
                let updated = store.update_loan(&self.user, &loan_id, &update)?;
                *next.cached_loan_mut(&loan_id)? = updated;
            }
            Command::DeleteLoan { loan_id } => {
                store.delete_loan(&self.user, &loan_id)?;
                next.loans.retain(|l| l.id != loan_id);
            }
            Command::AddPayment { loan_id, payment } => {
                next.cached_loan_mut(&loan_id)?;
                let created = store.create_payment(&loan_id, payment)?;
                next.cached_loan_mut(&loan_id)?.payments.push(created);
            }
            Command::EditPayment {
                loan_id,
                payment_id,
                update,
            } => {
                ensure_payment_in_loan(next.cached_loan_mut(&loan_id)?, &payment_id)?;
                let updated = store.update_payment(&payment_id, &update)?;
                let loan = next.cached_loan_mut(&loan_id)?;
                if let Some(p) = loan.payments.iter_mut().find(|p| p.id == payment_id) {
                    *p = updated;
                }
            }
            Command::DeletePayment { loan_id, payment_id } => {
                ensure_payment_in_loan(next.cached_loan_mut(&loan_id)?, &payment_id)?;
                store.delete_payment(&payment_id)?;
                next.cached_loan_mut(&loan_id)?
                    .payments
                    .retain(|p| p.id != payment_id);
            }
        }
        Ok(next)
    }

    /// Portfolio figures over the cached loans.
    pub fn summary(&self, today: NaiveDate) -> LoanTrackerResult<ComputationOutput<PortfolioSummary>> {
        summarize_portfolio(&self.loans, today)
    }

    /// Overall monthly payment chart data over the cached loans.
    pub fn monthly_totals(&self) -> Vec<MonthlyTotal> {
        portfolio_monthly_totals(&self.loans)
    }

    fn cached_loan_mut(&mut self, loan_id: &str) -> LoanTrackerResult<&mut Loan> {
        self.loans
            .iter_mut()
            .find(|l| l.id == loan_id)
            .ok_or_else(|| LoanTrackerError::loan_not_found(loan_id))
    }
}

fn ensure_payment_in_loan(loan: &Loan, payment_id: &str) -> LoanTrackerResult<()> {
    if loan.payments.iter().any(|p| p.id == payment_id) {
        Ok(())
    } else {
        Err(LoanTrackerError::payment_not_found(payment_id))
    }
}
