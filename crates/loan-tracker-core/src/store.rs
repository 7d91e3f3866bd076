//! Durable record store contract for loans and their payments, plus an
//! in-memory implementation.
//!
//! Loans are scoped to the user that created them. Payments are addressed by
//! their own id and live inside their parent loan, so deleting a loan removes
//! its payments with it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{Loan, LoanUpdate, NewLoan, NewPayment, Payment, PaymentUpdate};
use crate::validation::{validate_loan, validate_payment};
use crate::{LoanTrackerError, LoanTrackerResult};

pub trait LoanStore {
    /// Persist a new loan with a generated id and no payments.
    fn create_loan(&mut self, user: &str, new: NewLoan) -> LoanTrackerResult<Loan>;

    /// All loans owned by `user`, newest first, payments included.
    fn list_loans(&self, user: &str) -> LoanTrackerResult<Vec<Loan>>;

    fn get_loan(&self, user: &str, loan_id: &str) -> LoanTrackerResult<Loan>;

    fn update_loan(&mut self, user: &str, loan_id: &str, update: &LoanUpdate) -> LoanTrackerResult<Loan>;

    /// Remove a loan and every payment recorded against it.
    fn delete_loan(&mut self, user: &str, loan_id: &str) -> LoanTrackerResult<()>;

    fn create_payment(&mut self, loan_id: &str, new: NewPayment) -> LoanTrackerResult<Payment>;

    fn update_payment(&mut self, payment_id: &str, update: &PaymentUpdate) -> LoanTrackerResult<Payment>;

    fn delete_payment(&mut self, payment_id: &str) -> LoanTrackerResult<()>;

    /// Payments of one loan, most recent date first.
    fn loan_payments(&self, loan_id: &str) -> LoanTrackerResult<Vec<Payment>>;
}

/// Generate a fresh record identifier.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct LoanRecord {
    owner: String,
    created_at: DateTime<Utc>,
    /// Tie-breaker for loans created within the same clock tick.
    sequence: u64,
    loan: Loan,
}

/// Loans held in process memory. Serializable so a file-backed store can
/// persist the whole ledger as one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStore {
    #[serde(default)]
    records: Vec<LoanRecord>,
    #[serde(default)]
    next_sequence: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of loans across all users.
    pub fn loan_count(&self) -> usize {
        self.records.len()
    }

    fn owned_record(&self, user: &str, loan_id: &str) -> LoanTrackerResult<&LoanRecord> {
        self.records
            .iter()
            .find(|r| r.loan.id == loan_id && r.owner == user)
            .ok_or_else(|| LoanTrackerError::loan_not_found(loan_id))
    }

    fn owned_record_mut(&mut self, user: &str, loan_id: &str) -> LoanTrackerResult<&mut LoanRecord> {
        self.records
            .iter_mut()
            .find(|r| r.loan.id == loan_id && r.owner == user)
            .ok_or_else(|| LoanTrackerError::loan_not_found(loan_id))
    }

    fn payment_mut(&mut self, payment_id: &str) -> LoanTrackerResult<&mut Payment> {
        self.records
            .iter_mut()
            .flat_map(|r| r.loan.payments.iter_mut())
            .find(|p| p.id == payment_id)
            .ok_or_else(|| LoanTrackerError::payment_not_found(payment_id))
    }
}

impl LoanStore for MemoryStore {
    fn create_loan(&mut self, user: &str, new: NewLoan) -> LoanTrackerResult<Loan> {
        let loan = Loan::from_new(generate_id(), new);
        validate_loan(&loan)?;

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.records.push(LoanRecord {
            owner: user.to_string(),
            created_at: Utc::now(),
            sequence,
            loan: loan.clone(),
        });

        tracing::info!(loan_id = %loan.id, user, borrower = %loan.borrower_name, "loan created");
        Ok(loan)
    }

    fn list_loans(&self, user: &str) -> LoanTrackerResult<Vec<Loan>> {
        let mut owned: Vec<&LoanRecord> = self.records.iter().filter(|r| r.owner == user).collect();
        owned.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.sequence.cmp(&a.sequence))
        });
        tracing::debug!(user, count = owned.len(), "listed loans");
        Ok(owned.into_iter().map(|r| r.loan.clone()).collect())
    }

    fn get_loan(&self, user: &str, loan_id: &str) -> LoanTrackerResult<Loan> {
        Ok(self.owned_record(user, loan_id)?.loan.clone())
    }

    fn update_loan(&mut self, user: &str, loan_id: &str, update: &LoanUpdate) -> LoanTrackerResult<Loan> {
        let record = self.owned_record_mut(user, loan_id)?;

        let mut edited = record.loan.clone();
        edited.apply_update(update);
        validate_loan(&edited)?;
        record.loan = edited.clone();

        tracing::info!(loan_id, user, "loan updated");
        Ok(edited)
    }

    fn delete_loan(&mut self, user: &str, loan_id: &str) -> LoanTrackerResult<()> {
        let index = self
            .records
            .iter()
            .position(|r| r.loan.id == loan_id && r.owner == user)
            .ok_or_else(|| LoanTrackerError::loan_not_found(loan_id))?;
        let removed = self.records.remove(index);

        tracing::info!(
            loan_id,
            user,
            payments_removed = removed.loan.payments.len(),
            "loan deleted"
        );
        Ok(())
    }

    fn create_payment(&mut self, loan_id: &str, new: NewPayment) -> LoanTrackerResult<Payment> {
        let payment = Payment::from_new(generate_id(), new);
        validate_payment(&payment)?;

        let record = self
            .records
            .iter_mut()
            .find(|r| r.loan.id == loan_id)
            .ok_or_else(|| LoanTrackerError::loan_not_found(loan_id))?;
        record.loan.payments.push(payment.clone());

        tracing::info!(loan_id, payment_id = %payment.id, amount = %payment.amount, "payment recorded");
        Ok(payment)
    }

    fn update_payment(&mut self, payment_id: &str, update: &PaymentUpdate) -> LoanTrackerResult<Payment> {
        let payment = self.payment_mut(payment_id)?;

        let mut edited = payment.clone();
        edited.apply_update(update);
        validate_payment(&edited)?;
        *payment = edited.clone();

        tracing::info!(payment_id, "payment updated");
        Ok(edited)
    }

    fn delete_payment(&mut self, payment_id: &str) -> LoanTrackerResult<()> {
        for record in &mut self.records {
            if let Some(index) = record.loan.payments.iter().position(|p| p.id == payment_id) {
                record.loan.payments.remove(index);
                tracing::info!(loan_id = %record.loan.id, payment_id, "payment deleted");
                return Ok(());
            }
        }
        Err(LoanTrackerError::payment_not_found(payment_id))
    }

    fn loan_payments(&self, loan_id: &str) -> LoanTrackerResult<Vec<Payment>> {
        let record = self
            .records
            .iter()
            .find(|r| r.loan.id == loan_id)
            .ok_or_else(|| LoanTrackerError::loan_not_found(loan_id))?;
        Ok(crate::monthly::payment_history(&record.loan))
    }
}
