//! JSON file backed record store.
//!
//! The whole ledger is read when opened and rewritten after every successful
//! mutation. Writes go to a sibling temp file that is renamed over the
//! ledger.

use std::fs;
use std::path::{Path, PathBuf};

use loan_tracker_core::store::{LoanStore, MemoryStore};
use loan_tracker_core::{
    Loan, LoanTrackerError, LoanTrackerResult, LoanUpdate, NewLoan, NewPayment, Payment,
    PaymentUpdate,
};

pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    /// Open a ledger, starting empty when the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> LoanTrackerResult<Self> {
        let path = path.as_ref().to_path_buf();
        let inner = if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|e| {
                LoanTrackerError::StorageError(format!("Failed to read '{}': {}", path.display(), e))
            })?;
            if contents.trim().is_empty() {
                MemoryStore::new()
            } else {
                serde_json::from_str(&contents)?
            }
        } else {
            tracing::debug!(path = %path.display(), "ledger not found, starting empty");
            MemoryStore::new()
        };
        tracing::debug!(path = %path.display(), loans = inner.loan_count(), "ledger opened");
        Ok(JsonFileStore { path, inner })
    }

    fn save(&self) -> LoanTrackerResult<()> {
        let json = serde_json::to_string_pretty(&self.inner)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| {
            LoanTrackerError::StorageError(format!("Failed to write '{}': {}", tmp.display(), e))
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            LoanTrackerError::StorageError(format!(
                "Failed to replace '{}': {}",
                self.path.display(),
                e
            ))
        })?;
        tracing::debug!(path = %self.path.display(), "ledger saved");
        Ok(())
    }
}

impl LoanStore for JsonFileStore {
    fn create_loan(&mut self, user: &str, new: NewLoan) -> LoanTrackerResult<Loan> {
        let loan = self.inner.create_loan(user, new)?;
        self.save()?;
        Ok(loan)
    }

    fn list_loans(&self, user: &str) -> LoanTrackerResult<Vec<Loan>> {
        self.inner.list_loans(user)
    }

    fn get_loan(&self, user: &str, loan_id: &str) -> LoanTrackerResult<Loan> {
        self.inner.get_loan(user, loan_id)
    }

    fn update_loan(&mut self, user: &str, loan_id: &str, update: &LoanUpdate) -> LoanTrackerResult<Loan> {
        let loan = self.inner.update_loan(user, loan_id, update)?;
        self.save()?;
        Ok(loan)
    }

    fn delete_loan(&mut self, user: &str, loan_id: &str) -> LoanTrackerResult<()> {
        self.inner.delete_loan(user, loan_id)?;
        self.save()
    }

    fn create_payment(&mut self, loan_id: &str, new: NewPayment) -> LoanTrackerResult<Payment> {
        let payment = self.inner.create_payment(loan_id, new)?;
        self.save()?;
        Ok(payment)
    }

    fn update_payment(&mut self, payment_id: &str, update: &PaymentUpdate) -> LoanTrackerResult<Payment> {
        let payment = self.inner.update_payment(payment_id, update)?;
        self.save()?;
        Ok(payment)
    }

    fn delete_payment(&mut self, payment_id: &str) -> LoanTrackerResult<()> {
        self.inner.delete_payment(payment_id)?;
        self.save()
    }

    fn loan_payments(&self, loan_id: &str) -> LoanTrackerResult<Vec<Payment>> {
        self.inner.loan_payments(loan_id)
    }
}
