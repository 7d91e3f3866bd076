pub mod calculator;
pub mod error;
pub mod monthly;
pub mod status;
pub mod types;
pub mod validation;

#[cfg(feature = "store")]
pub mod store;

#[cfg(feature = "store")]
pub mod app_state;

pub use error::LoanTrackerError;
pub use types::*;

/// Standard result type for all loan-tracker operations
pub type LoanTrackerResult<T> = Result<T, LoanTrackerError>;
