use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Interest rates in percentage points (12 = 12%), as entered on a loan.
pub type Percent = Decimal;

/// Opaque identifier of the account that owns a set of loans.
pub type UserId = String;

/// Accrual period the stated interest rate refers to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterestType {
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl InterestType {
    /// Number of months covered by one rate period.
    pub fn months_per_period(self) -> u32 {
        match self {
            InterestType::Monthly => 1,
            InterestType::Quarterly => 3,
            InterestType::Yearly => 12,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InterestType::Monthly => "monthly",
            InterestType::Quarterly => "quarterly",
            InterestType::Yearly => "yearly",
        }
    }
}

impl std::fmt::Display for InterestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InterestType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monthly" => Ok(InterestType::Monthly),
            "quarterly" => Ok(InterestType::Quarterly),
            "yearly" | "annual" => Ok(InterestType::Yearly),
            other => Err(format!(
                "Invalid interest type '{other}'. Expected: monthly, quarterly or yearly"
            )),
        }
    }
}

/// A payment received against a loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub amount: Money,
    pub date: NaiveDate,
}

/// A loan issued to a borrower, with the payments received so far in
/// insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: String,
    pub borrower_name: String,
    pub principal_amount: Money,
    pub interest_rate: Percent,
    pub interest_type: InterestType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub payments: Vec<Payment>,
}

/// Fields of a loan supplied on creation. The store assigns the id and
/// starts with an empty payment list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLoan {
    pub borrower_name: String,
    pub principal_amount: Money,
    pub interest_rate: Percent,
    pub interest_type: InterestType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Partial loan edit. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borrower_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal_amount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<Percent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_type: Option<InterestType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPayment {
    pub amount: Money,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl Loan {
    /// Build a loan with no payments from creation fields.
    pub fn from_new(id: impl Into<String>, new: NewLoan) -> Self {
        Loan {
            id: id.into(),
            borrower_name: new.borrower_name,
            principal_amount: new.principal_amount,
            interest_rate: new.interest_rate,
            interest_type: new.interest_type,
            start_date: new.start_date,
            end_date: new.end_date,
            payments: Vec::new(),
        }
    }

    /// Apply a partial edit in place. Payments are never touched.
    pub fn apply_update(&mut self, update: &LoanUpdate) {
        if let Some(name) = &update.borrower_name {
            self.borrower_name = name.clone();
        }
        if let Some(principal) = update.principal_amount {
            self.principal_amount = principal;
        }
        if let Some(rate) = update.interest_rate {
            self.interest_rate = rate;
        }
        if let Some(kind) = update.interest_type {
            self.interest_type = kind;
        }
        if let Some(start) = update.start_date {
            self.start_date = start;
        }
        if let Some(end) = update.end_date {
            self.end_date = end;
        }
    }
}

impl Payment {
    pub fn from_new(id: impl Into<String>, new: NewPayment) -> Self {
        Payment {
            id: id.into(),
            amount: new.amount,
            date: new.date,
        }
    }

    pub fn apply_update(&mut self, update: &PaymentUpdate) {
        if let Some(amount) = update.amount {
            self.amount = amount;
        }
        if let Some(date) = update.date {
            self.date = date;
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
