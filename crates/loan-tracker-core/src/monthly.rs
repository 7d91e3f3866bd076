//! Payment totals bucketed by calendar month, for charting.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{Loan, Money, Payment};

/// One chart point: all payments received in a calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    /// First day of the month.
    pub month: NaiveDate,
    /// e.g. "Jan 2024"
    pub label: String,
    pub total: Money,
    pub payment_count: usize,
}

/// Group payments by `(year, month)` and sum each group, ascending by month.
/// Months without payments are not emitted.
pub fn monthly_payment_totals(payments: &[Payment]) -> Vec<MonthlyTotal> {
    bucket(payments.iter())
}

/// Monthly totals across every payment of every loan.
pub fn portfolio_monthly_totals(loans: &[Loan]) -> Vec<MonthlyTotal> {
    bucket(loans.iter().flat_map(|loan| loan.payments.iter()))
}

/// A loan's payments, most recent first. Payments on the same date keep
/// their insertion order.
pub fn payment_history(loan: &Loan) -> Vec<Payment> {
    let mut history = loan.payments.clone();
    history.sort_by(|a, b| b.date.cmp(&a.date));
    history
}

fn bucket<'a>(payments: impl Iterator<Item = &'a Payment>) -> Vec<MonthlyTotal> {
    let mut months: BTreeMap<(i32, u32), (Money, usize)> = BTreeMap::new();
    for payment in payments {
        let entry = months
            .entry((payment.date.year(), payment.date.month()))
            .or_insert((Decimal::ZERO, 0));
        entry.0 += payment.amount;
        entry.1 += 1;
    }

    months
        .into_iter()
        .filter_map(|((year, month), (total, payment_count))| {
            let first = NaiveDate::from_ymd_opt(year, month, 1)?;
            Some(MonthlyTotal {
                month: first,
                label: first.format("%b %Y").to_string(),
                total,
                payment_count,
            })
        })
        .collect()
}
