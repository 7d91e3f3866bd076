//! Interest and repayment-progress figures for a single loan or a portfolio.
//!
//! Interest is simple interest on the original principal: the stated rate is
//! normalised to a flat monthly rate and charged once per complete calendar
//! month between the start and end dates. Nothing compounds and payments do
//! not reduce the interest base. All math uses `rust_decimal::Decimal`.

use chrono::{Datelike, Days, Local, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::status::{deadline_label, DeadlineStatus};
use crate::types::{with_metadata, ComputationOutput, Loan, Money, Percent};
use crate::{LoanTrackerError, LoanTrackerResult};

const PERCENT: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Every computed figure for one loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanSummary {
    pub loan_id: String,
    pub borrower_name: String,
    /// Stated rate normalised to a monthly rate, in percentage points.
    pub monthly_interest_rate: Percent,
    pub total_months: i64,
    pub total_interest: Money,
    pub total_amount: Money,
    pub total_paid: Money,
    /// Negative when the borrower has overpaid.
    pub remaining_amount: Money,
    pub days_remaining: i64,
    pub deadline_status: DeadlineStatus,
    pub deadline_label: String,
    /// `None` when the total payable amount is zero.
    pub progress: Option<Percent>,
    pub payment_count: usize,
}

/// Totals across all loans of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub loan_count: usize,
    pub total_principal: Money,
    pub total_interest: Money,
    pub total_amount: Money,
    pub total_paid: Money,
    pub total_remaining: Money,
    pub on_track_loans: usize,
    pub due_soon_loans: usize,
    pub overdue_loans: usize,
    /// Collected share of everything payable; `None` when nothing is payable.
    pub progress: Option<Percent>,
    pub loans: Vec<LoanSummary>,
}

#[derive(Debug, Serialize)]
struct SummaryAssumptions {
    as_of: NaiveDate,
    interest_basis: &'static str,
    month_counting: &'static str,
}

// ---------------------------------------------------------------------------
// Core figures
// ---------------------------------------------------------------------------

/// Stated rate converted to a flat monthly rate (percentage points).
pub fn monthly_interest_rate(loan: &Loan) -> Percent {
    loan.interest_rate / Decimal::from(loan.interest_type.months_per_period())
}

/// Complete calendar months from the start date to the end date.
///
/// Truncated toward zero and negative for a reversed range. See
/// [`months_between`] for how a trailing partial month is detected.
pub fn total_months(loan: &Loan) -> i64 {
    months_between(loan.start_date, loan.end_date)
}

/// Flat interest over the loan term:
/// `principal * monthly_rate * months / 100`.
pub fn total_interest(loan: &Loan) -> Money {
    // Divide once at the end so quarterly and yearly rates stay exact.
    let periods = Decimal::from(loan.interest_type.months_per_period());
    loan.principal_amount * loan.interest_rate * Decimal::from(total_months(loan))
        / (PERCENT * periods)
}

pub fn total_amount(loan: &Loan) -> Money {
    loan.principal_amount + total_interest(loan)
}

pub fn total_paid(loan: &Loan) -> Money {
    loan.payments.iter().map(|p| p.amount).sum()
}

/// Outstanding balance. Not clamped: an overpaid loan yields a negative value.
pub fn remaining_amount(loan: &Loan) -> Money {
    total_amount(loan) - total_paid(loan)
}

/// Whole days from the start of `today` until the end date, negative once it
/// has passed.
pub fn days_remaining(loan: &Loan, today: NaiveDate) -> i64 {
    (loan.end_date - today).num_days()
}

/// Whole days from the instant `now` until midnight of the end date.
///
/// Partial days are truncated toward zero, so a loan ending tomorrow has zero
/// days left once the current day has started.
pub fn days_remaining_at(loan: &Loan, now: NaiveDateTime) -> i64 {
    (loan.end_date.and_time(NaiveTime::MIN) - now).num_days()
}

/// [`days_remaining_at`] measured from the current local time.
pub fn days_remaining_from_now(loan: &Loan) -> i64 {
    days_remaining_at(loan, Local::now().naive_local())
}

/// Percentage of the total payable amount collected so far.
///
/// Returns `DivisionByZero` when the loan has nothing payable (zero principal
/// and zero interest).
pub fn progress(loan: &Loan) -> LoanTrackerResult<Percent> {
    let collected = safe_divide(total_paid(loan), total_amount(loan), "total paid / total amount")?;
    Ok(collected * PERCENT)
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// Compute every figure for one loan as of `today`.
pub fn summarize_loan(
    loan: &Loan,
    today: NaiveDate,
) -> LoanTrackerResult<ComputationOutput<LoanSummary>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let summary = build_summary(loan, today, &mut warnings);

    let assumptions = SummaryAssumptions {
        as_of: today,
        interest_basis: "simple interest on original principal",
        month_counting: "complete calendar months",
    };

    Ok(with_metadata(
        "Flat monthly-equivalent interest over complete months",
        &assumptions,
        warnings,
        start.elapsed().as_micros() as u64,
        summary,
    ))
}

/// Aggregate figures across a set of loans as of `today`.
pub fn summarize_portfolio(
    loans: &[Loan],
    today: NaiveDate,
) -> LoanTrackerResult<ComputationOutput<PortfolioSummary>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let mut summaries = Vec::with_capacity(loans.len());
    for loan in loans {
        let mut loan_warnings = Vec::new();
        let summary = build_summary(loan, today, &mut loan_warnings);
        warnings.extend(
            loan_warnings
                .into_iter()
                .map(|w| format!("{} ({}): {}", loan.borrower_name, loan.id, w)),
        );
        summaries.push(summary);
    }

    let total_principal: Money = loans.iter().map(|l| l.principal_amount).sum();
    let total_interest: Money = summaries.iter().map(|s| s.total_interest).sum();
    let total_amount: Money = summaries.iter().map(|s| s.total_amount).sum();
    let total_paid: Money = summaries.iter().map(|s| s.total_paid).sum();

    let count_status =
        |status: DeadlineStatus| summaries.iter().filter(|s| s.deadline_status == status).count();

    let progress = if total_amount.is_zero() {
        None
    } else {
        Some(total_paid / total_amount * PERCENT)
    };

    let result = PortfolioSummary {
        loan_count: loans.len(),
        total_principal,
        total_interest,
        total_amount,
        total_paid,
        total_remaining: total_amount - total_paid,
        on_track_loans: count_status(DeadlineStatus::OnTrack),
        due_soon_loans: count_status(DeadlineStatus::DueSoon),
        overdue_loans: count_status(DeadlineStatus::Overdue),
        progress,
        loans: summaries,
    };

    let assumptions = SummaryAssumptions {
        as_of: today,
        interest_basis: "simple interest on original principal",
        month_counting: "complete calendar months",
    };

    Ok(with_metadata(
        "Sum of per-loan flat interest figures",
        &assumptions,
        warnings,
        start.elapsed().as_micros() as u64,
        result,
    ))
}

fn build_summary(loan: &Loan, today: NaiveDate, warnings: &mut Vec<String>) -> LoanSummary {
    let months = total_months(loan);
    if loan.end_date < loan.start_date {
        warnings.push("End date precedes start date; interest is negative.".into());
    } else if months == 0 {
        warnings.push("Loan term is shorter than one month; no interest accrues.".into());
    }

    let amount = total_amount(loan);
    let paid = total_paid(loan);
    let remaining = amount - paid;
    if remaining < Decimal::ZERO {
        warnings.push(format!("Loan is overpaid by {}.", -remaining));
    }

    let progress = match progress(loan) {
        Ok(p) => Some(p),
        Err(_) => {
            warnings.push("Total payable amount is zero; progress is undefined.".into());
            None
        }
    };

    let days = days_remaining(loan, today);

    LoanSummary {
        loan_id: loan.id.clone(),
        borrower_name: loan.borrower_name.clone(),
        monthly_interest_rate: monthly_interest_rate(loan),
        total_months: months,
        total_interest: total_interest(loan),
        total_amount: amount,
        total_paid: paid,
        remaining_amount: remaining,
        days_remaining: days,
        deadline_status: DeadlineStatus::from_days_remaining(days),
        deadline_label: deadline_label(days),
        progress,
        payment_count: loan.payments.len(),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Signed count of complete calendar months from `start` to `end`.
///
/// The end date is stepped back by the calendar-month difference with
/// day-of-month overflow rolling into the following month. An end date late
/// in February is first moved to the 30th (which itself rolls into March).
/// If the stepped date lands before `start` the last month is incomplete.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> i64 {
    if end == start {
        return 0;
    }
    let sign: i64 = if end > start { 1 } else { -1 };
    let raw = (end.year() as i64 - start.year() as i64) * 12 + end.month() as i64
        - start.month() as i64;
    let difference = raw.abs();
    if difference < 1 {
        return 0;
    }

    let mut anchor = Some(end);
    if end.month() == 2 && end.day() > 27 {
        anchor = rolled_date(end.year() as i64, end.month0() as i64, 30);
    }
    let shifted = anchor.and_then(|a| {
        rolled_date(a.year() as i64, a.month0() as i64 - sign * difference, a.day())
    });

    let mut incomplete = match shifted {
        Some(d) if sign > 0 => d < start,
        Some(d) => d > start,
        None => false,
    };
    if sign > 0 && difference == 1 && is_last_day_of_month(end) {
        incomplete = false;
    }

    sign * (difference - i64::from(incomplete))
}

/// Build a date from a zero-based month that may fall outside `0..12` and a
/// day that may exceed the month's length; both overflow forward.
fn rolled_date(year: i64, month0: i64, day: u32) -> Option<NaiveDate> {
    let year = year + month0.div_euclid(12);
    let month = month0.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, 1)?
        .checked_add_days(Days::new(u64::from(day.saturating_sub(1))))
}

fn is_last_day_of_month(date: NaiveDate) -> bool {
    date.succ_opt().map_or(true, |next| next.month() != date.month())
}

fn safe_divide(numerator: Decimal, denominator: Decimal, context: &str) -> LoanTrackerResult<Decimal> {
    if denominator.is_zero() {
        return Err(LoanTrackerError::DivisionByZero {
            context: context.to_string(),
        });
    }
    Ok(numerator / denominator)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{InterestType, Payment};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn loan(rate: Decimal, kind: InterestType, start: NaiveDate, end: NaiveDate) -> Loan {
        Loan {
            id: "loan-1".into(),
            borrower_name: "Ravi".into(),
            principal_amount: dec!(100_000),
            interest_rate: rate,
            interest_type: kind,
            start_date: start,
            end_date: end,
            payments: vec![],
        }
    }

    #[test]
    fn test_months_between_whole_year() {
        assert_eq!(months_between(date(2024, 1, 1), date(2025, 1, 1)), 12);
    }

    #[test]
    fn test_months_between_partial_month_truncated() {
        // Jan 15 -> Mar 14 is one complete month plus 27 days
        assert_eq!(months_between(date(2024, 1, 15), date(2024, 3, 14)), 1);
        assert_eq!(months_between(date(2024, 1, 15), date(2024, 3, 15)), 2);
    }

    #[test]
    fn test_months_between_same_month() {
        assert_eq!(months_between(date(2024, 5, 1), date(2024, 5, 31)), 0);
    }

    #[test]
    fn test_months_between_end_of_month_anchor() {
        // Shorter February still counts as a complete month from Jan 31
        assert_eq!(months_between(date(2024, 1, 31), date(2024, 2, 29)), 1);
        assert_eq!(months_between(date(2023, 1, 31), date(2023, 2, 28)), 1);
    }

    #[test]
    fn test_months_between_late_february_end() {
        // Feb 28 is treated as the 30th, which rolls into March before
        // stepping back: 2024-02-28 -> 2024-03-01 -> 2024-02-01 >= Jan 31
        assert_eq!(months_between(date(2024, 1, 31), date(2024, 2, 28)), 1);
        // 2025-02-28 -> 2025-03-02 -> 2024-12-02, past Nov 30
        assert_eq!(months_between(date(2024, 11, 30), date(2025, 2, 28)), 3);
        assert_eq!(months_between(date(2023, 11, 30), date(2024, 2, 28)), 3);
        // Feb 27 is left alone: Nov 27 is exactly three months back
        assert_eq!(months_between(date(2024, 11, 30), date(2025, 2, 27)), 2);
    }

    #[test]
    fn test_months_between_step_overflows_instead_of_clamping() {
        // Jan 31 stepped forward one month is Feb 31, i.e. Mar 2, after Feb 29
        assert_eq!(months_between(date(2024, 2, 29), date(2024, 1, 31)), 0);
        // Mar 31 stepped forward one month is Apr 31, i.e. May 1, after Apr 30
        assert_eq!(months_between(date(2024, 4, 30), date(2024, 3, 31)), 0);
        assert_eq!(months_between(date(2024, 4, 30), date(2024, 3, 30)), -1);
    }

    #[test]
    fn test_late_february_end_charges_full_months() {
        let l = loan(dec!(1), InterestType::Monthly, date(2024, 11, 30), date(2025, 2, 28));
        assert_eq!(total_months(&l), 3);
        assert_eq!(total_interest(&l), dec!(3_000));
    }

    #[test]
    fn test_months_between_reversed_is_negative() {
        assert_eq!(months_between(date(2025, 1, 1), date(2024, 1, 1)), -12);
        assert_eq!(months_between(date(2024, 3, 14), date(2024, 1, 15)), -1);
    }

    #[test]
    fn test_monthly_rate_by_type() {
        let start = date(2024, 1, 1);
        let end = date(2025, 1, 1);
        assert_eq!(monthly_interest_rate(&loan(dec!(12), InterestType::Monthly, start, end)), dec!(12));
        assert_eq!(monthly_interest_rate(&loan(dec!(12), InterestType::Quarterly, start, end)), dec!(4));
        assert_eq!(monthly_interest_rate(&loan(dec!(12), InterestType::Yearly, start, end)), dec!(1));
    }

    #[test]
    fn test_yearly_interest_is_exact() {
        // 10% a year over 12 months on 100k = 10k, no repeating-decimal drift
        let l = loan(dec!(10), InterestType::Yearly, date(2024, 1, 1), date(2025, 1, 1));
        assert_eq!(total_interest(&l), dec!(10_000));
    }

    #[test]
    fn test_reference_loan() {
        let l = loan(dec!(12), InterestType::Monthly, date(2024, 1, 1), date(2025, 1, 1));
        assert_eq!(total_months(&l), 12);
        assert_eq!(total_interest(&l), dec!(144_000));
        assert_eq!(total_amount(&l), dec!(244_000));
        assert_eq!(total_paid(&l), Decimal::ZERO);
        assert_eq!(remaining_amount(&l), dec!(244_000));
    }

    #[test]
    fn test_progress_with_payment() {
        let mut l = loan(dec!(12), InterestType::Monthly, date(2024, 1, 1), date(2025, 1, 1));
        l.payments.push(Payment {
            id: "p1".into(),
            amount: dec!(50_000),
            date: date(2024, 3, 1),
        });
        assert_eq!(remaining_amount(&l), dec!(194_000));
        let p = progress(&l).unwrap();
        assert!((p - dec!(20.49)).abs() < dec!(0.01), "progress was {p}");
    }

    #[test]
    fn test_progress_zero_total_is_error() {
        let mut l = loan(dec!(0), InterestType::Monthly, date(2024, 1, 1), date(2025, 1, 1));
        l.principal_amount = Decimal::ZERO;
        assert!(matches!(
            progress(&l),
            Err(LoanTrackerError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_days_remaining() {
        let l = loan(dec!(1), InterestType::Monthly, date(2024, 1, 1), date(2024, 6, 30));
        assert_eq!(days_remaining(&l, date(2024, 6, 1)), 29);
        assert_eq!(days_remaining(&l, date(2024, 6, 30)), 0);
        assert_eq!(days_remaining(&l, date(2024, 7, 10)), -10);
    }

    #[test]
    fn test_days_remaining_at_truncates_partial_days() {
        let l = loan(dec!(1), InterestType::Monthly, date(2024, 1, 1), date(2024, 6, 2));
        let afternoon = |d: NaiveDate| d.and_hms_opt(15, 0, 0).unwrap();
        // Due tomorrow, but less than a whole day is left
        assert_eq!(days_remaining_at(&l, afternoon(date(2024, 6, 1))), 0);
        assert_eq!(days_remaining_at(&l, date(2024, 6, 1).and_time(NaiveTime::MIN)), 1);
        assert_eq!(days_remaining(&l, date(2024, 6, 1)), 1);
        // 39 hours past the end date
        assert_eq!(days_remaining_at(&l, afternoon(date(2024, 6, 3))), -1);
        // Badge boundary: 30 days plus a few hours is still due soon
        assert_eq!(days_remaining_at(&l, afternoon(date(2024, 5, 2))), 30);
        assert_eq!(days_remaining(&l, date(2024, 5, 2)), 31);
    }

    #[test]
    fn test_summary_warns_on_overpayment() {
        let mut l = loan(dec!(0), InterestType::Monthly, date(2024, 1, 1), date(2024, 2, 1));
        l.payments.push(Payment {
            id: "p1".into(),
            amount: dec!(120_000),
            date: date(2024, 1, 20),
        });
        let out = summarize_loan(&l, date(2024, 1, 25)).unwrap();
        assert_eq!(out.result.remaining_amount, dec!(-20_000));
        assert!(out.warnings.iter().any(|w| w.contains("overpaid")));
    }
}
