use chrono::NaiveDate;
use loan_tracker_core::calculator::{self, summarize_loan, summarize_portfolio};
use loan_tracker_core::monthly::{monthly_payment_totals, portfolio_monthly_totals};
use loan_tracker_core::status::DeadlineStatus;
use loan_tracker_core::{InterestType, Loan, Payment};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn reference_loan() -> Loan {
    // 1 lakh at 12% a month for one year
    Loan {
        id: "ref".into(),
        borrower_name: "Kiran".into(),
        principal_amount: dec!(100_000),
        interest_rate: dec!(12),
        interest_type: InterestType::Monthly,
        start_date: date(2024, 1, 1),
        end_date: date(2025, 1, 1),
        payments: vec![],
    }
}

fn with_payment(mut loan: Loan, id: &str, amount: Decimal, on: NaiveDate) -> Loan {
    loan.payments.push(Payment {
        id: id.into(),
        amount,
        date: on,
    });
    loan
}

// ===========================================================================
// Core figures
// ===========================================================================

#[test]
fn test_reference_loan_figures() {
    let loan = reference_loan();
    assert_eq!(calculator::total_months(&loan), 12);
    assert_eq!(calculator::total_interest(&loan), dec!(144_000));
    assert_eq!(calculator::total_amount(&loan), dec!(244_000));
}

#[test]
fn test_reference_loan_with_one_payment() {
    let loan = with_payment(reference_loan(), "p1", dec!(50_000), date(2024, 2, 10));
    assert_eq!(calculator::total_paid(&loan), dec!(50_000));
    assert_eq!(calculator::remaining_amount(&loan), dec!(194_000));

    let progress = calculator::progress(&loan).unwrap();
    // 50000 / 244000 = 20.4918...%
    assert_eq!(progress.round_dp(2), dec!(20.49));
}

#[test]
fn test_total_is_principal_plus_interest_for_every_type() {
    for kind in [InterestType::Monthly, InterestType::Quarterly, InterestType::Yearly] {
        let mut loan = reference_loan();
        loan.interest_type = kind;
        loan.interest_rate = dec!(7.5);
        loan.end_date = date(2026, 8, 17);
        assert_eq!(
            calculator::total_amount(&loan),
            loan.principal_amount + calculator::total_interest(&loan)
        );
    }
}

#[test]
fn test_no_payments_means_nothing_paid() {
    let loan = reference_loan();
    assert_eq!(calculator::total_paid(&loan), Decimal::ZERO);
    assert_eq!(calculator::remaining_amount(&loan), calculator::total_amount(&loan));
    assert_eq!(calculator::progress(&loan).unwrap(), Decimal::ZERO);
}

#[test]
fn test_monthly_rate_equivalence() {
    let mut monthly = reference_loan();
    monthly.interest_rate = dec!(9);
    let mut quarterly = monthly.clone();
    quarterly.interest_type = InterestType::Quarterly;
    let mut yearly = monthly.clone();
    yearly.interest_type = InterestType::Yearly;

    let base = calculator::monthly_interest_rate(&monthly);
    assert_eq!(base, dec!(9));
    assert_eq!(calculator::monthly_interest_rate(&quarterly), base / dec!(3));
    assert_eq!(calculator::monthly_interest_rate(&yearly), base / dec!(12));
}

#[test]
fn test_quarterly_interest() {
    // 6% per quarter = 2% per month; 6 months on 100k = 12k
    let mut loan = reference_loan();
    loan.interest_rate = dec!(6);
    loan.interest_type = InterestType::Quarterly;
    loan.end_date = date(2024, 7, 1);
    assert_eq!(calculator::total_interest(&loan), dec!(12_000));
}

#[test]
fn test_zero_duration_loan() {
    let mut loan = reference_loan();
    loan.end_date = loan.start_date;
    assert_eq!(calculator::total_months(&loan), 0);
    assert_eq!(calculator::total_interest(&loan), Decimal::ZERO);
    assert_eq!(calculator::total_amount(&loan), dec!(100_000));
}

#[test]
fn test_interest_is_not_reduced_by_payments() {
    let loan = reference_loan();
    let paid = with_payment(reference_loan(), "p1", dec!(90_000), date(2024, 2, 1));
    assert_eq!(
        calculator::total_interest(&loan),
        calculator::total_interest(&paid)
    );
}

#[test]
fn test_overpaid_remaining_is_negative() {
    let loan = with_payment(reference_loan(), "p1", dec!(250_000), date(2024, 12, 1));
    assert_eq!(calculator::remaining_amount(&loan), dec!(-6_000));
    assert!(calculator::progress(&loan).unwrap() > dec!(100));
}

#[test]
fn test_days_remaining_past_is_negative() {
    let loan = reference_loan();
    assert_eq!(calculator::days_remaining(&loan, date(2024, 12, 2)), 30);
    assert_eq!(calculator::days_remaining(&loan, date(2025, 1, 31)), -30);
}

// ===========================================================================
// Summaries
// ===========================================================================

#[test]
fn test_summary_envelope() {
    let loan = with_payment(reference_loan(), "p1", dec!(50_000), date(2024, 2, 10));
    let out = summarize_loan(&loan, date(2024, 6, 1)).unwrap();
    let s = &out.result;

    assert_eq!(s.loan_id, "ref");
    assert_eq!(s.total_amount, dec!(244_000));
    assert_eq!(s.remaining_amount, dec!(194_000));
    assert_eq!(s.payment_count, 1);
    assert_eq!(s.deadline_status, DeadlineStatus::OnTrack);
    assert_eq!(s.days_remaining, 214);
    assert!(s.progress.is_some());
    assert!(out.warnings.is_empty());
    assert_eq!(out.metadata.precision, "rust_decimal_128bit");
}

#[test]
fn test_summary_zero_total_has_no_progress() {
    let mut loan = reference_loan();
    loan.principal_amount = Decimal::ZERO;
    let out = summarize_loan(&loan, date(2024, 6, 1)).unwrap();
    assert_eq!(out.result.progress, None);
    assert!(out.warnings.iter().any(|w| w.contains("progress is undefined")));
}

#[test]
fn test_summary_warns_on_reversed_dates() {
    let mut loan = reference_loan();
    loan.end_date = date(2023, 1, 1);
    let out = summarize_loan(&loan, date(2024, 6, 1)).unwrap();
    assert_eq!(out.result.total_months, -12);
    assert!(out.result.total_interest < Decimal::ZERO);
    assert!(out.warnings.iter().any(|w| w.contains("precedes start date")));
    assert_eq!(out.result.deadline_status, DeadlineStatus::Overdue);
}

#[test]
fn test_portfolio_summary_totals() {
    let first = with_payment(reference_loan(), "p1", dec!(44_000), date(2024, 3, 1));
    let mut second = reference_loan();
    second.id = "second".into();
    second.principal_amount = dec!(10_000);
    second.interest_rate = dec!(0);
    second.end_date = date(2024, 6, 15);

    let out = summarize_portfolio(&[first, second], date(2024, 6, 1)).unwrap();
    let p = &out.result;

    assert_eq!(p.loan_count, 2);
    assert_eq!(p.total_principal, dec!(110_000));
    assert_eq!(p.total_interest, dec!(144_000));
    assert_eq!(p.total_amount, dec!(254_000));
    assert_eq!(p.total_paid, dec!(44_000));
    assert_eq!(p.total_remaining, dec!(210_000));
    assert_eq!(p.on_track_loans, 1);
    assert_eq!(p.due_soon_loans, 1);
    assert_eq!(p.overdue_loans, 0);
    assert_eq!(p.loans.len(), 2);
}

#[test]
fn test_empty_portfolio() {
    let out = summarize_portfolio(&[], date(2024, 6, 1)).unwrap();
    assert_eq!(out.result.loan_count, 0);
    assert_eq!(out.result.progress, None);
}

// ===========================================================================
// Monthly buckets
// ===========================================================================

#[test]
fn test_monthly_buckets_for_one_loan() {
    let loan = with_payment(reference_loan(), "a", dec!(100), date(2024, 1, 5));
    let loan = with_payment(loan, "b", dec!(200), date(2024, 1, 20));
    let loan = with_payment(loan, "c", dec!(50), date(2024, 2, 1));

    let totals = monthly_payment_totals(&loan.payments);
    assert_eq!(totals.len(), 2);
    assert_eq!(totals[0].month, date(2024, 1, 1));
    assert_eq!(totals[0].total, dec!(300));
    assert_eq!(totals[1].month, date(2024, 2, 1));
    assert_eq!(totals[1].total, dec!(50));
}

#[test]
fn test_portfolio_buckets_merge_loans() {
    let a = with_payment(reference_loan(), "a", dec!(100), date(2024, 1, 5));
    let mut b = with_payment(reference_loan(), "b", dec!(25), date(2024, 1, 28));
    b.id = "other".into();
    let b = with_payment(b, "c", dec!(75), date(2023, 12, 2));

    let totals = portfolio_monthly_totals(&[a, b]);
    assert_eq!(totals.len(), 2);
    assert_eq!(totals[0].label, "Dec 2023");
    assert_eq!(totals[0].total, dec!(75));
    assert_eq!(totals[1].label, "Jan 2024");
    assert_eq!(totals[1].total, dec!(125));
    assert_eq!(totals[1].payment_count, 2);
}
