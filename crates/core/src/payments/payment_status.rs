//! Pure derivation of a payment record's display state.
//!
//! Nothing here performs I/O; `today` is always passed in.

use chrono::NaiveDate;

use super::payments_model::{PaymentLabel, PaymentProgress, PaymentRecord, PaymentStatus};

/// Computes the label and overdue flag of a record as of `today`.
///
/// A record with no remaining installments is completed regardless of its
/// next payment date. Otherwise it is overdue when its next payment date is
/// already in the past.
pub fn compute_status(record: &PaymentRecord, today: NaiveDate) -> PaymentStatus {
    let is_overdue = record.next_payment_date < today && record.remaining_installments > 0;

    let label = if record.remaining_installments == 0 {
        PaymentLabel::Completed
    } else if is_overdue {
        PaymentLabel::Overdue
    } else {
        PaymentLabel::Scheduled
    };

    PaymentStatus { label, is_overdue }
}

/// Installments paid so far, given the plan length and the product's monthly
/// amount. Clamped to the plan length.
pub fn compute_progress(
    record: &PaymentRecord,
    monthly_amount: i64,
    total_installments: i32,
) -> PaymentProgress {
    let total = total_installments.max(0);
    let remaining = record.remaining_installments.clamp(0, total);
    let paid = total - remaining;

    PaymentProgress {
        total_installments: total,
        paid_installments: paid,
        paid_amount: i64::from(paid) * monthly_amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(next: NaiveDate, remaining: i32) -> PaymentRecord {
        PaymentRecord {
            auto_transfer_id: 1,
            to_account_number: "333-01-000001".to_string(),
            amount: 600_000,
            next_payment_date: next,
            remaining_installments: remaining,
            payment_status: "ACTIVE".to_string(),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn test_no_remaining_installments_is_completed() {
        for next in [day(1), day(16), day(30)] {
            let status = compute_status(&record(next, 0), day(16));
            assert_eq!(status.label, PaymentLabel::Completed);
            assert!(!status.is_overdue);
        }
    }

    #[test]
    fn test_past_date_with_remaining_is_overdue() {
        let status = compute_status(&record(day(15), 3), day(16));
        assert!(status.is_overdue);
        assert_eq!(status.label, PaymentLabel::Overdue);
        assert_eq!(status.label.as_str(), "연체");
    }

    #[test]
    fn test_today_or_later_is_scheduled() {
        assert_eq!(
            compute_status(&record(day(16), 3), day(16)).label,
            PaymentLabel::Scheduled
        );
        assert_eq!(
            compute_status(&record(day(25), 1), day(16)).label.to_string(),
            "예정"
        );
    }

    #[test]
    fn test_progress_counts_paid_installments() {
        let progress = compute_progress(&record(day(25), 20), 600_000, 24);
        assert_eq!(progress.paid_installments, 4);
        assert_eq!(progress.paid_amount, 2_400_000);

        let clamped = compute_progress(&record(day(25), 30), 600_000, 24);
        assert_eq!(clamped.paid_installments, 0);
    }
}
