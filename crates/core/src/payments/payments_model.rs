//! Payment record models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Recurring-payment schedule and progress of one subscribed product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub auto_transfer_id: i64,
    pub to_account_number: String,
    pub amount: i64,
    pub next_payment_date: NaiveDate,
    pub remaining_installments: i32,
    #[serde(default)]
    pub payment_status: String,
}

/// Display label of a payment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentLabel {
    Completed,
    Overdue,
    Scheduled,
}

impl PaymentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentLabel::Completed => "완료",
            PaymentLabel::Overdue => "연체",
            PaymentLabel::Scheduled => "예정",
        }
    }
}

impl std::fmt::Display for PaymentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatus {
    pub label: PaymentLabel,
    pub is_overdue: bool,
}

/// How far a product's installments have progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentProgress {
    pub total_installments: i32,
    pub paid_installments: i32,
    pub paid_amount: i64,
}
