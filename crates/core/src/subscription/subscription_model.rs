//! Subscription domain models and the per-product flow state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::goals::GoalId;

/// The couple's shared settlement account, used to fund subscriptions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FundingAccount {
    pub account_number: String,
    #[serde(default)]
    pub account_name: String,
    #[serde(default)]
    pub bank_name: String,
    #[serde(default)]
    pub balance: i64,
}

/// Calendar day of the month on which the recurring payment runs.
///
/// Only these days are offered. The wire form is `"매월 N일"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum PaymentDay {
    Day1,
    Day5,
    Day10,
    Day15,
    Day20,
    Day25,
}

impl PaymentDay {
    pub const ALL: [PaymentDay; 6] = [
        PaymentDay::Day1,
        PaymentDay::Day5,
        PaymentDay::Day10,
        PaymentDay::Day15,
        PaymentDay::Day20,
        PaymentDay::Day25,
    ];

    pub fn day(&self) -> u32 {
        match self {
            PaymentDay::Day1 => 1,
            PaymentDay::Day5 => 5,
            PaymentDay::Day10 => 10,
            PaymentDay::Day15 => 15,
            PaymentDay::Day20 => 20,
            PaymentDay::Day25 => 25,
        }
    }

    pub fn from_day(day: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|choice| choice.day() == day)
    }

    pub fn label(&self) -> String {
        format!("매월 {}일", self.day())
    }
}

impl std::fmt::Display for PaymentDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "매월 {}일", self.day())
    }
}

impl std::str::FromStr for PaymentDay {
    type Err = ValidationError;

    /// Accepts `"매월 25일"`, `"25일"` or `"25"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .trim_start_matches("매월")
            .trim()
            .trim_end_matches('일')
            .trim();

        digits
            .parse::<u32>()
            .ok()
            .and_then(PaymentDay::from_day)
            .ok_or_else(|| ValidationError::InvalidInput(format!("unsupported payment date '{}'", s)))
    }
}

impl From<PaymentDay> for String {
    fn from(day: PaymentDay) -> Self {
        day.label()
    }
}

impl TryFrom<String> for PaymentDay {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Subscription request sent once PIN verification succeeded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRequest {
    pub product_id: i64,
    pub period_months: i32,
    pub monthly_amount: i64,
    pub source_account_number: String,
    pub payment_date: PaymentDay,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionReceipt {
    pub subscription_id: i64,
    /// The product's new settlement account.
    pub account_number: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub maturity_date: Option<NaiveDate>,
}

/// Where one product's subscription flow stands.
///
/// A failed subscription call does not park the flow in a separate state: it
/// returns to `PendingPinVerification` with the failure recorded, so the user
/// can retry right away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionStep {
    Unsubscribed,
    PendingFundingResolution,
    PendingPinVerification,
    Submitting,
    Subscribed,
}

impl std::fmt::Display for SubscriptionStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SubscriptionStep::Unsubscribed => "unsubscribed",
            SubscriptionStep::PendingFundingResolution => "resolving the funding account",
            SubscriptionStep::PendingPinVerification => "waiting for PIN",
            SubscriptionStep::Submitting => "submitting",
            SubscriptionStep::Subscribed => "subscribed",
        };
        f.write_str(name)
    }
}

/// Subscription flow state for one product of one goal.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionFlow {
    pub(super) goal_id: GoalId,
    pub(super) product_id: i64,
    pub(super) period_months: i32,
    pub(super) monthly_amount: i64,
    pub(super) step: SubscriptionStep,
    pub(super) funding_account: Option<FundingAccount>,
    pub(super) payment_day: Option<PaymentDay>,
    pub(super) last_error: Option<String>,
    pub(super) receipt: Option<SubscriptionReceipt>,
}

impl SubscriptionFlow {
    pub fn goal_id(&self) -> GoalId {
        self.goal_id
    }

    pub fn product_id(&self) -> i64 {
        self.product_id
    }

    pub fn period_months(&self) -> i32 {
        self.period_months
    }

    pub fn monthly_amount(&self) -> i64 {
        self.monthly_amount
    }

    pub fn step(&self) -> SubscriptionStep {
        self.step
    }

    pub fn funding_account(&self) -> Option<&FundingAccount> {
        self.funding_account.as_ref()
    }

    pub fn payment_day(&self) -> Option<PaymentDay> {
        self.payment_day
    }

    /// Message of the last failed attempt, shown on the PIN step.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn receipt(&self) -> Option<&SubscriptionReceipt> {
        self.receipt.as_ref()
    }

    /// Whether the user may still walk away without side effects.
    pub fn can_cancel(&self) -> bool {
        !matches!(
            self.step,
            SubscriptionStep::Submitting | SubscriptionStep::Subscribed
        )
    }
}
