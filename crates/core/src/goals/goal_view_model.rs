//! The merged goal detail view.

use chrono::NaiveDate;
use serde::Serialize;

use super::goals_model::{Goal, GoalId};
use crate::payments::{PaymentProgress, PaymentRecord, PaymentStatus};
use crate::products::Product;

/// Why a product has no payment data attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum PaymentGap {
    /// The product has no settlement account yet.
    NoSettlementAccount,
    /// No fetched record pays into the product's account.
    NoMatchingRecord,
    /// More than one record pays into the account. Left unresolved.
    AmbiguousRecords(usize),
    /// The product's payment fetch failed.
    FetchFailed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PaymentInfo {
    Tracked {
        record: PaymentRecord,
        status: PaymentStatus,
        progress: PaymentProgress,
    },
    /// Rendered as "payment info unavailable", never as an error.
    Unavailable(PaymentGap),
}

impl PaymentInfo {
    pub fn record(&self) -> Option<&PaymentRecord> {
        match self {
            PaymentInfo::Tracked { record, .. } => Some(record),
            PaymentInfo::Unavailable(_) => None,
        }
    }

    pub fn is_tracked(&self) -> bool {
        matches!(self, PaymentInfo::Tracked { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub product: Product,
    pub payment: PaymentInfo,
}

/// Where a goal is in its subscription lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubscriptionProgress {
    NotStarted,
    Partial { subscribed: usize, total: usize },
    Complete,
}

/// A goal together with per-product payment data.
///
/// Views are immutable. A reload builds a fresh view that replaces the old one
/// wholesale.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalView {
    pub goal_id: GoalId,
    pub goal_name: String,
    pub detailed_goal: Option<String>,
    pub target_amount: i64,
    pub target_period: i32,
    pub monthly_amount: i64,
    pub status: String,
    pub maturity_date: Option<NaiveDate>,
    pub products: Vec<ProductView>,
    pub loaded_on: NaiveDate,
}

impl GoalView {
    pub(crate) fn from_goal(goal: Goal, products: Vec<ProductView>, loaded_on: NaiveDate) -> Self {
        Self {
            goal_id: goal.goal_id,
            goal_name: goal.goal_name,
            detailed_goal: goal.detailed_goal,
            target_amount: goal.target_amount,
            target_period: goal.target_period,
            monthly_amount: goal.monthly_amount,
            status: goal.status,
            maturity_date: goal.maturity_date,
            products,
            loaded_on,
        }
    }

    pub fn product(&self, product_id: i64) -> Option<&ProductView> {
        self.products
            .iter()
            .find(|view| view.product.product_id == product_id)
    }

    pub fn unsubscribed_products(&self) -> impl Iterator<Item = &Product> {
        self.products
            .iter()
            .map(|view| &view.product)
            .filter(|product| !product.subscribed)
    }

    pub fn subscription_progress(&self) -> SubscriptionProgress {
        let total = self.products.len();
        let subscribed = self
            .products
            .iter()
            .filter(|view| view.product.subscribed)
            .count();

        match subscribed {
            0 => SubscriptionProgress::NotStarted,
            n if n == total => SubscriptionProgress::Complete,
            n => SubscriptionProgress::Partial { subscribed: n, total },
        }
    }

    /// Sum of deposits across subscribed products.
    pub fn total_deposit(&self) -> i64 {
        self.subscribed_sum(|product| product.total_deposit)
    }

    pub fn total_profit(&self) -> i64 {
        self.subscribed_sum(|product| product.profit)
    }

    fn subscribed_sum(&self, field: impl Fn(&Product) -> Option<i64>) -> i64 {
        self.products
            .iter()
            .filter(|view| view.product.subscribed)
            .filter_map(|view| field(&view.product))
            .sum()
    }

    /// A copy of this view with one product marked subscribed.
    pub(crate) fn with_subscribed(&self, product_id: i64, account_number: Option<&str>) -> Self {
        let mut next = self.clone();
        if let Some(view) = next
            .products
            .iter_mut()
            .find(|view| view.product.product_id == product_id)
        {
            view.product.subscribed = true;
            if let Some(account) = account_number {
                view.product.account_number = Some(account.to_string());
            }
        }
        next
    }
}
