//! Collaborator contracts used during subscription.

use async_trait::async_trait;

use super::subscription_model::{FundingAccount, SubscriptionReceipt, SubscriptionRequest};
use crate::errors::Result;

/// Trait for looking up the couple's shared settlement account.
#[async_trait]
pub trait FundingAccountApiClient: Send + Sync {
    /// `None` when the couple has no shared account.
    async fn get_shared_account(&self) -> Result<Option<FundingAccount>>;
}

/// Trait for the PIN service.
#[async_trait]
pub trait PinApiClient: Send + Sync {
    async fn verify_pin(&self, pin_number: &str) -> Result<bool>;
}

/// Trait for the subscription service.
#[async_trait]
pub trait SubscriptionApiClient: Send + Sync {
    async fn subscribe(&self, request: SubscriptionRequest) -> Result<SubscriptionReceipt>;
}
