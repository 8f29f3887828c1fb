use async_trait::async_trait;

use super::payments_model::PaymentRecord;
use crate::errors::Result;

/// Trait for the payment-info (auto-transfer) service.
#[async_trait]
pub trait PaymentApiClient: Send + Sync {
    /// Lists the auto-transfers paying into `to_account_number`.
    async fn list_by_account(&self, to_account_number: &str) -> Result<Vec<PaymentRecord>>;
}
