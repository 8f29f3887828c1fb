//! Product subscription (pay-in setup) module.

mod subscription_model;
mod subscription_orchestrator;
mod subscription_traits;

pub use subscription_model::{
    FundingAccount, PaymentDay, SubscriptionFlow, SubscriptionReceipt, SubscriptionRequest,
    SubscriptionStep,
};
pub use subscription_orchestrator::ProductSubscriptionOrchestrator;
pub use subscription_traits::{FundingAccountApiClient, PinApiClient, SubscriptionApiClient};
