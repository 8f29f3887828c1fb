//! Recurring payment (auto-transfer) records and their display status.

pub mod payment_status;
mod payments_model;
mod payments_traits;

pub use payment_status::{compute_progress, compute_status};
pub use payments_model::{PaymentLabel, PaymentProgress, PaymentRecord, PaymentStatus};
pub use payments_traits::PaymentApiClient;
