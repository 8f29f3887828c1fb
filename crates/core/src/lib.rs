//! Plan1Q Core - goal planning, goal detail aggregation and product
//! subscription for a couple's shared finances.
//!
//! This crate holds the client-side orchestration only. Every remote service
//! is reached through a collaborator trait (`*ApiClient`) implemented by the
//! `plan1q-connect` crate.

pub mod constants;
pub mod errors;
pub mod goals;
pub mod notice;
pub mod payments;
pub mod policy;
pub mod products;
pub mod profile;
pub mod recommendation;
pub mod subscription;

#[cfg(test)]
pub mod testing;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
pub use notice::{notice_for, Notice};
