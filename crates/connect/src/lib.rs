//! Plan1Q Connect - HTTP access to the Plan1Q backend services.
//!
//! This crate implements the collaborator traits of `plan1q-core` over the
//! Plan1Q REST API and its uniform response envelope.

mod client;
mod config;
mod envelope;

pub use client::Plan1qApiClient;
pub use config::{ClientConfig, DEFAULT_API_URL};
