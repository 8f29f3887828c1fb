//! Caller-imposed limits on collaborator calls.

use std::future::Future;
use std::time::Duration;

use log::debug;

use crate::constants::DEFAULT_CALL_TIMEOUT_SECS;
use crate::errors::{Error, Result};

/// Limits applied by the core to every collaborator call it makes.
///
/// There is no retry setting: a timed-out call fails like any other network
/// failure and the user retries by acting again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallPolicy {
    pub timeout: Duration,
}

impl Default for CallPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_CALL_TIMEOUT_SECS),
        }
    }
}

impl CallPolicy {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Runs `call` under the configured timeout.
    pub async fn run<T, F>(&self, operation: &str, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                debug!("{} timed out after {:?}", operation, self.timeout);
                Err(Error::Timeout {
                    operation: operation.to_string(),
                })
            }
        }
    }
}
