//! The uniform response envelope wrapped around every Plan1Q API response.

use plan1q_core::errors::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;

#[derive(Debug)]
pub(crate) struct ApiEnvelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub error: Option<ApiErrorBody>,
}

/// Wire shape of the envelope. `data` stays untyped until `success` is known,
/// since failure envelopes may carry a payload of any shape.
#[derive(Debug, Deserialize)]
struct RawEnvelope {
    success: bool,
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Payload of a successful envelope, which may legitimately be absent.
    pub fn into_optional(self) -> Result<Option<T>> {
        if self.success {
            return Ok(self.data);
        }

        let (code, error_message) = match self.error {
            Some(body) => (body.code, body.message),
            None => (None, None),
        };
        let message = error_message
            .filter(|m| !m.trim().is_empty())
            .or(self.message)
            .unwrap_or_default();
        Err(Error::BusinessRejection { code, message })
    }

    /// Payload of a successful envelope that must carry data.
    pub fn into_data(self) -> Result<T> {
        self.into_optional()?
            .ok_or_else(|| Error::InvalidResponse("response envelope has no data".to_string()))
    }
}

/// Decodes a response body into an envelope.
///
/// The payload is only typed when `success` is true; a failure envelope keeps
/// its message whatever its `data` holds.
pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<ApiEnvelope<T>> {
    let raw: RawEnvelope = serde_json::from_str(body).map_err(|e| invalid_body(e, body))?;

    let data = match raw.data {
        Some(value) if raw.success && !value.is_null() => {
            Some(serde_json::from_value(value).map_err(|e| invalid_body(e, body))?)
        }
        _ => None,
    };

    Ok(ApiEnvelope {
        success: raw.success,
        data,
        message: raw.message,
        error: raw.error,
    })
}

fn invalid_body(err: serde_json::Error, body: &str) -> Error {
    Error::InvalidResponse(format!(
        "{} - {}",
        err,
        body.chars().take(200).collect::<String>()
    ))
}
