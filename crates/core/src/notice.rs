//! User-facing notices derived from core results.
//!
//! The core never displays anything. Each step returns a plain `Result`, and
//! the UI layer turns the error side into a [`Notice`] when the error kind is
//! one that must be surfaced.

use serde::Serialize;

use crate::errors::{Error, ErrorKind};

/// Shown when a collaborator failed without a usable message.
pub const GENERIC_FAILURE_MESSAGE: &str = "요청을 처리하지 못했습니다. 잠시 후 다시 시도해주세요.";

/// A transient notification for the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub kind: ErrorKind,
    pub message: String,
}

impl Error {
    /// Builds the notice for this error, or `None` when it is handled locally.
    pub fn notice(&self) -> Option<Notice> {
        let kind = self.kind();
        if !kind.is_surfaced() {
            return None;
        }

        let message = match self {
            Error::PinRejected => "비밀번호가 일치하지 않습니다.".to_string(),
            Error::FundingAccountUnavailable => "연결된 공동 계좌를 찾을 수 없습니다.".to_string(),
            other => other
                .collaborator_message()
                .map(str::to_string)
                .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
        };

        Some(Notice { kind, message })
    }
}

/// Converts a step result into its notice, if any.
pub fn notice_for<T>(result: &crate::errors::Result<T>) -> Option<Notice> {
    result.as_ref().err().and_then(Error::notice)
}
