//! Investment profile domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A time-limited investor risk classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentProfile {
    #[serde(default)]
    pub id: Option<i64>,
    pub risk_type: String,
    pub risk_level: i32,
    pub score: i32,
    pub expired_at: NaiveDateTime,
}

impl InvestmentProfile {
    /// A profile is invalid once `now` is past its expiry.
    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        now > self.expired_at
    }
}

/// One question of the risk questionnaire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileQuestion {
    pub question_id: i64,
    pub content: String,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOption {
    pub value: String,
    pub label: String,
}

/// The user's answer to one question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileAnswer {
    pub question_id: i64,
    pub answer: String,
}
