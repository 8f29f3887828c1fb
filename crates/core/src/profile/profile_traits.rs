//! Collaborator contracts used by the profile gate.

use async_trait::async_trait;

use super::profile_model::{InvestmentProfile, ProfileAnswer, ProfileQuestion};
use crate::errors::Result;

/// Trait for the investment profile service.
#[async_trait]
pub trait ProfileApiClient: Send + Sync {
    /// Fetch the user's current profile, `None` when none was ever issued.
    async fn get_profile(&self) -> Result<Option<InvestmentProfile>>;

    /// Fetch the questionnaire.
    async fn list_questions(&self) -> Result<Vec<ProfileQuestion>>;

    /// Submit a complete answer set and receive a freshly issued profile.
    async fn submit_answers(&self, answers: Vec<ProfileAnswer>) -> Result<InvestmentProfile>;
}

/// The UI side of the questionnaire.
///
/// Implementations present the questions and return one answer per question.
#[async_trait]
pub trait QuestionnaireResponder: Send + Sync {
    async fn answer(&self, questions: &[ProfileQuestion]) -> Result<Vec<ProfileAnswer>>;
}
