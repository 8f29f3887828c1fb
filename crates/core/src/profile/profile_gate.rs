use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use log::{debug, info, warn};

use super::profile_model::{InvestmentProfile, ProfileAnswer, ProfileQuestion};
use super::profile_traits::{ProfileApiClient, QuestionnaireResponder};
use crate::errors::{Error, ErrorKind, Result, ValidationError};
use crate::policy::CallPolicy;

/// Makes sure a valid, non-expired risk profile exists before recommendations
/// are requested.
pub struct InvestmentProfileGate {
    client: Arc<dyn ProfileApiClient>,
    responder: Arc<dyn QuestionnaireResponder>,
    policy: CallPolicy,
}

impl InvestmentProfileGate {
    pub fn new(
        client: Arc<dyn ProfileApiClient>,
        responder: Arc<dyn QuestionnaireResponder>,
        policy: CallPolicy,
    ) -> Self {
        Self {
            client,
            responder,
            policy,
        }
    }

    /// Returns the current profile, running the questionnaire when it is
    /// missing or expired.
    pub async fn ensure_profile(&self) -> Result<InvestmentProfile> {
        self.ensure_profile_at(Local::now().naive_local()).await
    }

    /// Same as [`ensure_profile`](Self::ensure_profile) with an explicit clock.
    pub async fn ensure_profile_at(&self, now: NaiveDateTime) -> Result<InvestmentProfile> {
        match self.fetch_current().await? {
            Some(profile) if !profile.is_expired(now) => {
                debug!(
                    "[ProfileGate] Using profile {} (level {}, expires {})",
                    profile.risk_type, profile.risk_level, profile.expired_at
                );
                return Ok(profile);
            }
            Some(profile) => {
                info!(
                    "[ProfileGate] Profile expired at {}, running questionnaire",
                    profile.expired_at
                );
            }
            None => info!("[ProfileGate] No profile on record, running questionnaire"),
        }

        let questions = self
            .policy
            .run("list profile questions", self.client.list_questions())
            .await
            .map_err(unavailable)?;
        if questions.is_empty() {
            return Err(Error::ProfileUnavailable(
                "questionnaire has no questions".to_string(),
            ));
        }

        let answers = self.responder.answer(&questions).await?;
        check_answers(&questions, &answers)?;

        let profile = self
            .policy
            .run("submit profile answers", self.client.submit_answers(answers))
            .await
            .map_err(unavailable)?;

        if profile.is_expired(now) {
            return Err(Error::ProfileUnavailable(format!(
                "issued profile already expired at {}",
                profile.expired_at
            )));
        }

        info!(
            "[ProfileGate] Issued profile {} (level {}, score {})",
            profile.risk_type, profile.risk_level, profile.score
        );
        Ok(profile)
    }

    async fn fetch_current(&self) -> Result<Option<InvestmentProfile>> {
        match self
            .policy
            .run("get investment profile", self.client.get_profile())
            .await
        {
            Ok(profile) => Ok(profile),
            // The profile service answers "no profile" with a rejection envelope.
            Err(err) if err.kind() == ErrorKind::BusinessRejection => {
                warn!("[ProfileGate] Treating rejected profile lookup as absent: {}", err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

/// Every question must be answered exactly once and nothing else.
fn check_answers(questions: &[ProfileQuestion], answers: &[ProfileAnswer]) -> Result<()> {
    let expected: HashSet<i64> = questions.iter().map(|q| q.question_id).collect();
    let mut seen = HashSet::new();

    for answer in answers {
        if !expected.contains(&answer.question_id) {
            return Err(ValidationError::InvalidInput(format!(
                "answer for unknown question {}",
                answer.question_id
            ))
            .into());
        }
        if answer.answer.trim().is_empty() || !seen.insert(answer.question_id) {
            return Err(ValidationError::InvalidInput(format!(
                "question {} needs exactly one answer",
                answer.question_id
            ))
            .into());
        }
    }

    if let Some(missing) = questions.iter().find(|q| !seen.contains(&q.question_id)) {
        return Err(ValidationError::MissingField(format!("question {}", missing.question_id)).into());
    }
    Ok(())
}

fn unavailable(err: Error) -> Error {
    match err {
        Error::ProfileUnavailable(_) => err,
        other => Error::ProfileUnavailable(
            other
                .collaborator_message()
                .map(str::to_string)
                .unwrap_or_else(|| other.to_string()),
        ),
    }
}
