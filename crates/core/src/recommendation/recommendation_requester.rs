use std::sync::Arc;

use log::{debug, info};

use super::recommendation_model::RecommendationSnapshot;
use super::recommendation_traits::RecommendationApiClient;
use crate::errors::Result;
use crate::goals::GoalDraft;
use crate::policy::CallPolicy;

/// Requests a portfolio recommendation for a goal draft.
///
/// Makes exactly one call per request and never retries. Calling again with
/// the same draft asks the engine again; nothing is cached here.
pub struct RecommendationRequester {
    client: Arc<dyn RecommendationApiClient>,
    policy: CallPolicy,
}

impl RecommendationRequester {
    pub fn new(client: Arc<dyn RecommendationApiClient>, policy: CallPolicy) -> Self {
        Self { client, policy }
    }

    /// Validates the draft locally, then asks the engine.
    ///
    /// A snapshot that is empty or whose ratios do not add up to 100 is
    /// reported as a failure rather than returned.
    pub async fn request_recommendation(&self, draft: &GoalDraft) -> Result<RecommendationSnapshot> {
        draft.validate()?;

        debug!(
            "[Recommendation] Requesting plan for '{}' ({} KRW / {} months)",
            draft.goal_title, draft.target_amount, draft.target_period
        );
        let snapshot = self
            .policy
            .run("recommend portfolio", self.client.recommend(draft))
            .await?;
        snapshot.validate()?;

        info!(
            "[Recommendation] Received {} products, monthly {} KRW, probability {}%",
            snapshot.recommended_products.len(),
            snapshot.monthly_amount,
            snapshot.achievement_probability
        );
        Ok(snapshot)
    }
}
