use async_trait::async_trait;

use super::recommendation_model::RecommendationSnapshot;
use crate::errors::Result;
use crate::goals::GoalDraft;

/// Trait for the recommendation engine. Treated as an opaque, possibly
/// non-deterministic scoring function.
#[async_trait]
pub trait RecommendationApiClient: Send + Sync {
    async fn recommend(&self, draft: &GoalDraft) -> Result<RecommendationSnapshot>;
}
