use std::sync::Arc;

use log::info;

use super::goals_model::{GoalDraft, GoalId, NewGoal};
use super::goals_traits::GoalApiClient;
use crate::errors::Result;
use crate::policy::CallPolicy;
use crate::recommendation::RecommendationSnapshot;

/// Materializes a goal from a draft and its recommendation snapshot.
///
/// The committer itself is stateless. [`GoalWizard`](super::GoalWizard) owns
/// the guarantee that a given plan is committed at most once.
pub struct GoalCommitter {
    client: Arc<dyn GoalApiClient>,
    policy: CallPolicy,
}

impl GoalCommitter {
    pub fn new(client: Arc<dyn GoalApiClient>, policy: CallPolicy) -> Self {
        Self { client, policy }
    }

    /// Sends the draft and snapshot as one create request and returns the new
    /// goal's id.
    pub async fn commit(&self, draft: &GoalDraft, snapshot: &RecommendationSnapshot) -> Result<GoalId> {
        draft.validate()?;
        snapshot.validate()?;

        let goal = self
            .policy
            .run("create goal", self.client.create_goal(NewGoal::from_plan(draft, snapshot)))
            .await?;

        info!(
            "[GoalCommitter] Created goal {} '{}' with {} products",
            goal.goal_id,
            goal.goal_name,
            goal.products.len()
        );
        Ok(goal.goal_id)
    }
}
