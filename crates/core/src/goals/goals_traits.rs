use async_trait::async_trait;

use super::goals_model::{Goal, GoalId, NewGoal};
use crate::errors::Result;

/// Trait for the goal service.
#[async_trait]
pub trait GoalApiClient: Send + Sync {
    /// Persists a goal with its recommendation snapshot.
    async fn create_goal(&self, new_goal: NewGoal) -> Result<Goal>;

    /// Fetches one goal with its embedded products.
    async fn get_goal(&self, goal_id: GoalId) -> Result<Goal>;

    /// Lists the user's goals.
    async fn list_goals(&self) -> Result<Vec<Goal>>;

    /// Removes a goal wholesale.
    async fn delete_goal(&self, goal_id: GoalId) -> Result<()>;
}
