//! Goals module - models, collaborator traits, the plan wizard and the goal
//! detail view.

mod goal_detail_aggregator;
mod goal_view_model;
mod goal_view_store;
mod goal_wizard;
mod goals_committer;
mod goals_model;
mod goals_traits;

pub use goal_detail_aggregator::GoalDetailAggregator;
pub use goal_view_model::{GoalView, PaymentGap, PaymentInfo, ProductView, SubscriptionProgress};
pub use goal_view_store::{GoalViewStore, LoadTicket};
pub use goal_wizard::{GoalWizard, WizardStep};
pub use goals_committer::GoalCommitter;
pub use goals_model::{Goal, GoalDraft, GoalId, NewGoal};
pub use goals_traits::GoalApiClient;
