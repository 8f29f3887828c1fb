//! Wizard-local state for planning a new goal.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Local;
use log::{debug, info};

use super::goals_committer::GoalCommitter;
use super::goals_model::{GoalDraft, GoalId};
use crate::errors::{Error, Result};
use crate::profile::{InvestmentProfile, InvestmentProfileGate};
use crate::recommendation::{RecommendationRequester, RecommendationSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    /// Collecting goal details; no recommendation yet.
    Drafting,
    /// A recommendation snapshot is held for the current draft.
    Recommended,
    /// The create-goal call is in flight.
    Committing,
    /// The goal exists; draft and snapshot have been discarded.
    Committed,
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WizardStep::Drafting => write!(f, "drafting"),
            WizardStep::Recommended => write!(f, "recommended"),
            WizardStep::Committing => write!(f, "committing"),
            WizardStep::Committed => write!(f, "committed"),
        }
    }
}

#[derive(Debug)]
struct WizardState {
    step: WizardStep,
    profile: Option<InvestmentProfile>,
    draft: Option<GoalDraft>,
    snapshot: Option<RecommendationSnapshot>,
    goal_id: Option<GoalId>,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            step: WizardStep::Drafting,
            profile: None,
            draft: None,
            snapshot: None,
            goal_id: None,
        }
    }
}

/// One run of the plan wizard: profile gate, recommendation, commit.
///
/// The lock is never held across a collaborator call. Steps that race each
/// other (a double-clicked commit) are resolved by the step recorded under the
/// lock, so at most one create-goal call is made per plan.
pub struct GoalWizard {
    profile_gate: InvestmentProfileGate,
    requester: RecommendationRequester,
    committer: GoalCommitter,
    state: Mutex<WizardState>,
}

impl GoalWizard {
    pub fn new(
        profile_gate: InvestmentProfileGate,
        requester: RecommendationRequester,
        committer: GoalCommitter,
    ) -> Self {
        Self {
            profile_gate,
            requester,
            committer,
            state: Mutex::new(WizardState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, WizardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn step(&self) -> WizardStep {
        self.state().step
    }

    pub fn draft(&self) -> Option<GoalDraft> {
        self.state().draft.clone()
    }

    pub fn snapshot(&self) -> Option<RecommendationSnapshot> {
        self.state().snapshot.clone()
    }

    pub fn committed_goal(&self) -> Option<GoalId> {
        self.state().goal_id
    }

    /// Runs the profile gate and remembers the profile for this session.
    pub async fn ensure_profile(&self) -> Result<InvestmentProfile> {
        let profile = self.profile_gate.ensure_profile().await?;
        self.state().profile = Some(profile.clone());
        Ok(profile)
    }

    /// Requests a recommendation for `draft` and holds it for commit.
    ///
    /// Runs the profile gate first when this session has no valid profile.
    /// On failure the wizard stays where it was.
    pub async fn request_recommendation(&self, draft: GoalDraft) -> Result<RecommendationSnapshot> {
        draft.validate()?;
        self.ensure_open("request a recommendation")?;

        let has_profile = self
            .state()
            .profile
            .as_ref()
            .is_some_and(|p| !p.is_expired(Local::now().naive_local()));
        if !has_profile {
            self.ensure_profile().await?;
        }

        let snapshot = self.requester.request_recommendation(&draft).await?;

        let mut state = self.state();
        match state.step {
            WizardStep::Drafting | WizardStep::Recommended => {
                state.draft = Some(draft);
                state.snapshot = Some(snapshot.clone());
                state.step = WizardStep::Recommended;
                Ok(snapshot)
            }
            // A commit started while the engine was answering.
            _ => Err(Self::closed_error(&state, "request a recommendation")),
        }
    }

    /// Creates the goal from the held draft and snapshot.
    ///
    /// On success the wizard state is cleared so the plan cannot be submitted
    /// again. On failure the snapshot is kept for a retry.
    pub async fn commit(&self) -> Result<GoalId> {
        let (draft, snapshot) = {
            let mut state = self.state();
            match (state.step, state.draft.clone(), state.snapshot.clone()) {
                (WizardStep::Recommended, Some(draft), Some(snapshot)) => {
                    state.step = WizardStep::Committing;
                    (draft, snapshot)
                }
                _ => return Err(Self::closed_error(&state, "create the goal")),
            }
        };

        debug!("[GoalWizard] Committing plan '{}'", draft.goal_title);
        let result = self.committer.commit(&draft, &snapshot).await;

        let mut state = self.state();
        match result {
            Ok(goal_id) => {
                state.step = WizardStep::Committed;
                state.draft = None;
                state.snapshot = None;
                state.goal_id = Some(goal_id);
                info!("[GoalWizard] Plan committed as goal {}", goal_id);
                Ok(goal_id)
            }
            Err(err) => {
                state.step = WizardStep::Recommended;
                Err(err)
            }
        }
    }

    /// Discards the draft and snapshot. Not allowed while committing.
    pub fn abandon(&self) -> Result<()> {
        let mut state = self.state();
        if state.step == WizardStep::Committing {
            return Err(Error::CommitInProgress);
        }
        let profile = state.profile.take();
        *state = WizardState {
            profile,
            ..WizardState::default()
        };
        Ok(())
    }

    fn ensure_open(&self, action: &str) -> Result<()> {
        let state = self.state();
        match state.step {
            WizardStep::Drafting | WizardStep::Recommended => Ok(()),
            _ => Err(Self::closed_error(&state, action)),
        }
    }

    fn closed_error(state: &WizardState, action: &str) -> Error {
        match (state.step, state.goal_id) {
            (WizardStep::Committing, _) => Error::CommitInProgress,
            (WizardStep::Committed, Some(goal_id)) => Error::AlreadyCommitted(goal_id),
            (step, _) => Error::invalid_transition(step, action),
        }
    }
}
