//! Replace-on-update holder for the goal detail view on screen.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use log::debug;

use super::goal_view_model::GoalView;
use super::goals_model::GoalId;

/// Marks one load attempt. Only the most recent ticket may publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Holds the goal view currently shown.
///
/// The view is only ever replaced wholesale, so readers always see a complete
/// view. Every load takes a ticket; starting a newer load or leaving the
/// screen invalidates older tickets, and their results are dropped when they
/// arrive.
#[derive(Debug, Default)]
pub struct GoalViewStore {
    current: RwLock<Option<Arc<GoalView>>>,
    generation: AtomicU64,
}

impl GoalViewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Arc<GoalView>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether the view on screen is the one for `goal_id`.
    pub fn shows(&self, goal_id: GoalId) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|view| view.goal_id == goal_id)
    }

    /// Starts a load, invalidating any load still in flight.
    pub fn begin_load(&self) -> LoadTicket {
        LoadTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Replaces the view if `ticket` is still current. Returns whether the
    /// view was published.
    pub fn publish(&self, ticket: LoadTicket, view: Arc<GoalView>) -> bool {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if !self.is_current(ticket) {
            debug!(
                "[GoalViewStore] Discarding stale view of goal {}",
                view.goal_id
            );
            return false;
        }
        *current = Some(view);
        true
    }

    /// The user navigated away: drop the view and anything still loading.
    pub fn leave(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Marks a product subscribed in the shown view, if that goal is shown.
    pub fn mark_subscribed(&self, goal_id: GoalId, product_id: i64, account_number: Option<&str>) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(view) = current.as_ref().filter(|view| view.goal_id == goal_id) {
            let next = view.with_subscribed(product_id, account_number);
            *current = Some(Arc::new(next));
        }
    }

    /// Clears the view if it shows `goal_id`.
    pub fn forget(&self, goal_id: GoalId) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if current.as_ref().is_some_and(|view| view.goal_id == goal_id) {
            self.generation.fetch_add(1, Ordering::SeqCst);
            *current = None;
        }
    }
}
