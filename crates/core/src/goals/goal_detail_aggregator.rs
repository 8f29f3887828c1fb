//! Builds the goal detail view from the goal and per-product payment records.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use futures::future::join_all;
use log::{debug, info, warn};

use super::goal_view_model::{GoalView, PaymentGap, PaymentInfo, ProductView};
use super::goal_view_store::GoalViewStore;
use super::goals_model::{Goal, GoalId};
use super::goals_traits::GoalApiClient;
use crate::errors::Result;
use crate::payments::{compute_progress, compute_status, PaymentApiClient, PaymentRecord};
use crate::policy::CallPolicy;
use crate::products::Product;

/// Outcome of one product's payment fetch.
type PaymentFetch = Option<Result<Vec<PaymentRecord>>>;

/// Loads a goal and merges each subscribed product's payment record into it.
pub struct GoalDetailAggregator {
    goals: Arc<dyn GoalApiClient>,
    payments: Arc<dyn PaymentApiClient>,
    store: Arc<GoalViewStore>,
    policy: CallPolicy,
}

impl GoalDetailAggregator {
    pub fn new(
        goals: Arc<dyn GoalApiClient>,
        payments: Arc<dyn PaymentApiClient>,
        store: Arc<GoalViewStore>,
        policy: CallPolicy,
    ) -> Self {
        Self {
            goals,
            payments,
            store,
            policy,
        }
    }

    pub fn store(&self) -> &Arc<GoalViewStore> {
        &self.store
    }

    pub async fn load_goal(&self, goal_id: GoalId) -> Result<Arc<GoalView>> {
        self.load_goal_on(goal_id, Local::now().date_naive()).await
    }

    /// Fetches the goal, then every product's payment records concurrently,
    /// and publishes the merged view.
    ///
    /// Only the goal fetch can fail the load. A failed payment fetch leaves
    /// that product without payment data. The returned view always reflects
    /// this call; the store only takes it if no newer load started and the
    /// screen was not left in the meantime.
    pub async fn load_goal_on(&self, goal_id: GoalId, today: NaiveDate) -> Result<Arc<GoalView>> {
        let ticket = self.store.begin_load();

        let mut goal = self
            .policy
            .run("get goal detail", self.goals.get_goal(goal_id))
            .await?;
        debug!(
            "[GoalDetail] Loaded goal {} with {} products",
            goal.goal_id,
            goal.products.len()
        );

        let fetches = join_all(goal.products.iter().map(|product| self.fetch_payments(product))).await;

        let products = std::mem::take(&mut goal.products);
        let views = merge_payment_records(products, fetches, goal.target_period, today);
        let tracked = views.iter().filter(|v| v.payment.is_tracked()).count();
        let view = Arc::new(GoalView::from_goal(goal, views, today));

        if self.store.publish(ticket, view.clone()) {
            info!(
                "[GoalDetail] Goal {} ready: {} products, {} with payment tracking",
                view.goal_id,
                view.products.len(),
                tracked
            );
        }
        Ok(view)
    }

    /// Deletes a goal and clears it from the store if shown.
    pub async fn delete_goal(&self, goal_id: GoalId) -> Result<()> {
        self.policy
            .run("delete goal", self.goals.delete_goal(goal_id))
            .await?;
        self.store.forget(goal_id);
        info!("[GoalDetail] Deleted goal {}", goal_id);
        Ok(())
    }

    pub async fn list_goals(&self) -> Result<Vec<Goal>> {
        self.policy.run("list goals", self.goals.list_goals()).await
    }

    async fn fetch_payments(&self, product: &Product) -> PaymentFetch {
        let account = product.settlement_account()?;
        let result = self
            .policy
            .run("get payment info", self.payments.list_by_account(account))
            .await;

        if let Err(err) = &result {
            warn!(
                "[GoalDetail] Payment info for product {} (account {}) unavailable: {}",
                product.product_id, account, err
            );
        }
        Some(result)
    }
}

/// Attaches a record to a product iff exactly one fetched record pays into the
/// product's settlement account.
///
/// Records from every successful fetch are pooled before matching, so a
/// product sharing its account with another product sees duplicate matches
/// and is left without a record.
fn merge_payment_records(
    products: Vec<Product>,
    fetches: Vec<PaymentFetch>,
    total_installments: i32,
    today: NaiveDate,
) -> Vec<ProductView> {
    let pool: Vec<&PaymentRecord> = fetches
        .iter()
        .filter_map(|fetch| match fetch {
            Some(Ok(records)) => Some(records.iter()),
            _ => None,
        })
        .flatten()
        .collect();

    products
        .into_iter()
        .zip(fetches.iter())
        .map(|(product, fetch)| {
            let payment = match product.settlement_account() {
                None => PaymentInfo::Unavailable(PaymentGap::NoSettlementAccount),
                Some(account) => {
                    let matches: Vec<&PaymentRecord> = pool
                        .iter()
                        .copied()
                        .filter(|record| record.to_account_number.trim() == account)
                        .collect();

                    match (matches.as_slice(), fetch) {
                        ([record], _) => PaymentInfo::Tracked {
                            status: compute_status(record, today),
                            progress: compute_progress(
                                record,
                                product.monthly_amount,
                                total_installments,
                            ),
                            record: (*record).clone(),
                        },
                        ([], Some(Err(err))) => {
                            PaymentInfo::Unavailable(PaymentGap::FetchFailed(err.to_string()))
                        }
                        ([], _) => PaymentInfo::Unavailable(PaymentGap::NoMatchingRecord),
                        (many, _) => {
                            warn!(
                                "[GoalDetail] {} payment records target account {}, leaving product {} untracked",
                                many.len(),
                                account,
                                product.product_id
                            );
                            PaymentInfo::Unavailable(PaymentGap::AmbiguousRecords(many.len()))
                        }
                    }
                }
            };
            ProductView { product, payment }
        })
        .collect()
}
