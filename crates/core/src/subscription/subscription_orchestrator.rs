//! Drives the pay-in setup of one unsubscribed product.
//!
//! ```text
//! Unsubscribed -> PendingFundingResolution -> PendingPinVerification -> Submitting -> Subscribed
//!                                                     ^                      |
//!                                                     +---- PIN / call fails -+
//! ```

use std::sync::Arc;

use log::{debug, info, warn};

use super::subscription_model::{
    FundingAccount, PaymentDay, SubscriptionFlow, SubscriptionReceipt, SubscriptionRequest,
    SubscriptionStep,
};
use super::subscription_traits::{FundingAccountApiClient, PinApiClient, SubscriptionApiClient};
use crate::constants::PIN_LENGTH;
use crate::errors::{Error, Result, ValidationError};
use crate::goals::{GoalDetailAggregator, GoalView};
use crate::notice::GENERIC_FAILURE_MESSAGE;
use crate::policy::CallPolicy;

/// Orchestrates product subscriptions.
///
/// Each [`SubscriptionFlow`] is owned by the caller and borrowed mutably for
/// every step, so one product's steps never overlap while flows for different
/// products run independently.
pub struct ProductSubscriptionOrchestrator {
    funding: Arc<dyn FundingAccountApiClient>,
    pins: Arc<dyn PinApiClient>,
    subscriptions: Arc<dyn SubscriptionApiClient>,
    aggregator: Arc<GoalDetailAggregator>,
    policy: CallPolicy,
}

impl ProductSubscriptionOrchestrator {
    pub fn new(
        funding: Arc<dyn FundingAccountApiClient>,
        pins: Arc<dyn PinApiClient>,
        subscriptions: Arc<dyn SubscriptionApiClient>,
        aggregator: Arc<GoalDetailAggregator>,
        policy: CallPolicy,
    ) -> Self {
        Self {
            funding,
            pins,
            subscriptions,
            aggregator,
            policy,
        }
    }

    /// Opens a flow for an unsubscribed product of `goal`.
    pub fn start(&self, goal: &GoalView, product_id: i64) -> Result<SubscriptionFlow> {
        let product = goal
            .product(product_id)
            .map(|view| &view.product)
            .ok_or(Error::ProductNotFound(product_id))?;

        if product.subscribed {
            return Err(Error::invalid_transition(
                SubscriptionStep::Subscribed,
                "start a subscription",
            ));
        }

        Ok(SubscriptionFlow {
            goal_id: goal.goal_id,
            product_id,
            period_months: goal.target_period,
            monthly_amount: product.monthly_amount,
            step: SubscriptionStep::Unsubscribed,
            funding_account: None,
            payment_day: None,
            last_error: None,
            receipt: None,
        })
    }

    /// Looks up the shared account that will fund the product.
    ///
    /// The flow stays in `PendingFundingResolution` until an account is found;
    /// the lookup may be retried from there.
    pub async fn resolve_funding(&self, flow: &mut SubscriptionFlow) -> Result<FundingAccount> {
        match flow.step {
            SubscriptionStep::Unsubscribed | SubscriptionStep::PendingFundingResolution => {}
            step => return Err(Error::invalid_transition(step, "resolve the funding account")),
        }
        flow.step = SubscriptionStep::PendingFundingResolution;
        flow.funding_account = None;

        let account = self
            .policy
            .run("get shared account", self.funding.get_shared_account())
            .await;

        match account {
            Ok(Some(account)) if !account.account_number.trim().is_empty() => {
                debug!(
                    "[Subscription] Product {} funded from {} {}",
                    flow.product_id, account.bank_name, account.account_number
                );
                flow.funding_account = Some(account.clone());
                flow.last_error = None;
                Ok(account)
            }
            Ok(_) => {
                flow.last_error = Error::FundingAccountUnavailable.notice().map(|n| n.message);
                Err(Error::FundingAccountUnavailable)
            }
            Err(err) => {
                warn!("[Subscription] Funding account lookup failed: {}", err);
                flow.last_error = Some(failure_message(&err));
                Err(err)
            }
        }
    }

    /// Records the payment day and moves the flow to PIN entry.
    ///
    /// Requires a resolved funding account. May be called again on the PIN
    /// step to change the day.
    pub fn choose_payment_day(&self, flow: &mut SubscriptionFlow, day: PaymentDay) -> Result<()> {
        match flow.step {
            SubscriptionStep::PendingFundingResolution | SubscriptionStep::PendingPinVerification
                if flow.funding_account.is_some() =>
            {
                flow.payment_day = Some(day);
                flow.step = SubscriptionStep::PendingPinVerification;
                Ok(())
            }
            SubscriptionStep::PendingFundingResolution => Err(Error::FundingAccountUnavailable),
            step => Err(Error::invalid_transition(step, "choose a payment date")),
        }
    }

    /// Verifies the PIN, then subscribes the product.
    ///
    /// The subscription service is only called after the PIN service answered
    /// `valid`. Any failure returns the flow to the PIN step with its message
    /// recorded. On success, if the goal is still on screen, its view marks the
    /// product subscribed and the goal is reloaded so payment tracking appears.
    pub async fn submit(&self, flow: &mut SubscriptionFlow, pin: &str) -> Result<SubscriptionReceipt> {
        if flow.step != SubscriptionStep::PendingPinVerification {
            return Err(Error::invalid_transition(flow.step, "submit the subscription"));
        }
        let (Some(funding), Some(payment_day)) = (flow.funding_account.clone(), flow.payment_day) else {
            return Err(Error::invalid_transition(flow.step, "submit the subscription"));
        };
        validate_pin(pin)?;

        flow.step = SubscriptionStep::Submitting;
        flow.last_error = None;

        let verified = self.policy.run("verify PIN", self.pins.verify_pin(pin)).await;
        match verified {
            Ok(true) => {}
            Ok(false) => return Err(back_to_pin(flow, Error::PinRejected)),
            Err(err) => return Err(back_to_pin(flow, err)),
        }

        let request = SubscriptionRequest {
            product_id: flow.product_id,
            period_months: flow.period_months,
            monthly_amount: flow.monthly_amount,
            source_account_number: funding.account_number,
            payment_date: payment_day,
        };
        let receipt = match self
            .policy
            .run("subscribe product", self.subscriptions.subscribe(request))
            .await
        {
            Ok(receipt) => receipt,
            Err(err) => return Err(back_to_pin(flow, err)),
        };

        flow.step = SubscriptionStep::Subscribed;
        flow.receipt = Some(receipt.clone());
        info!(
            "[Subscription] Product {} of goal {} subscribed ({}), paying {}",
            flow.product_id, flow.goal_id, receipt.subscription_id, payment_day
        );

        let store = self.aggregator.store();
        if !store.shows(flow.goal_id) {
            debug!(
                "[Subscription] Goal {} no longer shown, skipping reload",
                flow.goal_id
            );
            return Ok(receipt);
        }
        store.mark_subscribed(
            flow.goal_id,
            flow.product_id,
            Some(receipt.account_number.as_str()),
        );
        if let Err(err) = self.aggregator.load_goal(flow.goal_id).await {
            warn!(
                "[Subscription] Reload of goal {} after subscribing failed: {}",
                flow.goal_id, err
            );
        }

        Ok(receipt)
    }

    /// Abandons a flow. Allowed at any point before submission starts.
    pub fn cancel(&self, flow: SubscriptionFlow) -> Result<()> {
        if !flow.can_cancel() {
            return Err(Error::invalid_transition(flow.step, "cancel"));
        }
        debug!(
            "[Subscription] Cancelled flow for product {} at '{}'",
            flow.product_id, flow.step
        );
        Ok(())
    }
}

fn validate_pin(pin: &str) -> Result<()> {
    if pin.len() == PIN_LENGTH && pin.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::MalformedPin.into())
    }
}

fn back_to_pin(flow: &mut SubscriptionFlow, err: Error) -> Error {
    warn!(
        "[Subscription] Product {} attempt failed: {}",
        flow.product_id, err
    );
    flow.step = SubscriptionStep::PendingPinVerification;
    flow.last_error = Some(failure_message(&err));
    err
}

fn failure_message(err: &Error) -> String {
    err.notice()
        .map(|notice| notice.message)
        .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string())
}
