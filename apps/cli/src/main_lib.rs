use std::sync::Arc;

use plan1q_connect::{ClientConfig, Plan1qApiClient};
use plan1q_core::goals::{GoalCommitter, GoalDetailAggregator, GoalViewStore, GoalWizard};
use plan1q_core::profile::InvestmentProfileGate;
use plan1q_core::recommendation::RecommendationRequester;
use plan1q_core::subscription::ProductSubscriptionOrchestrator;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::questionnaire::StdinQuestionnaire;

/// Everything a command needs, wired over one HTTP client.
pub struct Services {
    pub profile_gate: InvestmentProfileGate,
    pub wizard: GoalWizard,
    pub aggregator: Arc<GoalDetailAggregator>,
    pub orchestrator: ProductSubscriptionOrchestrator,
}

pub fn init_tracing() {
    let log_format = std::env::var("PLAN1Q_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // Output goes to stderr so command results on stdout stay clean.
    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

pub fn build_services(config: &ClientConfig) -> anyhow::Result<Services> {
    let client = Arc::new(Plan1qApiClient::new(config)?);
    let policy = config.call_policy();
    tracing::debug!(
        "Plan1Q API at {} (timeout {:?}, signed in: {})",
        client.base_url(),
        policy.timeout,
        config.access_token.is_some()
    );

    let make_gate = || {
        InvestmentProfileGate::new(client.clone(), Arc::new(StdinQuestionnaire), policy)
    };
    let aggregator = Arc::new(GoalDetailAggregator::new(
        client.clone(),
        client.clone(),
        Arc::new(GoalViewStore::new()),
        policy,
    ));

    Ok(Services {
        profile_gate: make_gate(),
        wizard: GoalWizard::new(
            make_gate(),
            RecommendationRequester::new(client.clone(), policy),
            GoalCommitter::new(client.clone(), policy),
        ),
        orchestrator: ProductSubscriptionOrchestrator::new(
            client.clone(),
            client.clone(),
            client,
            aggregator.clone(),
            policy,
        ),
        aggregator,
    })
}
