//! HTTP client for the Plan1Q backend.
//!
//! One client implements every collaborator trait of `plan1q-core`. All
//! endpoints answer with the uniform envelope of [`crate::envelope`]; a
//! `success: false` envelope becomes [`Error::BusinessRejection`] whatever the
//! HTTP status.

use async_trait::async_trait;
use log::{debug, info};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::envelope::{decode, ApiEnvelope};
use plan1q_core::errors::{Error, Result, ValidationError};
use plan1q_core::goals::{Goal, GoalApiClient, GoalDraft, GoalId, NewGoal};
use plan1q_core::payments::{PaymentApiClient, PaymentRecord};
use plan1q_core::profile::{InvestmentProfile, ProfileAnswer, ProfileApiClient, ProfileQuestion};
use plan1q_core::recommendation::{RecommendationApiClient, RecommendationSnapshot};
use plan1q_core::subscription::{
    FundingAccount, FundingAccountApiClient, PinApiClient, SubscriptionApiClient,
    SubscriptionReceipt, SubscriptionRequest,
};

// ─────────────────────────────────────────────────────────────────────────────
// Request / Response Bodies (internal)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct SubmitAnswersBody<'a> {
    answers: &'a [ProfileAnswer],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyPinBody<'a> {
    pin_number: &'a str,
}

#[derive(Debug, Deserialize)]
struct VerifyPinResult {
    valid: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Plan1Q API Client
// ─────────────────────────────────────────────────────────────────────────────

/// HTTP client for the Plan1Q API gateway.
///
/// # Example
///
/// ```ignore
/// let client = Plan1qApiClient::new(&ClientConfig::from_env())?;
/// let goals = client.list_goals().await?;
/// ```
#[derive(Debug, Clone)]
pub struct Plan1qApiClient {
    client: reqwest::Client,
    base_url: String,
    auth_header: Option<HeaderValue>,
}

impl Plan1qApiClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the access token cannot be used as a header value
    /// or the HTTP client cannot be initialized.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let auth_header = config
            .access_token
            .as_deref()
            .map(|token| {
                HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
                    ValidationError::InvalidInput(format!("Invalid access token format: {}", e))
                })
            })
            .transpose()?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::Network(format!("Failed to initialize HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            auth_header,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create default headers for API requests.
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(auth) = &self.auth_header {
            headers.insert(AUTHORIZATION, auth.clone());
        }
        headers
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<ApiEnvelope<T>> {
        let url = self.url(path);
        debug!("[Plan1qApi] GET {}", url);

        let response = self
            .client
            .get(&url)
            .headers(self.headers())
            .send()
            .await
            .map_err(|e| transport_error(e, path))?;

        self.parse_response(response, path).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiEnvelope<T>> {
        let url = self.url(path);
        debug!("[Plan1qApi] POST {}", url);

        let response = self
            .client
            .post(&url)
            .headers(self.headers())
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(e, path))?;

        self.parse_response(response, path).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<ApiEnvelope<T>> {
        let url = self.url(path);
        debug!("[Plan1qApi] DELETE {}", url);

        let response = self
            .client
            .delete(&url)
            .headers(self.headers())
            .send()
            .await
            .map_err(|e| transport_error(e, path))?;

        self.parse_response(response, path).await
    }

    /// Parse an HTTP response into its envelope.
    ///
    /// Error statuses still carry an envelope in the normal case; only a body
    /// that is not an envelope is treated as a transport failure.
    async fn parse_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        path: &str,
    ) -> Result<ApiEnvelope<T>> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(e, path))?;

        match decode::<T>(&body) {
            Ok(envelope) => {
                if !envelope.success {
                    debug!("[Plan1qApi] {} rejected with HTTP {}", path, status);
                }
                Ok(envelope)
            }
            Err(_) if !status.is_success() => Err(Error::Network(format!(
                "HTTP {} from {}: {}",
                status,
                path,
                body.chars().take(200).collect::<String>()
            ))),
            Err(err) => Err(err),
        }
    }
}

fn transport_error(err: reqwest::Error, path: &str) -> Error {
    if err.is_timeout() {
        Error::Timeout {
            operation: path.to_string(),
        }
    } else {
        Error::Network(err.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Collaborator Trait Implementations
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl ProfileApiClient for Plan1qApiClient {
    async fn get_profile(&self) -> Result<Option<InvestmentProfile>> {
        self.get("/api/investment-profiles/me")
            .await?
            .into_optional()
    }

    async fn list_questions(&self) -> Result<Vec<ProfileQuestion>> {
        self.get("/api/investment-profiles/questions")
            .await?
            .into_data()
    }

    async fn submit_answers(&self, answers: Vec<ProfileAnswer>) -> Result<InvestmentProfile> {
        let profile: InvestmentProfile = self
            .post(
                "/api/investment-profiles/submit",
                &SubmitAnswersBody { answers: &answers },
            )
            .await?
            .into_data()?;
        info!(
            "[Plan1qApi] Investment profile issued: {} (level {})",
            profile.risk_type, profile.risk_level
        );
        Ok(profile)
    }
}

#[async_trait]
impl RecommendationApiClient for Plan1qApiClient {
    async fn recommend(&self, draft: &GoalDraft) -> Result<RecommendationSnapshot> {
        self.post("/api/ai/recommendations", draft)
            .await?
            .into_data()
    }
}

#[async_trait]
impl GoalApiClient for Plan1qApiClient {
    async fn create_goal(&self, new_goal: NewGoal) -> Result<Goal> {
        let goal: Goal = self.post("/api/goals", &new_goal).await?.into_data()?;
        info!("[Plan1qApi] Created goal {}", goal.goal_id);
        Ok(goal)
    }

    async fn get_goal(&self, goal_id: GoalId) -> Result<Goal> {
        self.get(&format!("/api/goals/{}", goal_id))
            .await?
            .into_data()
    }

    async fn list_goals(&self) -> Result<Vec<Goal>> {
        let goals: Vec<Goal> = self.get("/api/goals").await?.into_data()?;
        debug!("[Plan1qApi] Fetched {} goals", goals.len());
        Ok(goals)
    }

    async fn delete_goal(&self, goal_id: GoalId) -> Result<()> {
        self.delete::<serde_json::Value>(&format!("/api/goals/{}", goal_id))
            .await?
            .into_optional()
            .map(|_| ())
    }
}

#[async_trait]
impl PaymentApiClient for Plan1qApiClient {
    async fn list_by_account(&self, to_account_number: &str) -> Result<Vec<PaymentRecord>> {
        let path = format!(
            "/api/auto-transfers?toAccountNumber={}",
            urlencoding::encode(to_account_number)
        );
        Ok(self
            .get::<Vec<PaymentRecord>>(&path)
            .await?
            .into_optional()?
            .unwrap_or_default())
    }
}

#[async_trait]
impl FundingAccountApiClient for Plan1qApiClient {
    async fn get_shared_account(&self) -> Result<Option<FundingAccount>> {
        self.get("/api/accounts/shared").await?.into_optional()
    }
}

#[async_trait]
impl PinApiClient for Plan1qApiClient {
    async fn verify_pin(&self, pin_number: &str) -> Result<bool> {
        let result: VerifyPinResult = self
            .post("/api/pin/verify", &VerifyPinBody { pin_number })
            .await?
            .into_data()?;
        Ok(result.valid)
    }
}

#[async_trait]
impl SubscriptionApiClient for Plan1qApiClient {
    async fn subscribe(&self, request: SubscriptionRequest) -> Result<SubscriptionReceipt> {
        let receipt: SubscriptionReceipt = self
            .post("/api/products/subscribe", &request)
            .await?
            .into_data()?;
        info!(
            "[Plan1qApi] Product {} subscribed as {}",
            request.product_id, receipt.subscription_id
        );
        Ok(receipt)
    }
}
