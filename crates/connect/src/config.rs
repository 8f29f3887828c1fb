use std::time::Duration;

use plan1q_core::policy::CallPolicy;

/// Default base URL of the Plan1Q API gateway.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Connection settings for the Plan1Q backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    /// Bearer token issued by the auth service, if signed in.
    pub access_token: Option<String>,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            access_token: None,
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }
}

impl ClientConfig {
    /// Reads `PLAN1Q_API_URL`, `PLAN1Q_ACCESS_TOKEN` and
    /// `PLAN1Q_REQUEST_TIMEOUT_MS`, loading `.env` first.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_url = lookup("PLAN1Q_API_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let access_token = lookup("PLAN1Q_ACCESS_TOKEN")
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());
        let timeout_ms: u64 = lookup("PLAN1Q_REQUEST_TIMEOUT_MS")
            .and_then(|ms| ms.trim().parse().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS);

        Self {
            api_url,
            access_token,
            request_timeout: Duration::from_millis(timeout_ms),
        }
    }

    /// The call policy the core should apply on top of this client.
    pub fn call_policy(&self) -> CallPolicy {
        CallPolicy::with_timeout(self.request_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ClientConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.call_policy().timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_reads_values_and_trims_url() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("PLAN1Q_API_URL", "https://api.plan1q.kr/"),
            ("PLAN1Q_ACCESS_TOKEN", "token-123"),
            ("PLAN1Q_REQUEST_TIMEOUT_MS", "5000"),
        ]));
        assert_eq!(config.api_url, "https://api.plan1q.kr");
        assert_eq!(config.access_token.as_deref(), Some("token-123"));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_timeout_falls_back_to_default() {
        for value in ["abc", "0", "-1"] {
            let config =
                ClientConfig::from_lookup(lookup(&[("PLAN1Q_REQUEST_TIMEOUT_MS", value)]));
            assert_eq!(config.request_timeout, Duration::from_millis(30_000));
        }
    }
}
