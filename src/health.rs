//! Startup check of the place index.
//!
//! Runs one small search so misconfiguration shows up in the logs right away.
//! Failures are reported, never fatal: lookups keep failing individually until
//! the configuration is fixed.

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::config::LocationConfig;
use crate::error::ConfigError;
use crate::transport::{PlaceSearch, Transport};

/// Well-known ZIP code searched by the startup check
pub const CHECK_ZIP_CODE: &str = "90210";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Healthy { results: usize },
    Failed { reason: String },
}

impl CheckOutcome {
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy { .. })
    }
}

/// Search the check ZIP code once and log what happened
pub async fn check_provider(provider: &impl PlaceSearch, config: &LocationConfig) -> CheckOutcome {
    info!(
        "validating AWS Location Service configuration with place index [{}]",
        config.place_index
    );

    match provider.search_text(CHECK_ZIP_CODE, 1).await {
        Ok(response) => {
            let results = response
                .body
                .get("Results")
                .and_then(|r| r.as_array())
                .map(|r| r.len())
                .unwrap_or(0);
            info!(
                "AWS Location Service credentials validation SUCCESSFUL, {} result(s)",
                results
            );
            CheckOutcome::Healthy { results }
        }
        Err(e) => {
            error!(
                "AWS Location Service credentials validation FAILED: {:?}",
                e
            );
            log_configuration_hints(config);
            CheckOutcome::Failed {
                reason: e.to_string(),
            }
        }
    }
}

/// Copy of `config` whose transport makes a single attempt
pub fn check_config(config: &LocationConfig) -> LocationConfig {
    let mut config = config.clone();
    config.http.max_retries = 0;
    config
}

/// Run [`check_provider`] in the background on its own non-retrying transport
pub fn spawn_startup_check(
    config: &LocationConfig,
) -> Result<JoinHandle<CheckOutcome>, ConfigError> {
    let config = check_config(config);
    let transport = Transport::from_config(&config)?;
    Ok(tokio::spawn(async move { check_provider(&transport, &config).await }))
}

fn log_configuration_hints(config: &LocationConfig) {
    error!("=== CONFIGURATION HINTS ===");
    error!(
        "1. Check that the credentials for the {:?} transport are set correctly",
        config.transport
    );
    error!(
        "2. Verify that place index [{}] exists in your AWS account",
        config.place_index
    );
    error!("3. Ensure the credentials are allowed to search the place index");
    error!("4. Confirm that region [{}] is correct", config.region);
    error!("5. The server keeps running, but lookups will fail until this is fixed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::RestTransport;
    use std::time::Duration;
    use wiremock::matchers::{body_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> LocationConfig {
        let mut config = LocationConfig::with_api_key("us-west-2", "AddressIndex", "key");
        config.endpoint = server.uri();
        config.http.max_retries = 0;
        config
    }

    #[tokio::test]
    async fn test_check_reports_result_count() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(serde_json::json!({"Text": "90210", "MaxResults": 1})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "Results": [{"Place": {"Label": "Beverly Hills, CA 90210, USA"}}]
            })))
            .mount(&server)
            .await;

        let config = config_for(&server);
        let transport = RestTransport::new(&config).unwrap();
        assert_eq!(
            check_provider(&transport, &config).await,
            CheckOutcome::Healthy { results: 1 }
        );
    }

    #[tokio::test]
    async fn test_check_failure_is_reported() {
        let server = MockServer::start().await;
        let missing = serde_json::json!({"message": "index not found"});
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404).set_body_json(missing))
            .mount(&server)
            .await;

        let config = config_for(&server);
        let transport = RestTransport::new(&config).unwrap();
        let outcome = check_provider(&transport, &config).await;
        assert!(!outcome.is_healthy());
        match outcome {
            CheckOutcome::Failed { reason } => assert!(reason.contains("index not found")),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_check_config_disables_retries() {
        let config = LocationConfig::with_api_key("us-west-2", "AddressIndex", "key");
        assert!(config.http.max_retries > 0);

        let checked = check_config(&config);
        assert_eq!(checked.http.max_retries, 0);
        assert_eq!(checked.place_index, config.place_index);
        assert_eq!(checked.http.request_timeout, config.http.request_timeout);
    }

    #[tokio::test]
    async fn test_startup_check_makes_a_single_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = config_for(&server);
        config.http.max_retries = 3;
        config.http.initial_backoff = Duration::from_millis(1);
        config.http.max_backoff = Duration::from_millis(2);

        let outcome = spawn_startup_check(&config).unwrap().await.unwrap();
        assert!(!outcome.is_healthy());
    }
}
