use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{PlaceSearch, build_http_client, read_response};
use crate::config::{HttpSettings, LocationConfig};
use crate::error::{ConfigError, TransportError};
use crate::retry::retry_transient;
use crate::translate::CoordinateStrategy;
use crate::types::{ProviderResponse, SearchTextRequest};

const API_KEY_HEADER: &str = "X-Api-Key";

/// Place index search authenticated with an API key
pub struct RestTransport {
    client: Client,
    url: String,
    api_key: String,
    max_results: u32,
    http: HttpSettings,
}

impl RestTransport {
    pub fn new(config: &LocationConfig) -> Result<Self, ConfigError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(ConfigError::Missing("AWS_LOCATION_API_KEY"))?;
        Ok(Self {
            client: build_http_client(&config.http)?,
            url: config.search_url(),
            api_key,
            max_results: config.max_results,
            http: config.http.clone(),
        })
    }
}

#[async_trait]
impl PlaceSearch for RestTransport {
    async fn search_text(
        &self,
        text: &str,
        max_results: u32,
    ) -> Result<ProviderResponse, TransportError> {
        let request = SearchTextRequest {
            text: text.to_string(),
            max_results,
        };
        debug!("POST {} {:?}", self.url, request);

        retry_transient(&self.http, || async {
            let response = self
                .client
                .post(&self.url)
                .header(API_KEY_HEADER, &self.api_key)
                .json(&request)
                .send()
                .await?;
            read_response(response).await
        })
        .await
    }

    fn max_results(&self) -> u32 {
        self.max_results
    }

    fn coordinate_strategy(&self) -> CoordinateStrategy {
        CoordinateStrategy::Point
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SEARCH_PATH: &str = "/places/v0/indexes/AddressIndex/search/text";

    fn config_for(server: &MockServer) -> LocationConfig {
        let mut config = LocationConfig::with_api_key("us-west-2", "AddressIndex", "v1.public.key");
        config.endpoint = server.uri();
        config.http.max_retries = 0;
        config
    }

    #[tokio::test]
    async fn test_sends_api_key_and_search_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SEARCH_PATH))
            .and(header("X-Api-Key", "v1.public.key"))
            .and(body_json(serde_json::json!({"Text": "92021", "MaxResults": 5})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"Results": []})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let transport = RestTransport::new(&config_for(&server)).unwrap();
        let response = transport.search("92021").await.unwrap();
        assert_eq!(response.body, serde_json::json!({"Results": []}));
    }

    #[tokio::test]
    async fn test_server_error_becomes_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let transport = RestTransport::new(&config_for(&server)).unwrap();
        let err = transport.search("92021").await.unwrap_err();
        match err {
            TransportError::Http { status, body } => {
                assert_eq!(status.as_u16(), 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let mut config = config_for(&server);
        config.http.max_retries = 2;
        config.http.initial_backoff = Duration::from_millis(1);
        config.http.max_backoff = Duration::from_millis(2);

        let transport = RestTransport::new(&config).unwrap();
        assert!(transport.search("92021").await.is_err());
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let transport = RestTransport::new(&config_for(&server)).unwrap();
        let err = transport.search("92021").await.unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)));
    }

    #[tokio::test]
    async fn test_timeout_becomes_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let mut config = config_for(&server);
        config.http.request_timeout = Duration::from_millis(100);

        let transport = RestTransport::new(&config).unwrap();
        let err = transport.search("92021").await.unwrap_err();
        assert!(err.is_transient());
    }
}
