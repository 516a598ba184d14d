use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use tracing::debug;

use super::sigv4::Signer;
use super::{PlaceSearch, build_http_client, read_response};
use crate::config::{AwsCredentials, HttpSettings, LocationConfig};
use crate::error::{ConfigError, TransportError};
use crate::retry::retry_transient;
use crate::translate::CoordinateStrategy;
use crate::types::{ProviderResponse, SearchTextRequest};

const SERVICE: &str = "geo";
const JSON: &str = "application/json";

/// Place index search over plain HTTPS, each request signed here with SigV4
/// from an access key pair and optional session token
pub struct SignedTransport {
    client: Client,
    url: Url,
    region: String,
    credentials: AwsCredentials,
    max_results: u32,
    http: HttpSettings,
}

impl SignedTransport {
    pub fn new(config: &LocationConfig) -> Result<Self, ConfigError> {
        let credentials = config
            .credentials
            .clone()
            .ok_or(ConfigError::Missing("AWS_ACCESS_KEY_ID"))?;
        let url = Url::parse(&config.search_url()).map_err(|_| ConfigError::Invalid {
            var: "AWS_LOCATION_ENDPOINT",
            value: config.endpoint.clone(),
        })?;
        Ok(Self {
            client: build_http_client(&config.http)?,
            url,
            region: config.region.clone(),
            credentials,
            max_results: config.max_results,
            http: config.http.clone(),
        })
    }

    fn signer(&self) -> Signer<'_> {
        Signer {
            credentials: &self.credentials,
            region: &self.region,
            service: SERVICE,
        }
    }
}

#[async_trait]
impl PlaceSearch for SignedTransport {
    async fn search_text(
        &self,
        text: &str,
        max_results: u32,
    ) -> Result<ProviderResponse, TransportError> {
        let request = SearchTextRequest {
            text: text.to_string(),
            max_results,
        };
        debug!("signed POST {} {:?}", self.url, request);
        let body = serde_json::to_vec(&request)?;

        retry_transient(&self.http, || async {
            // sign on every attempt so the timestamp stays fresh
            let signed = self.signer().sign(
                "POST",
                &self.url,
                &[(CONTENT_TYPE.as_str(), JSON)],
                &body,
                Utc::now(),
            )?;

            let mut builder = self
                .client
                .post(self.url.clone())
                .header(CONTENT_TYPE, JSON)
                .body(body.clone());
            for (name, value) in signed {
                builder = builder.header(name, value);
            }

            read_response(builder.send().await?).await
        })
        .await
    }

    fn max_results(&self) -> u32 {
        self.max_results
    }

    fn coordinate_strategy(&self) -> CoordinateStrategy {
        CoordinateStrategy::BoundingBox
    }
}
