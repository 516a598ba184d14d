//! Clients for the place index search operation.
//!
//! Two transports reach the same search operation: [`RestTransport`]
//! authenticates with an API key, [`SignedTransport`] signs every request with an
//! access key pair. Both yield the same [`ProviderResponse`], and [`Transport`]
//! picks one based on configuration.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::config::{HttpSettings, LocationConfig, TransportKind};
use crate::error::{ConfigError, TransportError};
use crate::translate::CoordinateStrategy;
use crate::types::ProviderResponse;

mod rest;
mod signed;
pub mod sigv4;

pub use rest::RestTransport;
pub use signed::SignedTransport;

const UA: &str = concat!("zipcode-lookup/", env!("CARGO_PKG_VERSION"));

/// Free-text search against a place index
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    /// Search for `text`, asking for at most `max_results` candidates
    async fn search_text(
        &self,
        text: &str,
        max_results: u32,
    ) -> Result<ProviderResponse, TransportError>;

    /// Result cap used by [`PlaceSearch::search`]
    fn max_results(&self) -> u32;

    /// How coordinates are read from this provider's responses
    fn coordinate_strategy(&self) -> CoordinateStrategy;

    /// Search for a ZIP code with the configured result cap
    async fn search(&self, zip_code: &str) -> Result<ProviderResponse, TransportError> {
        self.search_text(zip_code, self.max_results()).await
    }
}

/// Configuration-selected transport
pub enum Transport {
    Rest(RestTransport),
    Signed(SignedTransport),
}

impl Transport {
    pub fn from_config(config: &LocationConfig) -> Result<Self, ConfigError> {
        match config.transport {
            TransportKind::Rest => Ok(Self::Rest(RestTransport::new(config)?)),
            TransportKind::Sdk => Ok(Self::Signed(SignedTransport::new(config)?)),
        }
    }

    pub fn kind(&self) -> TransportKind {
        match self {
            Self::Rest(_) => TransportKind::Rest,
            Self::Signed(_) => TransportKind::Sdk,
        }
    }
}

#[async_trait]
impl PlaceSearch for Transport {
    async fn search_text(
        &self,
        text: &str,
        max_results: u32,
    ) -> Result<ProviderResponse, TransportError> {
        match self {
            Self::Rest(t) => t.search_text(text, max_results).await,
            Self::Signed(t) => t.search_text(text, max_results).await,
        }
    }

    fn max_results(&self) -> u32 {
        match self {
            Self::Rest(t) => t.max_results(),
            Self::Signed(t) => t.max_results(),
        }
    }

    fn coordinate_strategy(&self) -> CoordinateStrategy {
        match self {
            Self::Rest(t) => t.coordinate_strategy(),
            Self::Signed(t) => t.coordinate_strategy(),
        }
    }
}

/// Shared HTTP client with bounded connect and request timeouts
fn build_http_client(settings: &HttpSettings) -> Result<Client, ConfigError> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(UA));
    Client::builder()
        .default_headers(headers)
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.request_timeout)
        .build()
        .map_err(|e| ConfigError::HttpClient(e.to_string()))
}

/// Turn a provider reply into a [`ProviderResponse`], rejecting non-2xx and non-JSON bodies
async fn read_response(response: reqwest::Response) -> Result<ProviderResponse, TransportError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(TransportError::Http { status, body });
    }

    Ok(ProviderResponse::new(serde_json::from_str(&body)?))
}
