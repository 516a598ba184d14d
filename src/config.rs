//! Provider configuration.
//!
//! Everything the transports need is loaded once into a [`LocationConfig`] and
//! handed to constructors explicitly.

use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_MAX_RESULTS: u32 = 5;
const MAX_RESULTS_LIMIT: u32 = 50;
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAX_RETRIES: usize = 3;

/// Which transport talks to the place index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// API key in the `X-Api-Key` header
    Rest,
    /// SigV4-signed requests with an access key pair, served by
    /// [`SignedTransport`](crate::transport::SignedTransport); `sdk` is kept as
    /// the configuration value
    Sdk,
}

impl TransportKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "rest" | "api-key" | "apikey" => Some(Self::Rest),
            "sdk" | "sigv4" => Some(Self::Sdk),
            _ => None,
        }
    }
}

/// Long-lived or session credentials for signed requests
#[derive(Clone, PartialEq, Eq)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl AwsCredentials {
    /// Access key id reduced to its first four characters
    pub fn masked_access_key(&self) -> String {
        let prefix: String = self.access_key_id.chars().take(4).collect();
        format!("{}****", prefix)
    }
}

impl std::fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.masked_access_key())
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "****"),
            )
            .finish()
    }
}

/// Transport timeouts and retry limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_retries: usize,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_millis(5000),
        }
    }
}

#[derive(Clone)]
pub struct LocationConfig {
    pub region: String,
    pub place_index: String,
    /// Base URL of the places API, e.g. `https://places.geo.us-west-2.amazonaws.com`
    pub endpoint: String,
    pub transport: TransportKind,
    pub api_key: Option<String>,
    pub credentials: Option<AwsCredentials>,
    /// Map resource rendered by the lookup page
    pub map_name: Option<String>,
    pub max_results: u32,
    pub http: HttpSettings,
}

impl std::fmt::Debug for LocationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationConfig")
            .field("region", &self.region)
            .field("place_index", &self.place_index)
            .field("endpoint", &self.endpoint)
            .field("transport", &self.transport)
            .field("api_key", &self.api_key.as_ref().map(|_| "****"))
            .field("credentials", &self.credentials)
            .field("map_name", &self.map_name)
            .field("max_results", &self.max_results)
            .field("http", &self.http)
            .finish()
    }
}

impl LocationConfig {
    /// REST configuration with defaults, mostly for tests and demos
    pub fn with_api_key(
        region: impl Into<String>,
        place_index: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let region = region.into();
        Self {
            endpoint: default_endpoint(&region),
            region,
            place_index: place_index.into(),
            transport: TransportKind::Rest,
            api_key: Some(api_key.into()),
            credentials: None,
            map_name: None,
            max_results: DEFAULT_MAX_RESULTS,
            http: HttpSettings::default(),
        }
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let region = require("AWS_LOCATION_REGION")?;
        let place_index = require("AWS_LOCATION_PLACE_INDEX")?;
        let endpoint = get("AWS_LOCATION_ENDPOINT")
            .map(|e| e.trim_end_matches('/').to_string())
            .unwrap_or_else(|| default_endpoint(&region));

        let access_key = get("AWS_ACCESS_KEY_ID");
        let transport = match get("AWS_LOCATION_TRANSPORT") {
            Some(value) => TransportKind::parse(&value).ok_or(ConfigError::Invalid {
                var: "AWS_LOCATION_TRANSPORT",
                value,
            })?,
            None if access_key.is_some() => TransportKind::Sdk,
            None => TransportKind::Rest,
        };

        let api_key = get("AWS_LOCATION_API_KEY");
        let credentials = match access_key {
            Some(access_key_id) => Some(AwsCredentials {
                access_key_id,
                secret_access_key: require("AWS_SECRET_ACCESS_KEY")?,
                session_token: get("AWS_SESSION_TOKEN"),
            }),
            None => None,
        };

        match transport {
            TransportKind::Rest if api_key.is_none() => {
                return Err(ConfigError::Missing("AWS_LOCATION_API_KEY"));
            }
            TransportKind::Sdk if credentials.is_none() => {
                return Err(ConfigError::Missing("AWS_ACCESS_KEY_ID"));
            }
            _ => {}
        }

        let max_results = parse_number(&get, "AWS_LOCATION_MAX_RESULTS")?
            .unwrap_or(DEFAULT_MAX_RESULTS)
            .clamp(1, MAX_RESULTS_LIMIT);

        let mut http = HttpSettings::default();
        if let Some(secs) = parse_number::<u64>(&get, "AWS_LOCATION_TIMEOUT_SECS")? {
            http.connect_timeout = Duration::from_secs(secs);
            http.request_timeout = Duration::from_secs(secs);
        }
        if let Some(retries) = parse_number(&get, "AWS_LOCATION_MAX_RETRIES")? {
            http.max_retries = retries;
        }

        Ok(Self {
            region,
            place_index,
            endpoint,
            transport,
            api_key,
            credentials,
            map_name: get("AWS_LOCATION_MAP_NAME"),
            max_results,
            http,
        })
    }

    /// URL of the place index text search operation
    pub fn search_url(&self) -> String {
        format!(
            "{}/places/v0/indexes/{}/search/text",
            self.endpoint, self.place_index
        )
    }
}

/// Public places endpoint for a region
pub fn default_endpoint(region: &str) -> String {
    format!("https://places.geo.{}.amazonaws.com", region)
}

fn parse_number<T: std::str::FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match get(var) {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value }),
        None => Ok(None),
    }
}
