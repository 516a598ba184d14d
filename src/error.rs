//! Error types for the provider transport and configuration loading.

use thiserror::Error;

/// Longest provider message carried into a user-facing error
pub const MAX_DETAIL_CHARS: usize = 200;

/// Failure to obtain a usable payload from the place index
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The full body is kept for logging; `Display` only carries the status and
    /// the provider's own `message` field, capped at [`MAX_DETAIL_CHARS`]
    #[error("provider returned {status}{}", provider_detail(.body))]
    Http {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed provider payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("cannot sign request: {0}")]
    Signing(String),
}

impl TransportError {
    /// Whether retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status, .. } => {
                status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
            Self::Decode(_) | Self::Signing(_) => false,
        }
    }
}

/// `": <message>"` when the body is a JSON error document, empty otherwise
fn provider_detail(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return String::new();
    };
    let message = ["message", "Message"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|m| m.as_str()))
        .map(str::trim)
        .unwrap_or_default();
    if message.is_empty() {
        return String::new();
    }

    let mut detail: String = message.chars().take(MAX_DETAIL_CHARS).collect();
    if message.chars().count() > MAX_DETAIL_CHARS {
        detail.push_str("...");
    }
    format!(": {}", detail)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("`{0}` must be set and non-blank")]
    Missing(&'static str),

    #[error("`{var}` has an invalid value: {value}")]
    Invalid { var: &'static str, value: String },

    #[error("cannot build HTTP client: {0}")]
    HttpClient(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_errors_are_transient() {
        let err = TransportError::Http {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            body: String::new(),
        };
        assert!(err.is_transient());

        let err = TransportError::Http {
            status: reqwest::StatusCode::TOO_MANY_REQUESTS,
            body: String::new(),
        };
        assert!(err.is_transient());
    }

    #[test]
    fn test_client_errors_are_permanent() {
        let err = TransportError::Http {
            status: reqwest::StatusCode::FORBIDDEN,
            body: "{\"message\":\"denied\"}".to_string(),
        };
        assert!(!err.is_transient());
        assert_eq!(err.to_string(), "provider returned 403 Forbidden: denied");
    }

    #[test]
    fn test_non_json_body_is_not_displayed() {
        let body = format!(
            "<html><body><pre>java.lang.NullPointerException\n\tat Gateway.handle{}</pre></html>",
            "x".repeat(200_000)
        );
        let err = TransportError::Http {
            status: reqwest::StatusCode::BAD_GATEWAY,
            body,
        };
        assert_eq!(err.to_string(), "provider returned 502 Bad Gateway");
    }

    #[test]
    fn test_long_provider_message_is_capped() {
        let body = serde_json::json!({ "Message": "m".repeat(5_000) }).to_string();
        let err = TransportError::Http {
            status: reqwest::StatusCode::BAD_REQUEST,
            body,
        };
        let shown = err.to_string();
        assert!(shown.starts_with("provider returned 400 Bad Request: mmm"));
        assert!(shown.ends_with("..."));
        assert!(shown.len() < MAX_DETAIL_CHARS + 50);
    }
}
