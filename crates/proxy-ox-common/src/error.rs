use thiserror::Error;

/// Errors that can occur while executing a single HTTP exchange
#[derive(Error, Debug)]
pub enum CommonRequestError {
    /// The server answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// Status code returned by the server
        status: u16,
        /// Raw response body, decoded lossily as UTF-8
        body: String,
    },

    /// Connection, DNS, TLS or timeout failure
    #[error("HTTP transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A 2xx response whose body could not be decoded as JSON
    #[error("failed to decode response body: {source}")]
    Decode {
        /// Underlying JSON error
        source: serde_json::Error,
        /// Raw response body, decoded lossily as UTF-8
        body: String,
    },

    /// The request body could not be serialized
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
}

impl CommonRequestError {
    /// HTTP status code, if the server answered at all
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Decode { .. } | Self::Encode(_) => None,
        }
    }

    /// Whether the exchange failed because the configured timeout elapsed
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// Human-readable message from an OpenAI-style error body, if present
    #[must_use]
    pub fn api_message(&self) -> Option<String> {
        match self {
            Self::HttpStatus { body, .. } => api_message_from_body(body),
            _ => None,
        }
    }
}

/// Build an error from a non-2xx status and its body
pub fn parse_error_response(status: reqwest::StatusCode, body: &bytes::Bytes) -> CommonRequestError {
    CommonRequestError::HttpStatus {
        status: status.as_u16(),
        body: String::from_utf8_lossy(body).into_owned(),
    }
}

/// Message carried by a JSON error body, `None` for plain-text bodies
#[must_use]
pub fn api_message_from_body(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| extract_error_message(&json))
}

/// Extract an error message from the JSON error shapes a proxy may return
fn extract_error_message(json: &serde_json::Value) -> Option<String> {
    // {"error": {"message": "..."}}
    if let Some(msg) = json
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(serde_json::Value::as_str)
    {
        return Some(msg.to_string());
    }

    // {"error": "..."}
    if let Some(msg) = json.get("error").and_then(serde_json::Value::as_str) {
        return Some(msg.to_string());
    }

    // {"message": "..."} as emitted by API gateways
    json.get("message")
        .and_then(serde_json::Value::as_str)
        .map(ToString::to_string)
}
