use proxy_ox_common::{CommonRequestError, api_message_from_body};
use serde::{Serialize, Serializer, ser::SerializeStruct};
use thiserror::Error;

use crate::config::TOKEN_ENV;

/// Errors that can occur when talking to the proxy
#[derive(Debug, Error)]
pub enum ProxyRequestError {
    /// The proxy answered with a non-2xx status
    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Connection refused, DNS failure, TLS failure or timeout
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A 2xx response whose body is not valid JSON
    #[error("Failed to decode response: {source}")]
    Decode {
        source: serde_json::Error,
        body: String,
    },

    /// The request body could not be serialized
    #[error("Failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    /// Rejected locally, nothing was sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No bearer token configured
    #[error("Missing API key: set the {} environment variable", TOKEN_ENV)]
    MissingApiKey,

    /// The token cannot be sent in an `Authorization` header
    #[error("Invalid API key: {0}")]
    InvalidToken(String),

    /// The base URL is not an absolute http(s) URL
    #[error("Invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl ProxyRequestError {
    /// HTTP status code, if the proxy answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the call gave up because the configured timeout elapsed
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// Message from an OpenAI-style `{"error": {"message": ..}}` body, if present
    pub fn api_message(&self) -> Option<String> {
        match self {
            Self::HttpStatus { body, .. } => api_message_from_body(body),
            _ => None,
        }
    }
}

impl From<CommonRequestError> for ProxyRequestError {
    fn from(err: CommonRequestError) -> Self {
        match err {
            CommonRequestError::HttpStatus { status, body } => Self::HttpStatus { status, body },
            CommonRequestError::Transport(e) => Self::Transport(e),
            CommonRequestError::Decode { source, body } => Self::Decode { source, body },
            CommonRequestError::Encode(e) => Self::Encode(e),
        }
    }
}

impl Serialize for ProxyRequestError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ProxyRequestError::HttpStatus { status, body } => {
                let mut state = serializer.serialize_struct("ProxyRequestError", 3)?;
                state.serialize_field("type", "HttpStatus")?;
                state.serialize_field("status", status)?;
                state.serialize_field("body", body)?;
                state.end()
            }
            ProxyRequestError::Transport(e) => {
                let mut state = serializer.serialize_struct("ProxyRequestError", 3)?;
                state.serialize_field("type", "Transport")?;
                state.serialize_field("timeout", &e.is_timeout())?;
                state.serialize_field("error", &e.to_string())?;
                state.end()
            }
            ProxyRequestError::Decode { source, body } => {
                let mut state = serializer.serialize_struct("ProxyRequestError", 3)?;
                state.serialize_field("type", "Decode")?;
                state.serialize_field("error", &source.to_string())?;
                state.serialize_field("body", body)?;
                state.end()
            }
            ProxyRequestError::Encode(e) => {
                let mut state = serializer.serialize_struct("ProxyRequestError", 2)?;
                state.serialize_field("type", "Encode")?;
                state.serialize_field("error", &e.to_string())?;
                state.end()
            }
            ProxyRequestError::InvalidRequest(message) => {
                let mut state = serializer.serialize_struct("ProxyRequestError", 2)?;
                state.serialize_field("type", "InvalidRequest")?;
                state.serialize_field("message", message)?;
                state.end()
            }
            ProxyRequestError::MissingApiKey => {
                let mut state = serializer.serialize_struct("ProxyRequestError", 1)?;
                state.serialize_field("type", "MissingApiKey")?;
                state.end()
            }
            ProxyRequestError::InvalidToken(reason) => {
                let mut state = serializer.serialize_struct("ProxyRequestError", 2)?;
                state.serialize_field("type", "InvalidToken")?;
                state.serialize_field("reason", reason)?;
                state.end()
            }
            ProxyRequestError::InvalidBaseUrl { url, reason } => {
                let mut state = serializer.serialize_struct("ProxyRequestError", 3)?;
                state.serialize_field("type", "InvalidBaseUrl")?;
                state.serialize_field("url", url)?;
                state.serialize_field("reason", reason)?;
                state.end()
            }
            ProxyRequestError::ClientBuild(e) => {
                let mut state = serializer.serialize_struct("ProxyRequestError", 2)?;
                state.serialize_field("type", "ClientBuild")?;
                state.serialize_field("error", &e.to_string())?;
                state.end()
            }
        }
    }
}
