//! Client configuration: where the proxy lives and how to authenticate.

use base64::{
    Engine,
    engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD},
};
use proxy_ox_common::{AuthMethod, RequestConfig};
use reqwest::header::HeaderValue;
use std::{fmt, time::Duration};

use crate::ProxyRequestError;

/// Environment variable holding the proxy base URL
pub const BASE_URL_ENV: &str = "BEDROCK_OPENAI_BASE_URL";

/// Environment variable holding the Bedrock API token
pub const TOKEN_ENV: &str = "AWS_BEARER_TOKEN_BEDROCK";

/// Proxy used when no base URL is configured
pub const DEFAULT_BASE_URL: &str = "https://openai.ez2.click";

/// Every Bedrock API token starts with this
pub const TOKEN_PREFIX: &str = "bedrock-api-key-";

pub const DEFAULT_CHAT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MODELS_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("bedrock-proxy-ox/", env!("CARGO_PKG_VERSION"));

/// A Bedrock API token in the form `bedrock-api-key-<base64 payload>`
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The base64 part after [`TOKEN_PREFIX`], if the prefix is present
    pub fn payload(&self) -> Option<&str> {
        self.0.strip_prefix(TOKEN_PREFIX)
    }

    /// Prefix present and the payload decodes as base64 in any common alphabet
    pub fn is_well_formed(&self) -> bool {
        self.payload().is_some_and(|payload| {
            !payload.is_empty()
                && [STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD]
                    .iter()
                    .any(|engine| engine.decode(payload).is_ok())
        })
    }

    /// The truncated sample token from the setup instructions, never a real credential
    pub fn is_placeholder(&self) -> bool {
        self.payload().is_some() && self.0.ends_with("......")
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BearerToken").field(&"[REDACTED]").finish()
    }
}

impl From<String> for BearerToken {
    fn from(token: String) -> Self {
        Self::new(token)
    }
}

impl From<&str> for BearerToken {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

/// Immutable settings shared by the async and blocking clients
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: String,
    token: BearerToken,
    chat_timeout: Duration,
    models_timeout: Duration,
    user_agent: String,
}

impl ClientConfig {
    /// Validate and normalize `base_url`; all trailing slashes are removed.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyRequestError::InvalidBaseUrl`] unless `base_url` is an
    /// absolute `http` or `https` URL without query or fragment, and
    /// [`ProxyRequestError::InvalidToken`] when the token is not a valid header value.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<BearerToken>,
    ) -> Result<Self, ProxyRequestError> {
        let raw: String = base_url.into();
        let trimmed = raw.trim().trim_end_matches('/');

        let parsed = url::Url::parse(trimmed).map_err(|e| ProxyRequestError::InvalidBaseUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ProxyRequestError::InvalidBaseUrl {
                url: raw,
                reason: format!("unsupported scheme {:?}", parsed.scheme()),
            });
        }
        // Endpoint paths are appended to the base URL verbatim
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(ProxyRequestError::InvalidBaseUrl {
                url: raw,
                reason: "query strings and fragments are not allowed".to_string(),
            });
        }

        let token: BearerToken = token.into();
        HeaderValue::from_str(&format!("Bearer {}", token.as_str())).map_err(|_| {
            ProxyRequestError::InvalidToken(
                "contains characters not allowed in an HTTP header".to_string(),
            )
        })?;

        Ok(Self {
            base_url: trimmed.to_string(),
            token,
            chat_timeout: DEFAULT_CHAT_TIMEOUT,
            models_timeout: DEFAULT_MODELS_TIMEOUT,
            user_agent: USER_AGENT.to_string(),
        })
    }

    /// Read [`BASE_URL_ENV`] (falling back to [`DEFAULT_BASE_URL`]) and [`TOKEN_ENV`].
    ///
    /// # Errors
    ///
    /// Returns [`ProxyRequestError::MissingApiKey`] when the token variable is
    /// unset or blank, or an URL error from [`ClientConfig::new`].
    pub fn from_env() -> Result<Self, ProxyRequestError> {
        let token = std::env::var(TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or(ProxyRequestError::MissingApiKey)?;
        let base_url = std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url, token)
    }

    #[must_use]
    pub fn with_chat_timeout(mut self, timeout: Duration) -> Self {
        self.chat_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_models_timeout(mut self, timeout: Duration) -> Self {
        self.models_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> &BearerToken {
        &self.token
    }

    /// Value of the `Authorization` header sent with every request
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token.as_str())
    }

    pub fn chat_timeout(&self) -> Duration {
        self.chat_timeout
    }

    pub fn models_timeout(&self) -> Duration {
        self.models_timeout
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub(crate) fn request_config(&self) -> RequestConfig {
        RequestConfig::new(self.base_url.clone())
            .with_auth(AuthMethod::Bearer(self.token.as_str().to_string()))
            .with_user_agent(self.user_agent.clone())
    }
}
