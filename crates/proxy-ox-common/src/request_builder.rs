use crate::error::{self, CommonRequestError};
use reqwest::{Method, RequestBuilder as ReqwestRequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP method for API endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        }
    }
}

/// Authentication method for API requests
#[derive(Clone)]
pub enum AuthMethod {
    /// Bearer token authentication (Authorization: Bearer <token>)
    Bearer(String),
}

impl AuthMethod {
    /// The header name and value this method adds to every request
    #[must_use]
    pub fn header(&self) -> (String, String) {
        match self {
            Self::Bearer(token) => ("authorization".to_string(), format!("Bearer {token}")),
        }
    }
}

impl std::fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bearer(_) => f.debug_tuple("Bearer").field(&"[REDACTED]").finish(),
        }
    }
}

/// Represents an API endpoint with its configuration
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub path: String,
    pub method: HttpMethod,
    pub timeout: Option<Duration>,
}

impl Endpoint {
    pub fn new(path: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            path: path.into(),
            method,
            timeout: None,
        }
    }

    /// Bound the whole exchange (connect, send, read body) by `timeout`
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Configuration for request building
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub base_url: String,
    pub auth: Option<AuthMethod>,
    pub user_agent: Option<String>,
}

impl RequestConfig {
    /// Trailing slashes are stripped from `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth: None,
            user_agent: None,
        }
    }

    #[must_use]
    pub fn with_auth(mut self, auth: AuthMethod) -> Self {
        self.auth = Some(auth);
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Absolute URL for `endpoint`, joined with exactly one slash
    #[must_use]
    pub fn url_for(&self, endpoint: &Endpoint) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.path.trim_start_matches('/')
        )
    }

    /// Every header attached to a request for `endpoint`, in application order
    #[must_use]
    pub fn headers_for(&self, endpoint: &Endpoint) -> Vec<(String, String)> {
        let mut headers = Vec::new();

        if let Some(ref auth) = self.auth {
            headers.push(auth.header());
        }

        if let Some(ref user_agent) = self.user_agent {
            headers.push(("user-agent".to_string(), user_agent.clone()));
        }

        // Only requests that carry a JSON body get a content type
        if endpoint.method == HttpMethod::Post {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }

        headers
    }
}

/// Serialize `body` to a JSON value, logging the payload at debug level
pub(crate) fn encode_body<B: Serialize>(
    endpoint: &Endpoint,
    body: &B,
) -> Result<serde_json::Value, CommonRequestError> {
    let val = serde_json::to_value(body).map_err(CommonRequestError::Encode)?;
    debug!(path = %endpoint.path, payload = %val, "encoded request body");
    Ok(val)
}

/// Turn a finished exchange into either the decoded body or an error
pub(crate) fn decode_response<T: DeserializeOwned>(
    status: StatusCode,
    bytes: &bytes::Bytes,
) -> Result<T, CommonRequestError> {
    debug!(status = status.as_u16(), len = bytes.len(), "received response");

    if !status.is_success() {
        warn!(status = status.as_u16(), "request rejected by server");
        return Err(error::parse_error_response(status, bytes));
    }

    serde_json::from_slice::<T>(bytes).map_err(|source| {
        warn!(error = %source, "response body is not valid JSON");
        CommonRequestError::Decode {
            source,
            body: String::from_utf8_lossy(bytes).into_owned(),
        }
    })
}

/// Generic request builder that handles common HTTP patterns
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    client: reqwest::Client,
    config: RequestConfig,
}

impl RequestBuilder {
    pub fn new(client: reqwest::Client, config: RequestConfig) -> Self {
        Self { client, config }
    }

    #[must_use]
    pub fn config(&self) -> &RequestConfig {
        &self.config
    }

    /// Build a reqwest `RequestBuilder` for the given endpoint
    pub fn build_request(&self, endpoint: &Endpoint) -> ReqwestRequestBuilder {
        let url = self.config.url_for(endpoint);
        let mut req = self.client.request(endpoint.method.into(), &url);

        for (key, value) in self.config.headers_for(endpoint) {
            req = req.header(key, value);
        }

        if let Some(timeout) = endpoint.timeout {
            req = req.timeout(timeout);
        }

        req
    }

    /// Execute a request with an optional JSON body and return the deserialized response
    pub async fn request_json<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &Endpoint,
        body: Option<&B>,
    ) -> Result<T, CommonRequestError> {
        let mut req = self.build_request(endpoint);

        if let Some(body) = body {
            req = req.json(&encode_body(endpoint, body)?);
        }

        let res = req.send().await?;
        Self::handle_response(res).await
    }

    /// Execute a request without body and return the deserialized response
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
    ) -> Result<T, CommonRequestError> {
        let res = self.build_request(endpoint).send().await?;
        Self::handle_response(res).await
    }

    /// Read the whole body, then decode it or map the status to an error
    async fn handle_response<T: DeserializeOwned>(res: Response) -> Result<T, CommonRequestError> {
        let status = res.status();
        let bytes = res.bytes().await?;
        decode_response(status, &bytes)
    }
}
