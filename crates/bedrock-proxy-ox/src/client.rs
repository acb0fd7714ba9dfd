use core::fmt;
use tracing::{debug, instrument};

use crate::{
    ChatMessage, ChatRequest, ChatResponse, ClientConfig, ModelsResponse, ProxyRequestError,
    internal::ProxyRequestHelper,
};

/// Async client for an OpenAI-compatible Bedrock proxy
#[derive(Clone)]
pub struct BedrockProxy {
    config: ClientConfig,
    client: reqwest::Client,
}

impl BedrockProxy {
    /// Create a client for `base_url` authenticating with `token`
    ///
    /// # Errors
    ///
    /// Fails if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<crate::BearerToken>,
    ) -> Result<Self, ProxyRequestError> {
        Self::with_config(ClientConfig::new(base_url, token)?)
    }

    /// Create a client from an already validated configuration
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn with_config(config: ClientConfig) -> Result<Self, ProxyRequestError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(ProxyRequestError::ClientBuild)?;
        Ok(Self::with_http_client(config, client))
    }

    /// Reuse a caller-provided `reqwest::Client`
    pub fn with_http_client(config: ClientConfig, client: reqwest::Client) -> Self {
        debug!(base_url = config.base_url(), "created proxy client");
        Self { config, client }
    }

    /// Build a client from `BEDROCK_OPENAI_BASE_URL` and `AWS_BEARER_TOKEN_BEDROCK`
    ///
    /// # Errors
    ///
    /// Returns [`ProxyRequestError::MissingApiKey`] when no token is set.
    pub fn load_from_env() -> Result<Self, ProxyRequestError> {
        Self::with_config(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    /// Create a chat request builder
    pub fn chat_request(&self) -> crate::request::ChatRequestBuilder {
        ChatRequest::builder()
    }

    /// Create request helper for internal use
    fn request_helper(&self) -> ProxyRequestHelper<'_> {
        ProxyRequestHelper::new(self.client.clone(), &self.config)
    }

    /// Send a chat completion request and return the decoded body
    ///
    /// # Errors
    ///
    /// [`ProxyRequestError::InvalidRequest`] for an empty conversation (nothing
    /// is sent), otherwise `HttpStatus`, `Transport` or `Decode`.
    #[instrument(
        skip(self, request),
        fields(model = %request.model, messages = request.messages.len(), stream = request.stream)
    )]
    pub async fn chat_completion(
        &self,
        request: &ChatRequest,
    ) -> Result<ChatResponse, ProxyRequestError> {
        request.validate()?;
        self.request_helper().send_chat_request(request).await
    }

    /// Shorthand for a request with default sampling parameters
    ///
    /// # Errors
    ///
    /// Same as [`BedrockProxy::chat_completion`].
    pub async fn chat(
        &self,
        messages: Vec<ChatMessage>,
        model: impl Into<String>,
    ) -> Result<ChatResponse, ProxyRequestError> {
        self.chat_completion(&ChatRequest::new(model, messages)).await
    }

    /// List the models the proxy exposes
    ///
    /// # Errors
    ///
    /// `HttpStatus`, `Transport` or `Decode`.
    #[instrument(skip(self))]
    pub async fn list_models(&self) -> Result<ModelsResponse, ProxyRequestError> {
        self.request_helper().list_models().await
    }
}

impl fmt::Debug for BedrockProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BedrockProxy")
            .field("config", &self.config)
            .field("client", &self.client)
            .finish()
    }
}
