//! Blocking client with the same contract as [`crate::BedrockProxy`].
//!
//! Built on `reqwest::blocking`; do not construct or call it from inside an
//! async runtime worker thread.

use core::fmt;
use tracing::{debug, instrument};

use crate::{
    BearerToken, ChatMessage, ChatRequest, ChatResponse, ClientConfig, ModelsResponse,
    ProxyRequestError, internal::blocking::ProxyRequestHelper,
};

/// Blocking client for an OpenAI-compatible Bedrock proxy
#[derive(Clone)]
pub struct BedrockProxyBlocking {
    config: ClientConfig,
    client: reqwest::blocking::Client,
}

impl BedrockProxyBlocking {
    /// # Errors
    ///
    /// Fails if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<BearerToken>,
    ) -> Result<Self, ProxyRequestError> {
        Self::with_config(ClientConfig::new(base_url, token)?)
    }

    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn with_config(config: ClientConfig) -> Result<Self, ProxyRequestError> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(ProxyRequestError::ClientBuild)?;
        Ok(Self::with_http_client(config, client))
    }

    pub fn with_http_client(config: ClientConfig, client: reqwest::blocking::Client) -> Self {
        debug!(base_url = config.base_url(), "created blocking proxy client");
        Self { config, client }
    }

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

    fn request_helper(&self) -> ProxyRequestHelper<'_> {
        ProxyRequestHelper::new(self.client.clone(), &self.config)
    }

    /// # Errors
    ///
    /// See [`crate::BedrockProxy::chat_completion`].
    #[instrument(
        skip(self, request),
        fields(model = %request.model, messages = request.messages.len(), stream = request.stream)
    )]
    pub fn chat_completion(&self, request: &ChatRequest) -> Result<ChatResponse, ProxyRequestError> {
        request.validate()?;
        self.request_helper().send_chat_request(request)
    }

    /// # Errors
    ///
    /// See [`crate::BedrockProxy::chat_completion`].
    pub fn chat(
        &self,
        messages: Vec<ChatMessage>,
        model: impl Into<String>,
    ) -> Result<ChatResponse, ProxyRequestError> {
        self.chat_completion(&ChatRequest::new(model, messages))
    }

    /// # Errors
    ///
    /// `HttpStatus`, `Transport` or `Decode`.
    #[instrument(skip(self))]
    pub fn list_models(&self) -> Result<ModelsResponse, ProxyRequestError> {
        self.request_helper().list_models()
    }
}

impl fmt::Debug for BedrockProxyBlocking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BedrockProxyBlocking")
            .field("config", &self.config)
            .field("client", &self.client)
            .finish()
    }
}
