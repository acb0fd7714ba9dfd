//! One synchronous face over both client modes so the commands are written once.

use bedrock_proxy_ox::{
    BedrockProxy, BedrockProxyBlocking, ChatRequest, ChatResponse, ClientConfig, ModelsResponse,
    ProxyRequestError,
};
use tokio::runtime::Runtime;

pub trait Backend {
    fn list_models(&self) -> Result<ModelsResponse, ProxyRequestError>;

    fn chat_completion(&self, request: &ChatRequest) -> Result<ChatResponse, ProxyRequestError>;

    /// Shown in the banner
    fn mode(&self) -> &'static str;
}

/// Async client driven by a private runtime
pub struct AsyncBackend {
    runtime: Runtime,
    client: BedrockProxy,
}

impl AsyncBackend {
    pub fn new(config: ClientConfig) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let client = BedrockProxy::with_config(config)?;
        Ok(Self { runtime, client })
    }
}

impl Backend for AsyncBackend {
    fn list_models(&self) -> Result<ModelsResponse, ProxyRequestError> {
        self.runtime.block_on(self.client.list_models())
    }

    fn chat_completion(&self, request: &ChatRequest) -> Result<ChatResponse, ProxyRequestError> {
        self.runtime.block_on(self.client.chat_completion(request))
    }

    fn mode(&self) -> &'static str {
        "async"
    }
}

impl Backend for BedrockProxyBlocking {
    fn list_models(&self) -> Result<ModelsResponse, ProxyRequestError> {
        BedrockProxyBlocking::list_models(self)
    }

    fn chat_completion(&self, request: &ChatRequest) -> Result<ChatResponse, ProxyRequestError> {
        BedrockProxyBlocking::chat_completion(self, request)
    }

    fn mode(&self) -> &'static str {
        "blocking"
    }
}
