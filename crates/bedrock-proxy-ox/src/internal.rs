use proxy_ox_common::{Endpoint, HttpMethod, RequestBuilder};

use crate::{ChatRequest, ChatResponse, ClientConfig, ModelsResponse, ProxyRequestError};

const CHAT_COMPLETIONS_PATH: &str = "v1/chat/completions";
const MODELS_PATH: &str = "v1/models";

pub(crate) fn chat_endpoint(config: &ClientConfig) -> Endpoint {
    Endpoint::new(CHAT_COMPLETIONS_PATH, HttpMethod::Post).with_timeout(config.chat_timeout())
}

pub(crate) fn models_endpoint(config: &ClientConfig) -> Endpoint {
    Endpoint::new(MODELS_PATH, HttpMethod::Get).with_timeout(config.models_timeout())
}

/// Proxy client helper methods using the common `RequestBuilder`
pub(crate) struct ProxyRequestHelper<'a> {
    request_builder: RequestBuilder,
    config: &'a ClientConfig,
}

impl<'a> ProxyRequestHelper<'a> {
    pub(crate) fn new(client: reqwest::Client, config: &'a ClientConfig) -> Self {
        Self {
            request_builder: RequestBuilder::new(client, config.request_config()),
            config,
        }
    }

    /// Send a chat completion request
    pub(crate) async fn send_chat_request(
        &self,
        request: &ChatRequest,
    ) -> Result<ChatResponse, ProxyRequestError> {
        let endpoint = chat_endpoint(self.config);
        Ok(self
            .request_builder
            .request_json(&endpoint, Some(request))
            .await?)
    }

    /// List available models
    pub(crate) async fn list_models(&self) -> Result<ModelsResponse, ProxyRequestError> {
        let endpoint = models_endpoint(self.config);
        Ok(self.request_builder.request(&endpoint).await?)
    }
}

#[cfg(feature = "blocking")]
pub(crate) mod blocking {
    use proxy_ox_common::blocking::RequestBuilder;

    use super::{chat_endpoint, models_endpoint};
    use crate::{ChatRequest, ChatResponse, ClientConfig, ModelsResponse, ProxyRequestError};

    /// Blocking twin of [`super::ProxyRequestHelper`]
    pub(crate) struct ProxyRequestHelper<'a> {
        request_builder: RequestBuilder,
        config: &'a ClientConfig,
    }

    impl<'a> ProxyRequestHelper<'a> {
        pub(crate) fn new(client: reqwest::blocking::Client, config: &'a ClientConfig) -> Self {
            Self {
                request_builder: RequestBuilder::new(client, config.request_config()),
                config,
            }
        }

        pub(crate) fn send_chat_request(
            &self,
            request: &ChatRequest,
        ) -> Result<ChatResponse, ProxyRequestError> {
            let endpoint = chat_endpoint(self.config);
            Ok(self.request_builder.request_json(&endpoint, Some(request))?)
        }

        pub(crate) fn list_models(&self) -> Result<ModelsResponse, ProxyRequestError> {
            let endpoint = models_endpoint(self.config);
            Ok(self.request_builder.request(&endpoint)?)
        }
    }
}
