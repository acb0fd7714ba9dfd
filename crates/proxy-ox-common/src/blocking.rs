//! Blocking counterpart of [`crate::RequestBuilder`].
//!
//! Uses `reqwest::blocking`, so it must not be driven from inside an async
//! runtime worker. Wrap calls in `spawn_blocking` when mixing the two.

use crate::{
    error::CommonRequestError,
    request_builder::{Endpoint, RequestConfig, decode_response, encode_body},
};
use serde::{Serialize, de::DeserializeOwned};

/// Blocking request builder sharing configuration and error mapping with the async one
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    client: reqwest::blocking::Client,
    config: RequestConfig,
}

impl RequestBuilder {
    pub fn new(client: reqwest::blocking::Client, config: RequestConfig) -> Self {
        Self { client, config }
    }

    #[must_use]
    pub fn config(&self) -> &RequestConfig {
        &self.config
    }

    /// Build a blocking reqwest request for the given endpoint
    pub fn build_request(&self, endpoint: &Endpoint) -> reqwest::blocking::RequestBuilder {
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
    pub fn request_json<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &Endpoint,
        body: Option<&B>,
    ) -> Result<T, CommonRequestError> {
        let mut req = self.build_request(endpoint);

        if let Some(body) = body {
            req = req.json(&encode_body(endpoint, body)?);
        }

        let res = req.send()?;
        let status = res.status();
        let bytes = res.bytes()?;
        decode_response(status, &bytes)
    }

    /// Execute a request without body and return the deserialized response
    pub fn request<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T, CommonRequestError> {
        self.request_json(endpoint, None::<&()>)
    }
}
