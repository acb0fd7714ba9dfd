#![cfg_attr(not(test), deny(unsafe_code))]
#![warn(clippy::pedantic, clippy::unwrap_used)]

//! Client for OpenAI-compatible proxies in front of AWS Bedrock
//!
//! The proxy accepts OpenAI-style chat-completion requests and forwards them
//! to Bedrock. This crate covers the two endpoints a caller needs:
//! - `POST /v1/chat/completions`
//! - `GET /v1/models`
//!
//! Both are available on the async [`BedrockProxy`] and, with the default
//! `blocking` feature, on [`BedrockProxyBlocking`]. Responses are returned as
//! opaque JSON with a few convenience accessors.
//!
//! # Example
//!
//! ```rust,no_run
//! use bedrock_proxy_ox::{BedrockProxy, ChatRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BedrockProxy::new(
//!         "https://openai.ez2.click",
//!         "bedrock-api-key-YmVkcm9jay5hbWF6b25hd3MuY29t",
//!     )?;
//!
//!     let request = ChatRequest::builder()
//!         .model("gpt-3.5-turbo")
//!         .user_message("Hello! Can you tell me about AWS Bedrock?")
//!         .max_tokens(500)
//!         .build();
//!
//!     let response = client.chat_completion(&request).await?;
//!     println!("{}", response.content().unwrap_or("No content"));
//!
//!     Ok(())
//! }
//! ```

#[cfg(feature = "blocking")]
pub mod blocking;
pub mod client;
pub mod config;
pub mod error;
mod internal;
pub mod message;
pub mod model;
pub mod request;
pub mod response;

// Re-export main types
#[cfg(feature = "blocking")]
pub use blocking::BedrockProxyBlocking;
pub use client::BedrockProxy;
pub use config::{BearerToken, ClientConfig};
pub use error::ProxyRequestError;
pub use message::{ChatMessage, ContentPart, ImageDetail, ImageUrl, MessageContent, Role};
pub use model::Model;
pub use request::ChatRequest;
pub use response::{ChatResponse, ModelsResponse};
