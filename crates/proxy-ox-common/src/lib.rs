#![cfg_attr(not(test), deny(unsafe_code))]
#![warn(
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::missing_docs_in_private_items
)]

//! Shared HTTP plumbing for the bedrock-proxy client crates
//!
//! Endpoint description, authentication, URL joining and the mapping of an
//! HTTP exchange onto [`CommonRequestError`] live here so the async and the
//! blocking clients behave identically.

#[cfg(feature = "blocking")]
pub mod blocking;
pub mod error;
pub mod request_builder;

pub use error::{CommonRequestError, api_message_from_body};
pub use request_builder::{AuthMethod, Endpoint, HttpMethod, RequestBuilder, RequestConfig};
