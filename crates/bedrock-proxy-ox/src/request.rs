use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::{ChatMessage, ContentPart, Model, ProxyRequestError};

/// Sampling temperature used when the caller does not pick one
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Completion budget used when the caller does not pick one
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Request for chat completion
///
/// All five fields are always serialized; `temperature` and `max_tokens`
/// are passed through unchecked, the proxy is the authority on their range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(builder_type(vis = "pub"), state_mod(vis = "pub"))]
pub struct ChatRequest {
    /// List of messages in the conversation
    #[builder(field)]
    pub messages: Vec<ChatMessage>,

    /// The model to use for completion
    #[builder(default = Model::default().to_string(), into)]
    pub model: String,

    /// Sampling temperature
    #[builder(default = DEFAULT_TEMPERATURE)]
    pub temperature: f32,

    /// Maximum number of tokens to generate
    #[builder(default = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,

    /// Ask the proxy to stream; the flag is forwarded as-is
    #[builder(default)]
    pub stream: bool,
}

impl ChatRequest {
    /// Create a request with default sampling parameters
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            stream: false,
        }
    }

    /// Reject requests the proxy could never answer
    ///
    /// # Errors
    ///
    /// Returns [`ProxyRequestError::InvalidRequest`] when there are no messages.
    pub fn validate(&self) -> Result<(), ProxyRequestError> {
        if self.messages.is_empty() {
            return Err(ProxyRequestError::InvalidRequest(
                "messages must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// Builder extensions for convenience methods
impl<S: chat_request_builder::State> ChatRequestBuilder<S> {
    /// Add a user message
    pub fn user_message(mut self, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage::user(content.into()));
        self
    }

    /// Add an assistant message
    pub fn assistant_message(mut self, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage::assistant(content.into()));
        self
    }

    /// Add a system message
    pub fn system_message(mut self, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage::system(content.into()));
        self
    }

    /// Add a multi-part user message (text and images)
    pub fn user_parts(mut self, parts: Vec<ContentPart>) -> Self {
        self.messages.push(ChatMessage::user(parts));
        self
    }

    /// Add a message
    pub fn message(mut self, message: ChatMessage) -> Self {
        self.messages.push(message);
        self
    }

    /// Append several messages, keeping their order
    pub fn messages(mut self, messages: impl IntoIterator<Item = ChatMessage>) -> Self {
        self.messages.extend(messages);
        self
    }
}
