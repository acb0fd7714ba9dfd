use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use strum::Display;

/// The role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    /// System message (instructions to the model)
    System,
    /// User message (human input)
    User,
    /// Assistant message (model output fed back as history)
    Assistant,
}

/// Requested fidelity for an image part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageDetail {
    Auto,
    Low,
    High,
}

/// Location of an image, either a remote URL or a `data:` URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<ImageDetail>,
}

/// One part of a multi-part message body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Plain text
    Text { text: String },
    /// An image referenced by URL
    ImageUrl { image_url: ImageUrl },
}

impl ContentPart {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create an image part pointing at a remote URL
    pub fn image_url(url: impl Into<String>) -> Self {
        Self::ImageUrl {
            image_url: ImageUrl {
                url: url.into(),
                detail: None,
            },
        }
    }

    /// Create an image part with the bytes inlined as a base64 `data:` URL
    ///
    /// ```
    /// use bedrock_proxy_ox::ContentPart;
    ///
    /// let part = ContentPart::image_base64("image/png", [0x89, b'P', b'N', b'G']);
    /// assert!(matches!(
    ///     part,
    ///     ContentPart::ImageUrl { ref image_url } if image_url.url == "data:image/png;base64,iVBORw=="
    /// ));
    /// ```
    pub fn image_base64(mime_type: &str, data: impl AsRef<[u8]>) -> Self {
        let encoded = STANDARD.encode(data);
        Self::image_url(format!("data:{mime_type};base64,{encoded}"))
    }

    /// Set the detail level on an image part; text parts are returned unchanged
    #[must_use]
    pub fn with_detail(self, detail: ImageDetail) -> Self {
        match self {
            Self::ImageUrl { image_url } => Self::ImageUrl {
                image_url: ImageUrl {
                    detail: Some(detail),
                    ..image_url
                },
            },
            text @ Self::Text { .. } => text,
        }
    }
}

/// Message body: a bare string or an ordered list of parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// The text of a plain message, or the first text part of a multi-part one
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Parts(parts) => parts.iter().find_map(|part| match part {
                ContentPart::Text { text } => Some(text.as_str()),
                ContentPart::ImageUrl { .. } => None,
            }),
        }
    }
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<ContentPart>> for MessageContent {
    fn from(parts: Vec<ContentPart>) -> Self {
        Self::Parts(parts)
    }
}

/// A message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The role of the message sender
    pub role: Role,

    /// The content of the message
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<MessageContent>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user message
    pub fn user(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::Assistant, content)
    }
}
