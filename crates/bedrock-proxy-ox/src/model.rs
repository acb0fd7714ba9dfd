use serde::{Deserialize, Serialize};
use std::fmt;

/// Model names the proxy is known to map onto Bedrock models
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Model {
    #[serde(rename = "gpt-3.5-turbo")]
    Gpt3_5Turbo,

    #[serde(rename = "gpt-4")]
    Gpt4,

    #[serde(rename = "claude-3-sonnet")]
    Claude3Sonnet,

    /// Any other name; the proxy decides whether it is mapped
    #[serde(untagged)]
    Custom(String),
}

impl Model {
    /// Get the wire name of the model
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gpt3_5Turbo => "gpt-3.5-turbo",
            Model::Gpt4 => "gpt-4",
            Model::Claude3Sonnet => "claude-3-sonnet",
            Model::Custom(s) => s,
        }
    }

    /// Whether the proxy accepts image parts for this model
    pub fn supports_vision(&self) -> bool {
        matches!(self, Model::Claude3Sonnet)
    }
}

impl Default for Model {
    fn default() -> Self {
        Model::Gpt3_5Turbo
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Model {
    fn from(s: String) -> Self {
        match s.as_str() {
            "gpt-3.5-turbo" => Model::Gpt3_5Turbo,
            "gpt-4" => Model::Gpt4,
            "claude-3-sonnet" => Model::Claude3Sonnet,
            _ => Model::Custom(s),
        }
    }
}

impl From<&str> for Model {
    fn from(s: &str) -> Self {
        Model::from(s.to_string())
    }
}

impl From<Model> for String {
    fn from(model: Model) -> Self {
        match model {
            Model::Custom(s) => s,
            other => other.as_str().to_string(),
        }
    }
}
