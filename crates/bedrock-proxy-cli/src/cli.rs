use bedrock_proxy_ox::{
    ClientConfig, Model, ProxyRequestError,
    config::{BASE_URL_ENV, DEFAULT_BASE_URL, TOKEN_ENV},
    request::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE},
};
use clap::{Args, Parser, Subcommand};
use std::{path::PathBuf, time::Duration};
use thiserror::Error;

/// Talk to an OpenAI-compatible proxy in front of AWS Bedrock
#[derive(Debug, Parser)]
#[command(name = "bedrock-proxy", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Base URL of the deployed proxy (e.g. https://openai.ez2.click/dev)
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL, global = true)]
    pub base_url: String,

    /// Bedrock API token, `bedrock-api-key-<base64>`
    #[arg(long, env = TOKEN_ENV, hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Use the blocking client instead of the async one
    #[arg(long, global = true)]
    pub blocking: bool,

    /// Chat completion timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30, global = true)]
    pub timeout: u64,

    /// Model listing timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 10, global = true)]
    pub models_timeout: u64,

    /// Log request/response details (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the models the proxy exposes
    Models,
    /// Send one chat completion
    Chat(ChatArgs),
    /// Run the guided walkthrough (default)
    Demo,
}

#[derive(Debug, Args)]
pub struct ChatArgs {
    /// User prompt
    pub prompt: String,

    /// Model name; the proxy maps it onto a Bedrock model
    #[arg(short, long, default_value_t = Model::default().to_string())]
    pub model: String,

    /// Sampling temperature
    #[arg(short, long, default_value_t = DEFAULT_TEMPERATURE)]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,

    /// Optional system prompt sent before the user message
    #[arg(short, long)]
    pub system: Option<String>,

    /// Attach an image file, inlined as base64
    #[arg(short, long, value_name = "PATH")]
    pub image: Option<PathBuf>,

    /// Set `stream: true` in the request body
    #[arg(long)]
    pub stream: bool,
}

/// Why a client could not be configured
#[derive(Debug, Error)]
pub enum SetupError {
    /// No token at all
    #[error("Please set your Bedrock API token in the {} environment variable", TOKEN_ENV)]
    MissingToken,
    /// The sample token from the setup instructions was left in place
    #[error("The {} value is the sample token; replace it with your own", TOKEN_ENV)]
    PlaceholderToken,
    /// Anything the library rejected, such as a malformed base URL
    #[error(transparent)]
    Invalid(#[from] ProxyRequestError),
}

impl SetupError {
    /// Token problems come with instructions for obtaining one
    pub fn is_token_problem(&self) -> bool {
        matches!(self, Self::MissingToken | Self::PlaceholderToken)
    }
}

impl Cli {
    /// Validate the flags/environment into a client configuration
    pub fn client_config(&self) -> Result<ClientConfig, SetupError> {
        let token = self
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(SetupError::MissingToken)?;

        let config = ClientConfig::new(self.base_url.as_str(), token)?
            .with_chat_timeout(Duration::from_secs(self.timeout))
            .with_models_timeout(Duration::from_secs(self.models_timeout));

        if config.token().is_placeholder() {
            return Err(SetupError::PlaceholderToken);
        }
        Ok(config)
    }
}
