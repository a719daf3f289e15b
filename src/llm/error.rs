//! Internal error types for the LLM layer.
//!
//! These never reach the UI. Adapters and the proxy turn them into
//! `LlmResult::Failure` or an HTTP status at their boundary.

use thiserror::Error;

/// Why a chat-completions call produced no usable reply.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// DNS, connect, reset, timeout.
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("response body is not valid JSON: {0}")]
    MalformedBody(String),
    #[error("response has no choices[0].message.content")]
    MissingContent,
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

/// Why a provider could not be set up for a call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("no adapter registered for provider '{0}'")]
    UnknownProvider(String),
    #[error("no API key available for provider '{0}'")]
    MissingCredential(String),
    #[error("no model resolved for provider '{0}'")]
    MissingModel(String),
    #[error("provider '{0}' is already registered")]
    DuplicateProvider(String),
}
