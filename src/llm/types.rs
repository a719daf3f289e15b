//! LLM request/result types shared by adapters, router and dispatcher.

use serde::{Deserialize, Serialize};

/// Shown when a provider call fails or returns nothing usable.
pub const UPSTREAM_FAILURE_MESSAGE: &str = "LLM request failed or returned no response.";

/// Shown when the router cannot find or configure the requested provider.
pub const PROVIDER_UNAVAILABLE_MESSAGE: &str =
    "Selected LLM provider is unavailable or misconfigured.";

/// One request to a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmRequest {
    pub text: String,
    pub instruction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl LlmRequest {
    pub fn new(text: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            instruction: instruction.into(),
            provider_id: None,
            model: None,
        }
    }

    pub fn with_provider(mut self, provider_id: impl Into<String>) -> Self {
        self.provider_id = Some(provider_id.into());
        self
    }

    /// Explicit model; wins over the provider's configured one.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Outcome of an LLM call.
///
/// Failures carry user-facing text. Callers render both variants the
/// same way but can still tell them apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum LlmResult {
    Success { content: String },
    Failure { message: String },
}

impl LlmResult {
    pub fn success(content: impl Into<String>) -> Self {
        Self::Success {
            content: content.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    /// The generic upstream failure.
    pub fn upstream_failed() -> Self {
        Self::failure(UPSTREAM_FAILURE_MESSAGE)
    }

    pub fn provider_unavailable() -> Self {
        Self::failure(PROVIDER_UNAVAILABLE_MESSAGE)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Text to put in front of the user, whichever variant this is.
    pub fn display_text(&self) -> &str {
        match self {
            Self::Success { content } => content,
            Self::Failure { message } => message,
        }
    }
}

/// Per-provider configuration, created once by the router.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderSession {
    pub api_key: String,
    pub model: String,
}

impl std::fmt::Debug for ProviderSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSession")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}
