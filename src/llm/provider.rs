//! Provider registry: static metadata for every known LLM backend.
//!
//! Pure data. Adapters live in adapter.rs; the router decides which
//! descriptor backs which adapter.

use serde::{Deserialize, Serialize};

use crate::credentials::CredentialSource;

/// Provider used when the caller does not pick one.
pub const DEFAULT_PROVIDER: &str = "openrouter";

/// Provider metadata exposed to the CLI and settings listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDescriptor {
    pub id: String,
    pub display_name: String,
    pub description: String,
    pub default_model: String,
    /// Environment variable holding this provider's API key.
    pub env_key: String,
    /// OpenAI-compatible API root (chat completions live under it).
    pub base_url: String,
}

/// All known providers, in display order.
pub fn all_providers() -> Vec<ProviderDescriptor> {
    vec![
        ProviderDescriptor {
            id: "openrouter".to_string(),
            display_name: "OpenRouter".to_string(),
            description: "Fast, multi-model access (e.g. DeepSeek, GPT-4o)".to_string(),
            default_model: "deepseek/deepseek-chat-v3-0324:free".to_string(),
            env_key: "OPENROUTER_API_KEY".to_string(),
            base_url: "https://openrouter.ai/api/v1".to_string(),
        },
        ProviderDescriptor {
            id: "groq".to_string(),
            display_name: "Groq".to_string(),
            description: "Ultra-fast open models like LLaMA3".to_string(),
            default_model: "llama3-70b-8192".to_string(),
            env_key: "GROQ_API_KEY".to_string(),
            base_url: "https://api.groq.com/openai/v1".to_string(),
        },
        ProviderDescriptor {
            id: "together".to_string(),
            display_name: "Together.ai".to_string(),
            description: "Affordable access to open-source models".to_string(),
            default_model: "mistralai/Mixtral-8x7B-Instruct-v0.1".to_string(),
            env_key: "TOGETHER_API_KEY".to_string(),
            base_url: "https://api.together.xyz/v1".to_string(),
        },
    ]
}

/// Look up a provider by id.
pub fn get_provider(provider_id: &str) -> Option<ProviderDescriptor> {
    all_providers().into_iter().find(|p| p.id == provider_id)
}

/// Id of the provider used when none is chosen.
pub fn default_provider() -> &'static str {
    DEFAULT_PROVIDER
}

/// Check if a provider has an API key available from the given source.
pub fn is_provider_configured(provider_id: &str, credentials: &dyn CredentialSource) -> bool {
    credentials
        .api_key(provider_id)
        .map(|k| !k.is_empty())
        .unwrap_or(false)
}
