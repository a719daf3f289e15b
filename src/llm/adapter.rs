//! Provider adapter: the capability contract every backend implements.
//!
//! The router configures an adapter once (credential + model) and then
//! calls it any number of times. `call` never panics and never returns
//! an error type: every failure is already user-facing text.

use async_trait::async_trait;

use super::chat_completions::ChatCompletionsClient;
use super::provider::{self, ProviderDescriptor};
use super::types::{LlmResult, ProviderSession};

#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Registry id this adapter serves.
    fn provider_id(&self) -> &str;

    /// Store credential + model for later calls. Calling again replaces them.
    fn configure(&mut self, session: ProviderSession);

    /// Run one instruction against the selected text. `model` overrides
    /// the configured model for this call only.
    async fn call(&self, text: &str, instruction: &str, model: Option<&str>) -> LlmResult;
}

/// Adapter for any OpenAI-compatible chat-completions backend
/// (OpenRouter, Groq, Together).
pub struct ChatCompletionsAdapter {
    provider_id: String,
    client: ChatCompletionsClient,
    session: Option<ProviderSession>,
}

impl ChatCompletionsAdapter {
    pub fn new(provider_id: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            client: ChatCompletionsClient::new(base_url),
            session: None,
        }
    }

    pub fn for_provider(descriptor: &ProviderDescriptor) -> Self {
        Self::new(descriptor.id.clone(), descriptor.base_url.clone())
    }

    pub fn is_configured(&self) -> bool {
        self.session.is_some()
    }
}

#[async_trait]
impl ProviderAdapter for ChatCompletionsAdapter {
    fn provider_id(&self) -> &str {
        &self.provider_id
    }

    fn configure(&mut self, session: ProviderSession) {
        log::info!(
            "[LLM] Configured {} with model {}",
            self.provider_id,
            session.model
        );
        self.session = Some(session);
    }

    async fn call(&self, text: &str, instruction: &str, model: Option<&str>) -> LlmResult {
        let Some(session) = &self.session else {
            log::error!("[LLM] {} called before configure", self.provider_id);
            return LlmResult::upstream_failed();
        };
        let model = model.unwrap_or(&session.model);

        log::info!(
            "[LLM] Provider: {}, model: {}, text length: {}",
            self.provider_id,
            model,
            text.len()
        );

        match self
            .client
            .complete(&session.api_key, model, instruction, text)
            .await
        {
            Ok(content) => LlmResult::success(content),
            Err(e) => {
                log::error!("[LLM] {} API error: {}", self.provider_id, e);
                LlmResult::upstream_failed()
            }
        }
    }
}

/// One adapter per known provider, ready for registration.
pub fn default_adapters() -> Vec<ChatCompletionsAdapter> {
    provider::all_providers()
        .iter()
        .map(ChatCompletionsAdapter::for_provider)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn call_before_configure_is_a_failure() {
        let adapter = ChatCompletionsAdapter::new("openrouter", "http://127.0.0.1:9");
        let result = adapter
            .call("text", "Explain this text in simple terms.", None)
            .await;
        assert_eq!(result, LlmResult::upstream_failed());
    }

    #[test]
    fn default_adapters_cover_every_provider() {
        let ids: Vec<String> = default_adapters()
            .iter()
            .map(|a| a.provider_id().to_string())
            .collect();
        assert_eq!(ids, vec!["openrouter", "groq", "together"]);
        assert!(default_adapters().iter().all(|a| !a.is_configured()));
    }
}
