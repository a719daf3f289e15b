//! LLM domain: provider registry, adapters, routing.
//!
//! Public API for everything that talks to a model.
//! The dispatcher only sees `LlmBackend`; whether that is the local
//! `Router` or the `ProxyRouter` is decided at startup.
//!
//! Modules:
//!   - provider.rs          - registry of known providers
//!   - adapter.rs           - adapter trait + chat-completions adapter
//!   - chat_completions.rs  - OpenAI-compatible wire client
//!   - router.rs            - provider selection + one-time configuration
//!   - proxy_router.rs      - relay client for proxy mode

pub mod adapter;
pub mod chat_completions;
pub mod error;
pub mod prompts;
pub mod provider;
pub mod proxy_router;
pub mod router;
pub mod types;

pub use adapter::{ChatCompletionsAdapter, ProviderAdapter};
pub use proxy_router::ProxyRouter;
pub use router::Router;
pub use types::{LlmRequest, LlmResult, ProviderSession};

use async_trait::async_trait;

/// Something that can run an instruction against selected text.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    async fn complete(&self, text: &str, instruction: &str) -> LlmResult;

    /// Run a full request. The default ignores provider and model hints;
    /// backends that can honour them override this.
    async fn complete_request(&self, request: &LlmRequest) -> LlmResult {
        self.complete(&request.text, &request.instruction).await
    }
}
