//! Router: picks an adapter by provider id and forwards the call.
//!
//! Adapters are registered explicitly at startup. Each one is configured
//! lazily, exactly once, the first time it is called: the model comes from
//! the registry (or an override) and the API key from the injected
//! `CredentialSource`. Anything that stops a provider from being used turns
//! into `LlmResult::Failure` before any HTTP request is made.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use super::adapter::{self, ProviderAdapter};
use super::error::ConfigError;
use super::provider::{self, ProviderDescriptor};
use super::types::{LlmRequest, LlmResult, ProviderSession};
use super::LlmBackend;
use crate::credentials::CredentialSource;

/// An adapter before and after its one-time configuration.
enum AdapterSlot {
    Unconfigured(Box<dyn ProviderAdapter>),
    Ready(Arc<dyn ProviderAdapter>),
}

pub struct Router {
    default_provider: String,
    model_overrides: HashMap<String, String>,
    credentials: Arc<dyn CredentialSource>,
    adapters: Mutex<HashMap<String, AdapterSlot>>,
}

impl Router {
    /// Empty router. Register adapters before calling.
    pub fn new(credentials: Arc<dyn CredentialSource>) -> Self {
        Self {
            default_provider: provider::default_provider().to_string(),
            model_overrides: HashMap::new(),
            credentials,
            adapters: Mutex::new(HashMap::new()),
        }
    }

    /// Router with one chat-completions adapter per known provider.
    pub fn with_default_adapters(credentials: Arc<dyn CredentialSource>) -> Self {
        let router = Self::new(credentials);
        for adapter in adapter::default_adapters() {
            // Registry ids are unique, so this cannot collide.
            if let Err(e) = router.register(adapter) {
                log::warn!("[ROUTER] {}", e);
            }
        }
        router
    }

    pub fn with_default_provider(mut self, provider_id: impl Into<String>) -> Self {
        self.default_provider = provider_id.into();
        self
    }

    /// Use `model` instead of the registry default for `provider_id`.
    pub fn with_model_override(
        mut self,
        provider_id: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        self.model_overrides.insert(provider_id.into(), model.into());
        self
    }

    pub fn register<A>(&self, adapter: A) -> Result<(), ConfigError>
    where
        A: ProviderAdapter + 'static,
    {
        self.register_boxed(Box::new(adapter))
    }

    pub fn register_boxed(&self, adapter: Box<dyn ProviderAdapter>) -> Result<(), ConfigError> {
        let provider_id = adapter.provider_id().trim().to_string();
        let mut adapters = self.lock_adapters();
        if adapters.contains_key(&provider_id) {
            return Err(ConfigError::DuplicateProvider(provider_id));
        }
        log::debug!("[ROUTER] Registered adapter for {}", provider_id);
        adapters.insert(provider_id, AdapterSlot::Unconfigured(adapter));
        Ok(())
    }

    pub fn default_provider(&self) -> &str {
        &self.default_provider
    }

    /// Registry entries for the registered providers, in registry order.
    pub fn providers(&self) -> Vec<ProviderDescriptor> {
        let adapters = self.lock_adapters();
        provider::all_providers()
            .into_iter()
            .filter(|p| adapters.contains_key(&p.id))
            .collect()
    }

    /// Whether `provider_id` has already been configured.
    pub fn is_ready(&self, provider_id: &str) -> bool {
        matches!(
            self.lock_adapters().get(provider_id),
            Some(AdapterSlot::Ready(_))
        )
    }

    /// Call a provider (the default one when `provider_id` is `None`)
    /// with its configured model.
    pub async fn call(
        &self,
        text: &str,
        instruction: &str,
        provider_id: Option<&str>,
    ) -> LlmResult {
        self.route(text, instruction, provider_id, None).await
    }

    async fn route(
        &self,
        text: &str,
        instruction: &str,
        provider_id: Option<&str>,
        model: Option<&str>,
    ) -> LlmResult {
        let provider_id = provider_id.unwrap_or(&self.default_provider);

        let adapter = match self.ready_adapter(provider_id).await {
            Ok(adapter) => adapter,
            Err(e) => {
                log::warn!("[ROUTER] {}", e);
                return LlmResult::provider_unavailable();
            }
        };

        adapter.call(text, instruction, model).await
    }

    /// Return the configured adapter for `provider_id`, configuring it now
    /// if this is its first use.
    ///
    /// The credential lookup may hit the OS keychain, so it runs on the
    /// blocking pool with the lock released. `configure` itself happens
    /// under the lock, so it still runs at most once per adapter.
    async fn ready_adapter(
        &self,
        provider_id: &str,
    ) -> Result<Arc<dyn ProviderAdapter>, ConfigError> {
        {
            let adapters = self.lock_adapters();
            match adapters.get(provider_id) {
                Some(AdapterSlot::Ready(adapter)) => return Ok(Arc::clone(adapter)),
                Some(AdapterSlot::Unconfigured(_)) => {}
                None => return Err(ConfigError::UnknownProvider(provider_id.to_string())),
            }
        }

        let session = self.resolve_session(provider_id).await?;

        let mut adapters = self.lock_adapters();
        let slot = adapters
            .remove(provider_id)
            .ok_or_else(|| ConfigError::UnknownProvider(provider_id.to_string()))?;

        let adapter: Arc<dyn ProviderAdapter> = match slot {
            AdapterSlot::Ready(adapter) => adapter,
            AdapterSlot::Unconfigured(mut adapter) => {
                adapter.configure(session);
                log::info!("[ROUTER] Provider {} ready", provider_id);
                Arc::from(adapter)
            }
        };
        adapters.insert(provider_id.to_string(), AdapterSlot::Ready(Arc::clone(&adapter)));
        Ok(adapter)
    }

    async fn resolve_session(&self, provider_id: &str) -> Result<ProviderSession, ConfigError> {
        let model = self
            .model_overrides
            .get(provider_id)
            .cloned()
            .or_else(|| provider::get_provider(provider_id).map(|p| p.default_model))
            .filter(|m| !m.is_empty())
            .ok_or_else(|| ConfigError::MissingModel(provider_id.to_string()))?;

        let credentials = Arc::clone(&self.credentials);
        let id = provider_id.to_string();
        let api_key = tokio::task::spawn_blocking(move || credentials.api_key(&id))
            .await
            .unwrap_or_else(|e| {
                log::error!("[ROUTER] Credential lookup for {} failed: {}", provider_id, e);
                None
            })
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ConfigError::MissingCredential(provider_id.to_string()))?;

        Ok(ProviderSession { api_key, model })
    }

    fn lock_adapters(&self) -> std::sync::MutexGuard<'_, HashMap<String, AdapterSlot>> {
        self.adapters.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl LlmBackend for Router {
    async fn complete(&self, text: &str, instruction: &str) -> LlmResult {
        self.call(text, instruction, None).await
    }

    async fn complete_request(&self, request: &LlmRequest) -> LlmResult {
        self.route(
            &request.text,
            &request.instruction,
            request.provider_id.as_deref(),
            request.model.as_deref(),
        )
        .await
    }
}
