//! Startup configuration from `.env` files and environment variables.
//!
//! Read once at startup. Nothing here is persisted.
//!
//! Assistant:
//!   LLM_PROVIDER                   - default provider id (openrouter)
//!   LLM_MODEL                      - model override for the default provider
//!   READING_ASSISTANT_PROXY_URL    - use proxy mode against this relay URL
//!   READING_ASSISTANT_PROXY_MODEL  - model sent in proxy mode
//!
//! Proxy server:
//!   PROXY_BIND                     - listen address (127.0.0.1:3000)
//!   PROXY_UPSTREAM_URL             - chat-completions root (OpenRouter)
//!   OPENROUTER_API_KEY             - upstream credential

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::credentials::CredentialSource;
use crate::llm::provider::{self, DEFAULT_PROVIDER};
use crate::llm::{LlmBackend, ProxyRouter, Router};

pub const DEFAULT_PROXY_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_UPSTREAM_URL: &str = "https://openrouter.ai/api/v1";
pub const PROXY_API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Load `.env.local`, else `.env`, from `dir`. First file found wins.
///
/// Runs before the logger is initialized (so `RUST_LOG` can come from the
/// file), hence `eprintln!`. Returns the file that was loaded.
pub fn load_env_files(dir: &Path) -> Option<PathBuf> {
    for env_file in [".env.local", ".env"] {
        let path = dir.join(env_file);
        if path.exists() {
            return match dotenvy::from_path(&path) {
                Ok(_) => {
                    eprintln!("[STARTUP] Loaded {}", path.display());
                    Some(path)
                }
                Err(e) => {
                    eprintln!("[STARTUP] Failed to load {}: {}", path.display(), e);
                    None
                }
            };
        }
    }
    None
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Background-side settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantConfig {
    pub default_provider: String,
    pub model_override: Option<String>,
    pub proxy_url: Option<String>,
    pub proxy_model: Option<String>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            default_provider: DEFAULT_PROVIDER.to_string(),
            model_override: None,
            proxy_url: None,
            proxy_model: None,
        }
    }
}

impl AssistantConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let default_provider = match lookup("LLM_PROVIDER") {
            Some(p) => {
                let p = p.trim().to_lowercase();
                if provider::get_provider(&p).is_some() {
                    log::info!("[SETTINGS] Provider override: {}", p);
                    p
                } else {
                    log::warn!("[SETTINGS] Unknown LLM_PROVIDER '{}', using {}", p, DEFAULT_PROVIDER);
                    DEFAULT_PROVIDER.to_string()
                }
            }
            None => DEFAULT_PROVIDER.to_string(),
        };

        Self {
            default_provider,
            model_override: lookup("LLM_MODEL"),
            proxy_url: lookup("READING_ASSISTANT_PROXY_URL"),
            proxy_model: lookup("READING_ASSISTANT_PROXY_MODEL"),
        }
    }

    pub fn is_proxy_mode(&self) -> bool {
        self.proxy_url.is_some()
    }

    /// Model sent to the relay in proxy mode.
    pub fn resolved_proxy_model(&self) -> String {
        self.proxy_model
            .clone()
            .or_else(|| self.model_override.clone())
            .or_else(|| provider::get_provider(&self.default_provider).map(|p| p.default_model))
            .unwrap_or_default()
    }

    /// Local router or proxy router, depending on configuration.
    pub fn build_backend(&self, credentials: Arc<dyn CredentialSource>) -> Arc<dyn LlmBackend> {
        if let Some(url) = &self.proxy_url {
            log::info!("[STARTUP] Proxy mode via {}", url);
            return Arc::new(ProxyRouter::new(url.clone(), self.resolved_proxy_model()));
        }

        let mut router = Router::with_default_adapters(credentials)
            .with_default_provider(self.default_provider.clone());
        if let Some(model) = &self.model_override {
            router = router.with_model_override(self.default_provider.clone(), model.clone());
        }
        log::info!("[STARTUP] Local mode, default provider {}", self.default_provider);
        Arc::new(router)
    }
}

/// A startup setting that could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("invalid setting {name}: {reason}")]
    Invalid { name: String, reason: String },
}

/// Remote proxy server settings.
#[derive(Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub bind: SocketAddr,
    pub upstream_url: String,
    pub api_key: Option<String>,
}

impl std::fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("bind", &self.bind)
            .field("upstream_url", &self.upstream_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<loaded>"))
            .finish()
    }
}

impl ProxyConfig {
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_raw = lookup("PROXY_BIND").unwrap_or_else(|| DEFAULT_PROXY_BIND.to_string());
        let bind = bind_raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| SettingsError::Invalid {
                name: "PROXY_BIND".to_string(),
                reason: format!("'{}' is not a socket address: {}", bind_raw, e),
            })?;

        Ok(Self {
            bind,
            upstream_url: lookup("PROXY_UPSTREAM_URL")
                .unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string()),
            api_key: lookup(PROXY_API_KEY_ENV),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn env_local_wins_over_env() {
        let dir = std::env::temp_dir().join(format!("reading-assistant-env-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(".env.local"), "READING_ASSISTANT_TEST_LOCAL=local\n").unwrap();
        std::fs::write(dir.join(".env"), "READING_ASSISTANT_TEST_PLAIN=plain\n").unwrap();

        let loaded = load_env_files(&dir);

        assert_eq!(loaded, Some(dir.join(".env.local")));
        assert_eq!(
            std::env::var("READING_ASSISTANT_TEST_LOCAL").as_deref(),
            Ok("local")
        );
        assert!(std::env::var("READING_ASSISTANT_TEST_PLAIN").is_err());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn no_env_file_loads_nothing() {
        let dir = std::env::temp_dir().join("reading-assistant-env-missing");
        assert_eq!(load_env_files(&dir), None);
    }

    #[test]
    fn defaults_to_openrouter_local_mode() {
        let config = AssistantConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, AssistantConfig::default());
        assert!(!config.is_proxy_mode());
        assert_eq!(
            config.resolved_proxy_model(),
            "deepseek/deepseek-chat-v3-0324:free"
        );
    }

    #[test]
    fn provider_override_is_normalized_and_validated() {
        let config = AssistantConfig::from_lookup(lookup_from(&[("LLM_PROVIDER", " Groq ")]));
        assert_eq!(config.default_provider, "groq");

        let config = AssistantConfig::from_lookup(lookup_from(&[("LLM_PROVIDER", "mystery")]));
        assert_eq!(config.default_provider, DEFAULT_PROVIDER);
    }

    #[test]
    fn proxy_model_prefers_explicit_setting() {
        let config = AssistantConfig::from_lookup(lookup_from(&[
            ("READING_ASSISTANT_PROXY_URL", "https://relay.example/api/chat"),
            ("READING_ASSISTANT_PROXY_MODEL", "gpt-4o"),
            ("LLM_MODEL", "ignored"),
        ]));
        assert!(config.is_proxy_mode());
        assert_eq!(config.resolved_proxy_model(), "gpt-4o");
    }

    #[test]
    fn proxy_config_defaults_and_rejects_bad_bind() {
        let config = ProxyConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.bind.to_string(), DEFAULT_PROXY_BIND);
        assert_eq!(config.upstream_url, DEFAULT_UPSTREAM_URL);
        assert_eq!(config.api_key, None);

        let err = ProxyConfig::from_lookup(lookup_from(&[("PROXY_BIND", "nowhere")])).unwrap_err();
        assert!(err.to_string().starts_with("invalid setting PROXY_BIND: 'nowhere'"));
        assert!(matches!(err, SettingsError::Invalid { name, .. } if name == "PROXY_BIND"));
    }

    #[test]
    fn proxy_config_debug_hides_key() {
        let config =
            ProxyConfig::from_lookup(lookup_from(&[(PROXY_API_KEY_ENV, "sk-or-secret")])).unwrap();
        assert!(!format!("{:?}", config).contains("sk-or-secret"));
    }
}
