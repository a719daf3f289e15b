//! API key resolution.
//!
//! The router never reads the environment directly. It asks a
//! `CredentialSource`, so tests can hand it fake keys without touching
//! process-wide state.
//!
//! Lookup order for the real source:
//! 1. Provider env var (e.g. OPENROUTER_API_KEY)
//! 2. OS keychain entry (service "reading-assistant", user = provider id)

use std::collections::HashMap;

use crate::llm::provider;

/// Keychain service name for stored API keys.
pub const KEYCHAIN_SERVICE: &str = "reading-assistant";

/// Anything that can hand out an API key for a provider id.
pub trait CredentialSource: Send + Sync {
    fn api_key(&self, provider_id: &str) -> Option<String>;
}

/// Environment + OS keychain.
#[derive(Debug, Default, Clone)]
pub struct EnvCredentials;

impl CredentialSource for EnvCredentials {
    fn api_key(&self, provider_id: &str) -> Option<String> {
        let descriptor = provider::get_provider(provider_id)?;

        if let Ok(key) = std::env::var(&descriptor.env_key) {
            if !key.is_empty() {
                return Some(key);
            }
        }

        match keyring::Entry::new(KEYCHAIN_SERVICE, provider_id) {
            Ok(entry) => match entry.get_password() {
                Ok(key) if !key.is_empty() => {
                    log::info!("[SETTINGS] Loaded {} key from OS keychain", provider_id);
                    Some(key)
                }
                _ => None,
            },
            Err(e) => {
                log::debug!("[SETTINGS] Keychain unavailable for {}: {}", provider_id, e);
                None
            }
        }
    }
}

/// Save an API key to the OS keychain.
pub fn save_api_key(provider_id: &str, api_key: &str) -> Result<(), String> {
    if provider::get_provider(provider_id).is_none() {
        return Err(format!("Unknown provider: {}", provider_id));
    }
    let entry = keyring::Entry::new(KEYCHAIN_SERVICE, provider_id)
        .map_err(|e| format!("Keyring error: {}", e))?;
    entry
        .set_password(api_key)
        .map_err(|e| format!("Failed to save key: {}", e))?;

    log::info!("[SETTINGS] API key saved for provider: {}", provider_id);
    Ok(())
}

/// Fixed in-memory keys. Used by tests and by callers that already
/// hold their credentials.
#[derive(Debug, Default, Clone)]
pub struct StaticCredentials {
    keys: HashMap<String, String>,
}

impl StaticCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, provider_id: &str, api_key: &str) -> Self {
        self.keys
            .insert(provider_id.to_string(), api_key.to_string());
        self
    }
}

impl CredentialSource for StaticCredentials {
    fn api_key(&self, provider_id: &str) -> Option<String> {
        self.keys.get(provider_id).cloned()
    }
}
