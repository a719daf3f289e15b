//! Proxy mode: send `(text, instruction, model)` to a trusted relay that
//! holds the real provider key, instead of calling a provider directly.
//!
//! Same failure contract as the local router: every failure, including
//! DNS, connect, reset and timeout errors, comes back as
//! `LlmResult::Failure`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::types::{LlmRequest, LlmResult};
use super::LlmBackend;

#[derive(Debug, Serialize)]
struct ProxyRequest<'a> {
    text: &'a str,
    instruction: &'a str,
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct ProxyResponse {
    content: Option<String>,
}

pub struct ProxyRouter {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl ProxyRouter {
    /// `endpoint` is the full URL of the relay's chat route,
    /// e.g. `https://example.vercel.app/api/chat`.
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }

    /// Forward with the model this router was built with.
    pub async fn call(&self, text: &str, instruction: &str) -> LlmResult {
        self.forward(text, instruction, &self.model).await
    }

    async fn forward(&self, text: &str, instruction: &str, model: &str) -> LlmResult {
        log::info!(
            "[PROXY] Forwarding {} chars to {} (model {})",
            text.len(),
            self.endpoint,
            model
        );

        let response = match self
            .client
            .post(&self.endpoint)
            .json(&ProxyRequest {
                text,
                instruction,
                model,
            })
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                log::error!("[PROXY] Request to relay failed: {}", e);
                return LlmResult::upstream_failed();
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                log::error!("[PROXY] Failed to read relay response: {}", e);
                return LlmResult::upstream_failed();
            }
        };

        if !status.is_success() {
            log::error!("[PROXY] Relay returned {}: {}", status, body);
            return LlmResult::upstream_failed();
        }

        match serde_json::from_str::<ProxyResponse>(&body) {
            Ok(ProxyResponse {
                content: Some(content),
            }) => LlmResult::success(content),
            Ok(_) => {
                log::error!("[PROXY] Relay response has no content: {}", body);
                LlmResult::upstream_failed()
            }
            Err(e) => {
                log::error!("[PROXY] Relay response is not JSON: {}", e);
                LlmResult::upstream_failed()
            }
        }
    }
}

#[async_trait]
impl LlmBackend for ProxyRouter {
    async fn complete(&self, text: &str, instruction: &str) -> LlmResult {
        self.call(text, instruction).await
    }

    /// The relay picks the upstream, so `provider_id` is ignored; an
    /// explicit model is passed through.
    async fn complete_request(&self, request: &LlmRequest) -> LlmResult {
        let model = request.model.as_deref().unwrap_or(&self.model);
        self.forward(&request.text, &request.instruction, model).await
    }
}
