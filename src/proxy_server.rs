//! Remote proxy: `POST /api/chat`.
//!
//! Holds the real provider key server-side and forwards
//! `{ text, instruction, model }` to the upstream chat-completions API,
//! so clients never ship a credential.
//!
//! Responses:
//!   200 { content }  - trimmed assistant reply
//!   400 { error }    - missing field or unparsable body
//!   405 { error }    - anything but POST
//!   502 { error }    - upstream failed or replied with an unusable shape
//!   500 { error }    - server misconfigured (no upstream key)

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::config::ProxyConfig;
use crate::llm::chat_completions::ChatCompletionsClient;
use crate::llm::types::UPSTREAM_FAILURE_MESSAGE;

pub const CHAT_ROUTE: &str = "/api/chat";

const MISSING_FIELDS_MESSAGE: &str = "Missing required fields: text, instruction, model";

#[derive(Debug, Deserialize)]
struct ChatBody {
    text: Option<String>,
    instruction: Option<String>,
    model: Option<String>,
}

/// Shared, read-only server state.
#[derive(Clone)]
pub struct ProxyState {
    client: ChatCompletionsClient,
    api_key: Option<Arc<str>>,
}

impl ProxyState {
    pub fn new(upstream_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: ChatCompletionsClient::new(upstream_url),
            api_key: api_key.filter(|k| !k.is_empty()).map(Arc::from),
        }
    }

    pub fn from_config(config: &ProxyConfig) -> Self {
        Self::new(config.upstream_url.clone(), config.api_key.clone())
    }
}

/// Build the proxy's router.
pub fn app(state: ProxyState) -> axum::Router {
    axum::Router::new()
        .route(CHAT_ROUTE, post(chat).fallback(method_not_allowed))
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: ProxyConfig) -> Result<(), Box<dyn std::error::Error>> {
    log::info!(
        "[PROXY] Upstream key: {}",
        if config.api_key.is_some() { "loaded" } else { "MISSING" }
    );

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    log::info!(
        "[PROXY] Listening on {} → {}",
        listener.local_addr()?,
        config.upstream_url
    );

    axum::serve(listener, app(ProxyState::from_config(&config)))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            log::info!("[PROXY] Shutting down");
        })
        .await?;
    Ok(())
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

async fn method_not_allowed() -> Response {
    error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

async fn chat(State(state): State<ProxyState>, body: Bytes) -> Response {
    let parsed = match serde_json::from_slice::<ChatBody>(&body) {
        Ok(parsed) => parsed,
        Err(e) => {
            log::warn!("[PROXY] Unparsable request body: {}", e);
            return error_response(StatusCode::BAD_REQUEST, MISSING_FIELDS_MESSAGE);
        }
    };

    let present = |field: Option<String>| field.filter(|v| !v.is_empty());
    let (Some(text), Some(instruction), Some(model)) = (
        present(parsed.text),
        present(parsed.instruction),
        present(parsed.model),
    ) else {
        return error_response(StatusCode::BAD_REQUEST, MISSING_FIELDS_MESSAGE);
    };

    let Some(api_key) = state.api_key.as_deref() else {
        log::error!("[PROXY] No upstream API key configured");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error.");
    };

    log::info!("[PROXY] {} chars, model {}", text.len(), model);

    match state
        .client
        .complete(api_key, &model, &instruction, &text)
        .await
    {
        Ok(content) => (StatusCode::OK, Json(json!({ "content": content }))).into_response(),
        Err(e) => {
            log::error!("[PROXY] Upstream error: {}", e);
            error_response(StatusCode::BAD_GATEWAY, UPSTREAM_FAILURE_MESSAGE)
        }
    }
}
