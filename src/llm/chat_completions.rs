//! OpenAI-compatible chat-completions client.
//!
//! Shared by the local adapters and the remote proxy. Knows the wire
//! format only; turning errors into user-facing text is the caller's job.

use serde::{Deserialize, Serialize};

use super::error::UpstreamError;
use super::prompts::{self, SYSTEM_PROMPT};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatMessage>,
}

/// Client for one `<base_url>/chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct ChatCompletionsClient {
    client: reqwest::Client,
    base_url: String,
}

impl ChatCompletionsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn endpoint_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Send one instruction + text pair and return the trimmed reply.
    pub async fn complete(
        &self,
        api_key: &str,
        model: &str,
        instruction: &str,
        text: &str,
    ) -> Result<String, UpstreamError> {
        let request = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: Some(SYSTEM_PROMPT.to_string()),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: Some(prompts::build_user_message(instruction, text)),
                },
            ],
        };

        let start = std::time::Instant::now();
        let response = self
            .client
            .post(self.endpoint_url())
            .bearer_auth(api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        log::info!(
            "[LLM] {} responded {} in {}ms",
            self.base_url,
            status,
            start.elapsed().as_millis()
        );

        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        extract_content(&body)
    }
}

/// Pull `choices[0].message.content` out of a response body, trimmed.
pub fn extract_content(body: &str) -> Result<String, UpstreamError> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| UpstreamError::MalformedBody(e.to_string()))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.is_empty())
        .map(|content| content.trim().to_string())
        .ok_or(UpstreamError::MissingContent)
}
