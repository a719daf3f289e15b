//! Command dispatcher: shared handler for shortcuts and context menu.
//!
//! One invocation walks these stages:
//!   Idle → InstructionResolved → TextRequested → TextReceived | TextEmpty
//!        → LlmInFlight → ResultReceived
//!
//! Unknown commands, a missing page and an empty selection all end the
//! invocation silently. Otherwise exactly one backend call is made and
//! whatever comes back, success or failure text, is shown on the page.

use std::sync::Arc;

use crate::bridge::{PageId, PageMessage, TabHost};
use crate::commands::Command;
use crate::llm::{LlmBackend, LlmRequest, LlmResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    InstructionResolved,
    TextRequested,
    TextReceived,
    LlmInFlight,
    ResultReceived,
}

/// How an invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    UnknownCommand,
    NoActivePage,
    EmptySelection { page: PageId },
    Delivered { page: PageId, result: LlmResult },
}

pub struct CommandDispatcher {
    backend: Arc<dyn LlmBackend>,
    tabs: Arc<dyn TabHost>,
    provider_id: Option<String>,
    model: Option<String>,
}

impl CommandDispatcher {
    pub fn new(backend: Arc<dyn LlmBackend>, tabs: Arc<dyn TabHost>) -> Self {
        Self {
            backend,
            tabs,
            provider_id: None,
            model: None,
        }
    }

    /// Route every call to `provider_id` instead of the backend default.
    pub fn with_provider(mut self, provider_id: impl Into<String>) -> Self {
        self.provider_id = Some(provider_id.into());
        self
    }

    /// Ask for `model` instead of the provider's configured model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Run `command` against `target`, or against the active page when
    /// `target` is `None` (the keyboard-shortcut path).
    pub async fn handle_command(&self, command: &str, target: Option<PageId>) -> DispatchOutcome {
        let Some(command) = Command::from_name(command) else {
            log::debug!("[DISPATCH] Ignoring unknown command {:?}", command);
            return DispatchOutcome::UnknownCommand;
        };
        let instruction = command.instruction();
        trace(command, Stage::InstructionResolved);

        let page = match target {
            Some(page) => page,
            None => match self.tabs.active_page().await {
                Some(page) => page,
                None => {
                    log::info!("[DISPATCH] {}: no active page", command.name());
                    return DispatchOutcome::NoActivePage;
                }
            },
        };
        trace(command, Stage::TextRequested);

        let text = self.tabs.get_selected_text(page).await.unwrap_or_default();
        if text.trim().is_empty() {
            log::info!("[DISPATCH] {}: empty selection on page {}", command.name(), page);
            return DispatchOutcome::EmptySelection { page };
        }
        trace(command, Stage::TextReceived);

        self.tabs.send(page, PageMessage::ShowLoading).await;

        let mut request = LlmRequest::new(text, instruction);
        if let Some(provider_id) = &self.provider_id {
            request = request.with_provider(provider_id.clone());
        }
        if let Some(model) = &self.model {
            request = request.with_model(model.clone());
        }

        trace(command, Stage::LlmInFlight);
        let start = std::time::Instant::now();
        let result = self.backend.complete_request(&request).await;
        log::info!(
            "[DISPATCH] {} on page {}: {} in {}ms",
            command.name(),
            page,
            if result.is_success() { "success" } else { "failure" },
            start.elapsed().as_millis()
        );
        trace(command, Stage::ResultReceived);

        self.tabs
            .send(
                page,
                PageMessage::ShowResult {
                    result: result.display_text().to_string(),
                },
            )
            .await;

        DispatchOutcome::Delivered { page, result }
    }
}

fn trace(command: Command, stage: Stage) {
    log::debug!("[DISPATCH] {} → {:?}", command.name(), stage);
}
