//! Command flow tests: dispatcher + page tasks + a stub backend.
//!
//! No network. The backend records every request it receives so tests
//! can assert exactly how many LLM calls a command made.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reading_assistant_lib::bridge::{render, OverlayState, PageId, PageMessage, TabHost, Tabs};
use reading_assistant_lib::credentials::StaticCredentials;
use reading_assistant_lib::llm::{
    LlmBackend, LlmRequest, LlmResult, ProviderAdapter, ProviderSession, Router,
};
use reading_assistant_lib::{CommandDispatcher, DispatchOutcome};

// ── Helpers ──────────────────────────────────────────────────────────

struct StubBackend {
    reply: LlmResult,
    delay: Duration,
    requests: Mutex<Vec<LlmRequest>>,
}

impl StubBackend {
    fn replying(reply: LlmResult) -> Arc<Self> {
        Self::slow(reply, Duration::ZERO)
    }

    fn slow(reply: LlmResult, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            reply,
            delay,
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmBackend for StubBackend {
    async fn complete(&self, text: &str, instruction: &str) -> LlmResult {
        self.complete_request(&LlmRequest::new(text, instruction)).await
    }

    async fn complete_request(&self, request: &LlmRequest) -> LlmResult {
        self.requests.lock().unwrap().push(request.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.reply.clone()
    }
}

/// Tab host wrapper that records every message sent to a page.
struct RecordingTabs {
    inner: Tabs,
    sent: Mutex<Vec<(PageId, PageMessage)>>,
}

impl RecordingTabs {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Tabs::new(),
            sent: Mutex::new(Vec::new()),
        })
    }

    fn sent(&self) -> Vec<(PageId, PageMessage)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl TabHost for RecordingTabs {
    async fn active_page(&self) -> Option<PageId> {
        self.inner.active_page().await
    }

    async fn get_selected_text(&self, page: PageId) -> Option<String> {
        self.inner.get_selected_text(page).await
    }

    async fn send(&self, page: PageId, message: PageMessage) {
        self.sent.lock().unwrap().push((page, message.clone()));
        self.inner.send(page, message).await;
    }
}

const SUMMARIZE: &str = "Summarize this text into a few concise bullet points.";

// ── End to end ───────────────────────────────────────────────────────

#[tokio::test]
async fn summarize_selection_replaces_prior_overlay() {
    let tabs = RecordingTabs::new();
    let page = tabs.inner.open("The quick brown fox").await;

    // An earlier result is already on the page.
    page.post(PageMessage::ShowResult {
        result: "old answer".to_string(),
    })
    .await;

    let backend = StubBackend::replying(LlmResult::success("• A fox is quick and brown"));
    let dispatcher = CommandDispatcher::new(backend.clone(), tabs.clone());

    let outcome = dispatcher.handle_command("summarize", None).await;
    page.flush().await;

    assert_eq!(
        outcome,
        DispatchOutcome::Delivered {
            page: page.id(),
            result: LlmResult::success("• A fox is quick and brown"),
        }
    );

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].text, "The quick brown fox");
    assert_eq!(requests[0].instruction, SUMMARIZE);

    assert_eq!(
        tabs.sent(),
        vec![
            (page.id(), PageMessage::ShowLoading),
            (
                page.id(),
                PageMessage::ShowResult {
                    result: "• A fox is quick and brown".to_string()
                }
            ),
        ]
    );

    let overlay = page.overlay();
    assert_eq!(overlay, OverlayState::Showing("• A fox is quick and brown".to_string()));
    assert_eq!(overlay.element_count(), 1);
    assert_eq!(render(&overlay).unwrap().text, "• A fox is quick and brown");
}

#[tokio::test]
async fn every_command_sends_its_instruction() {
    let table = [
        ("summarize", SUMMARIZE),
        ("paraphrase", "Paraphrase the following text for clarity."),
        ("explain", "Explain this text in simple terms."),
        ("translate", "Translate this to Spanish."),
    ];

    for (name, instruction) in table {
        let tabs = Arc::new(Tabs::new());
        tabs.open("some text").await;
        let backend = StubBackend::replying(LlmResult::success("ok"));
        let dispatcher = CommandDispatcher::new(backend.clone(), tabs);

        dispatcher.handle_command(name, None).await;

        let requests = backend.requests();
        assert_eq!(requests.len(), 1, "{}", name);
        assert_eq!(requests[0].instruction, instruction, "{}", name);
    }
}

// ── Silent no-ops ────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_command_does_nothing() {
    let tabs = RecordingTabs::new();
    let page = tabs.inner.open("The quick brown fox").await;
    let backend = StubBackend::replying(LlmResult::success("never"));
    let dispatcher = CommandDispatcher::new(backend.clone(), tabs.clone());

    for name in ["define", "SUMMARIZE", ""] {
        let outcome = dispatcher.handle_command(name, None).await;
        assert_eq!(outcome, DispatchOutcome::UnknownCommand);
    }
    page.flush().await;

    assert!(backend.requests().is_empty());
    assert!(tabs.sent().is_empty());
    assert_eq!(page.overlay(), OverlayState::Absent);
}

#[tokio::test]
async fn empty_or_blank_selection_makes_no_call_and_shows_nothing() {
    for selection in ["", "   ", "\n\t \n"] {
        let tabs = RecordingTabs::new();
        let page = tabs.inner.open(selection).await;
        let backend = StubBackend::replying(LlmResult::success("never"));
        let dispatcher = CommandDispatcher::new(backend.clone(), tabs.clone());

        let outcome = dispatcher.handle_command("explain", None).await;
        page.flush().await;

        assert_eq!(outcome, DispatchOutcome::EmptySelection { page: page.id() });
        assert!(backend.requests().is_empty());
        assert!(tabs.sent().is_empty());
        assert_eq!(page.overlay(), OverlayState::Absent);
    }
}

#[tokio::test]
async fn no_active_page_is_a_no_op() {
    let tabs = Arc::new(Tabs::new());
    let backend = StubBackend::replying(LlmResult::success("never"));
    let dispatcher = CommandDispatcher::new(backend.clone(), tabs);

    assert_eq!(
        dispatcher.handle_command("summarize", None).await,
        DispatchOutcome::NoActivePage
    );
    assert!(backend.requests().is_empty());
}

// ── Targeting and failures ───────────────────────────────────────────

#[tokio::test]
async fn explicit_target_wins_over_active_page() {
    let tabs = Arc::new(Tabs::new());
    let clicked = tabs.open("context menu page").await;
    let active = tabs.open("active page").await;
    let backend = StubBackend::replying(LlmResult::success("done"));
    let dispatcher = CommandDispatcher::new(backend.clone(), tabs);

    dispatcher.handle_command("explain", Some(clicked.id())).await;
    clicked.flush().await;
    active.flush().await;

    assert_eq!(backend.requests()[0].text, "context menu page");
    assert_eq!(clicked.overlay(), OverlayState::Showing("done".to_string()));
    assert_eq!(active.overlay(), OverlayState::Absent);
}

#[tokio::test]
async fn failure_text_is_shown_like_a_result_without_retry() {
    let tabs = Arc::new(Tabs::new());
    let page = tabs.open("some text").await;
    let backend = StubBackend::replying(LlmResult::upstream_failed());
    let dispatcher = CommandDispatcher::new(backend.clone(), tabs);

    let outcome = dispatcher.handle_command("paraphrase", None).await;
    page.flush().await;

    assert!(matches!(
        outcome,
        DispatchOutcome::Delivered { result: LlmResult::Failure { .. }, .. }
    ));
    assert_eq!(backend.requests().len(), 1);
    assert_eq!(
        page.overlay(),
        OverlayState::Showing("LLM request failed or returned no response.".to_string())
    );
}

#[tokio::test]
async fn provider_choice_is_carried_on_the_request() {
    let tabs = Arc::new(Tabs::new());
    tabs.open("some text").await;
    let backend = StubBackend::replying(LlmResult::success("ok"));
    let dispatcher = CommandDispatcher::new(backend.clone(), tabs).with_provider("groq");

    dispatcher.handle_command("explain", None).await;

    assert_eq!(backend.requests()[0].provider_id.as_deref(), Some("groq"));
}

#[tokio::test]
async fn overlapping_commands_leave_a_single_overlay() {
    let tabs = Arc::new(Tabs::new());
    let page = tabs.open("some text").await;
    let backend = StubBackend::slow(LlmResult::success("same answer"), Duration::from_millis(20));
    let dispatcher = CommandDispatcher::new(backend.clone(), tabs);

    let (first, second) = tokio::join!(
        dispatcher.handle_command("summarize", None),
        dispatcher.handle_command("explain", None),
    );
    page.flush().await;

    assert!(matches!(first, DispatchOutcome::Delivered { .. }));
    assert!(matches!(second, DispatchOutcome::Delivered { .. }));
    assert_eq!(backend.requests().len(), 2);
    assert_eq!(page.overlay(), OverlayState::Showing("same answer".to_string()));
    assert_eq!(page.overlay().element_count(), 1);
}

// ── Through the real router ──────────────────────────────────────────

struct EchoAdapter {
    session: Option<ProviderSession>,
}

#[async_trait]
impl ProviderAdapter for EchoAdapter {
    fn provider_id(&self) -> &str {
        "openrouter"
    }

    fn configure(&mut self, session: ProviderSession) {
        self.session = Some(session);
    }

    async fn call(&self, text: &str, _instruction: &str, model: Option<&str>) -> LlmResult {
        match (&self.session, model) {
            (Some(_), Some(model)) => LlmResult::success(format!("[{}] • {}", model, text)),
            (Some(_), None) => LlmResult::success(format!("• {}", text)),
            (None, _) => LlmResult::upstream_failed(),
        }
    }
}

#[tokio::test]
async fn router_backed_dispatch_renders_adapter_output() {
    let creds = Arc::new(StaticCredentials::new().with_key("openrouter", "sk-or-test"));
    let router = Router::new(creds);
    router.register(EchoAdapter { session: None }).unwrap();

    let tabs = Arc::new(Tabs::new());
    let page = tabs.open("The quick brown fox").await;
    let dispatcher = CommandDispatcher::new(Arc::new(router), tabs);

    dispatcher.handle_command("summarize", None).await;
    page.flush().await;

    assert_eq!(
        page.overlay(),
        OverlayState::Showing("• The quick brown fox".to_string())
    );
}

#[tokio::test]
async fn router_without_credentials_shows_unavailable_message() {
    let router = Router::new(Arc::new(StaticCredentials::new()));
    router.register(EchoAdapter { session: None }).unwrap();

    let tabs = Arc::new(Tabs::new());
    let page = tabs.open("The quick brown fox").await;
    let dispatcher = CommandDispatcher::new(Arc::new(router), tabs);

    dispatcher.handle_command("summarize", None).await;
    page.flush().await;

    assert_eq!(
        page.overlay(),
        OverlayState::Showing(
            "Selected LLM provider is unavailable or misconfigured.".to_string()
        )
    );
}

#[tokio::test]
async fn dispatcher_model_choice_reaches_the_adapter() {
    let creds = Arc::new(StaticCredentials::new().with_key("openrouter", "sk-or-test"));
    let router = Router::new(creds);
    router.register(EchoAdapter { session: None }).unwrap();

    let tabs = Arc::new(Tabs::new());
    let page = tabs.open("The quick brown fox").await;
    let dispatcher =
        CommandDispatcher::new(Arc::new(router), tabs).with_model("openai/gpt-4o");

    dispatcher.handle_command("summarize", None).await;
    page.flush().await;

    assert_eq!(
        page.overlay(),
        OverlayState::Showing("[openai/gpt-4o] • The quick brown fox".to_string())
    );
}
