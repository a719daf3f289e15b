//! Page context: one task per page.
//!
//! The page owns its text selection and its overlay state. Nothing
//! outside the task touches either: the background side talks to it
//! through `PageHandle`, which only sends messages. Overlay changes are
//! published on a watch channel so observers (CLI, tests) can read the
//! current state without sharing memory with the page.

use tokio::sync::{mpsc, oneshot, watch};

use super::messages::{PageMessage, SelectionReply};
use super::overlay::OverlayState;

pub type PageId = u32;

const PAGE_QUEUE_DEPTH: usize = 32;

/// Page-side state machine. Handles one message at a time.
#[derive(Debug, Default)]
pub struct Page {
    selection: String,
    overlay: OverlayState,
}

impl Page {
    pub fn new(selection: impl Into<String>) -> Self {
        Self {
            selection: selection.into(),
            overlay: OverlayState::Absent,
        }
    }

    /// Simulate the user changing the selection.
    pub fn select(&mut self, text: impl Into<String>) {
        self.selection = text.into();
    }

    pub fn overlay(&self) -> &OverlayState {
        &self.overlay
    }

    /// Handle one message. Only `getSelectedText` produces a reply.
    pub fn handle(&mut self, message: PageMessage) -> Option<SelectionReply> {
        match message {
            PageMessage::GetSelectedText => Some(SelectionReply {
                text: self.selection.clone(),
            }),
            PageMessage::ShowLoading => {
                self.overlay = OverlayState::Loading;
                None
            }
            PageMessage::ShowResult { result } => {
                self.overlay = OverlayState::Showing(result);
                None
            }
            PageMessage::CloseOverlay => {
                self.overlay = OverlayState::Absent;
                None
            }
        }
    }
}

enum Envelope {
    Message {
        message: PageMessage,
        reply: Option<oneshot::Sender<SelectionReply>>,
    },
    Select(String),
    /// Answered once every earlier envelope has been handled.
    Flush(oneshot::Sender<()>),
}

/// Background-side handle to a running page task.
#[derive(Clone)]
pub struct PageHandle {
    id: PageId,
    tx: mpsc::Sender<Envelope>,
    overlay: watch::Receiver<OverlayState>,
}

impl PageHandle {
    pub fn id(&self) -> PageId {
        self.id
    }

    /// Ask the page for its selection. `None` if the page is gone.
    pub async fn request_selection(&self) -> Option<String> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Envelope::Message {
                message: PageMessage::GetSelectedText,
                reply: Some(reply_tx),
            })
            .await
            .ok()?;
        reply_rx.await.ok().map(|reply| reply.text)
    }

    /// Send a message without waiting for it to be handled.
    /// Returns false if the page is gone.
    pub async fn post(&self, message: PageMessage) -> bool {
        self.tx
            .send(Envelope::Message {
                message,
                reply: None,
            })
            .await
            .is_ok()
    }

    pub async fn select(&self, text: impl Into<String>) -> bool {
        self.tx.send(Envelope::Select(text.into())).await.is_ok()
    }

    /// Wait until every message sent so far has been handled.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(Envelope::Flush(done_tx)).await.is_ok() {
            let _ = done_rx.await;
        }
    }

    /// Current overlay state, as last published by the page.
    pub fn overlay(&self) -> OverlayState {
        self.overlay.borrow().clone()
    }
}

/// Start a page task with an initial selection.
///
/// The task ends when every `PageHandle` for it has been dropped.
pub fn spawn_page(id: PageId, selection: impl Into<String>) -> PageHandle {
    let (tx, mut rx) = mpsc::channel::<Envelope>(PAGE_QUEUE_DEPTH);
    let (overlay_tx, overlay_rx) = watch::channel(OverlayState::Absent);
    let mut page = Page::new(selection);

    tokio::spawn(async move {
        while let Some(envelope) = rx.recv().await {
            match envelope {
                Envelope::Message { message, reply } => {
                    log::debug!("[PAGE] {} received {:?}", id, message);
                    let answer = page.handle(message);
                    if let (Some(reply), Some(answer)) = (reply, answer) {
                        let _ = reply.send(answer);
                    }
                    overlay_tx.send_if_modified(|current| {
                        if current != page.overlay() {
                            *current = page.overlay().clone();
                            true
                        } else {
                            false
                        }
                    });
                }
                Envelope::Select(text) => page.select(text),
                Envelope::Flush(done) => {
                    let _ = done.send(());
                }
            }
        }
        log::debug!("[PAGE] {} closed", id);
    });

    PageHandle {
        id,
        tx,
        overlay: overlay_rx,
    }
}
