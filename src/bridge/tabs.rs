//! Tab host: how the background side finds and reaches pages.
//!
//! `TabHost` is the seam the dispatcher depends on. `Tabs` is the
//! in-process implementation: it owns a `PageHandle` per open page and
//! tracks which one is active.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::messages::PageMessage;
use super::page::{self, PageHandle, PageId};

#[async_trait]
pub trait TabHost: Send + Sync {
    /// The page the user is looking at, if any.
    async fn active_page(&self) -> Option<PageId>;

    /// Ask a page for its selection. `None` if the page is unknown or gone.
    async fn get_selected_text(&self, page: PageId) -> Option<String>;

    /// Deliver a message that expects no reply.
    async fn send(&self, page: PageId, message: PageMessage);
}

/// In-process tab host backed by page tasks.
pub struct Tabs {
    pages: Mutex<HashMap<PageId, PageHandle>>,
    active: Mutex<Option<PageId>>,
    next_id: Mutex<PageId>,
}

impl Tabs {
    pub fn new() -> Self {
        Self {
            pages: Mutex::new(HashMap::new()),
            active: Mutex::new(None),
            next_id: Mutex::new(1),
        }
    }

    /// Open a page with the given selection and make it active.
    pub async fn open(&self, selection: impl Into<String>) -> PageHandle {
        let id = {
            let mut next = self.next_id.lock().await;
            let id = *next;
            *next += 1;
            id
        };
        let handle = page::spawn_page(id, selection);
        self.pages.lock().await.insert(id, handle.clone());
        *self.active.lock().await = Some(id);
        log::info!("[PAGE] Opened page {}", id);
        handle
    }

    /// Make `id` the active page. Returns false for unknown pages.
    pub async fn activate(&self, id: PageId) -> bool {
        if !self.pages.lock().await.contains_key(&id) {
            return false;
        }
        *self.active.lock().await = Some(id);
        true
    }

    /// Close a page. Its task stops once outstanding handles are dropped.
    pub async fn close(&self, id: PageId) {
        self.pages.lock().await.remove(&id);
        let mut active = self.active.lock().await;
        if *active == Some(id) {
            *active = None;
        }
    }

    pub async fn page(&self, id: PageId) -> Option<PageHandle> {
        self.pages.lock().await.get(&id).cloned()
    }
}

impl Default for Tabs {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TabHost for Tabs {
    async fn active_page(&self) -> Option<PageId> {
        *self.active.lock().await
    }

    async fn get_selected_text(&self, page: PageId) -> Option<String> {
        let handle = self.page(page).await?;
        handle.request_selection().await
    }

    async fn send(&self, page: PageId, message: PageMessage) {
        match self.page(page).await {
            Some(handle) => {
                if !handle.post(message).await {
                    log::warn!("[PAGE] Page {} is gone, message dropped", page);
                }
            }
            None => log::warn!("[PAGE] No page {}, message dropped", page),
        }
    }
}
