//! Messages between the background dispatcher and a page.
//!
//! JSON shape, tagged by `action`:
//!   {"action":"getSelectedText"}              → {"text": "..."}
//!   {"action":"showLoading"}                  → no reply
//!   {"action":"showResult","result":"..."}    → no reply
//!   {"action":"closeOverlay"}                 → no reply

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PageMessage {
    GetSelectedText,
    ShowLoading,
    ShowResult { result: String },
    CloseOverlay,
}

impl PageMessage {
    /// Whether the sender waits for a reply.
    pub fn expects_reply(&self) -> bool {
        matches!(self, PageMessage::GetSelectedText)
    }
}

/// Reply to `getSelectedText`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionReply {
    pub text: String,
}
