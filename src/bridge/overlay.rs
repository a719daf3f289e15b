//! Overlay state and rendering.
//!
//! A page has at most one overlay. What it shows is an owned
//! `OverlayState`; `render` turns that state into a view and has no side
//! effects, so replacing the state is all it takes to replace the overlay.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// DOM id of the single overlay element.
pub const OVERLAY_ELEMENT_ID: &str = "ai-reading-overlay";

pub const LOADING_TEXT: &str = "Loading AI response...";
pub const EMPTY_RESULT_TEXT: &str = "No response.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OverlayState {
    #[default]
    Absent,
    Loading,
    Showing(String),
}

impl OverlayState {
    /// Number of overlay elements this state puts on the page.
    pub fn element_count(&self) -> usize {
        match self {
            OverlayState::Absent => 0,
            _ => 1,
        }
    }
}

/// Buttons on a result overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayAction {
    Copy,
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayView {
    pub element_id: &'static str,
    pub text: String,
    pub loading: bool,
    pub actions: Vec<OverlayAction>,
}

/// Render an overlay state. `None` means no overlay on the page.
pub fn render(state: &OverlayState) -> Option<OverlayView> {
    match state {
        OverlayState::Absent => None,
        OverlayState::Loading => Some(OverlayView {
            element_id: OVERLAY_ELEMENT_ID,
            text: LOADING_TEXT.to_string(),
            loading: true,
            actions: Vec::new(),
        }),
        OverlayState::Showing(raw) => {
            let cleaned = clean_text(raw);
            let text = if cleaned.is_empty() {
                EMPTY_RESULT_TEXT.to_string()
            } else {
                cleaned
            };
            Some(OverlayView {
                element_id: OVERLAY_ELEMENT_ID,
                text,
                loading: false,
                actions: vec![OverlayAction::Copy, OverlayAction::Close],
            })
        }
    }
}

fn bold_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern"))
}

fn dash_bullet_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^- ").expect("bullet pattern"))
}

fn blank_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*\n").expect("blank line pattern"))
}

/// Strip common Markdown from a model reply for plain-text display.
///
/// Handles `**bold**`, `- ` bullets (→ `• `) and blank lines.
pub fn clean_text(text: &str) -> String {
    let text = bold_re().replace_all(text, "$1");
    let text = dash_bullet_re().replace_all(&text, "• ");
    let text = blank_line_re().replace_all(&text, "");
    text.trim().to_string()
}
