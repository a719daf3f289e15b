//! Fixed command table: the four AI actions.
//!
//! Command names double as keyboard-shortcut ids and context-menu item
//! ids, so they must stay stable.

use serde::Serialize;

/// One of the fixed AI actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    Summarize,
    Paraphrase,
    Explain,
    Translate,
}

impl Command {
    pub const ALL: [Command; 4] = [
        Command::Summarize,
        Command::Paraphrase,
        Command::Explain,
        Command::Translate,
    ];

    /// Look up a command by its shortcut / menu id.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Command::Summarize => "summarize",
            Command::Paraphrase => "paraphrase",
            Command::Explain => "explain",
            Command::Translate => "translate",
        }
    }

    /// Instruction sent to the model ahead of the selected text.
    pub fn instruction(self) -> &'static str {
        match self {
            Command::Summarize => "Summarize this text into a few concise bullet points.",
            Command::Paraphrase => "Paraphrase the following text for clarity.",
            Command::Explain => "Explain this text in simple terms.",
            // TODO: let the user pick the target language once settings exist.
            Command::Translate => "Translate this to Spanish.",
        }
    }

    /// Context-menu label.
    pub fn menu_title(self) -> &'static str {
        match self {
            Command::Summarize => "Summarize with AI",
            Command::Paraphrase => "Paraphrase with AI",
            Command::Explain => "Explain with AI",
            Command::Translate => "Translate with AI",
        }
    }
}

/// Instruction for a command name, or `None` for unknown names.
pub fn instruction_for(name: &str) -> Option<&'static str> {
    Command::from_name(name).map(Command::instruction)
}

/// A context-menu entry shown on text selections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub id: &'static str,
    pub title: &'static str,
    pub contexts: &'static [&'static str],
}

/// Context-menu entries, one per command.
pub fn context_menu() -> Vec<MenuItem> {
    Command::ALL
        .into_iter()
        .map(|c| MenuItem {
            id: c.name(),
            title: c.menu_title(),
            contexts: &["selection"],
        })
        .collect()
}
