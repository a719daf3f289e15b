//! Chat prompt construction.
//!
//! Every provider gets the same two-message conversation: a fixed system
//! preamble and a user message made of the instruction, a blank line, and
//! the selected text.

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Build the user message for a selection + instruction pair.
pub fn build_user_message(instruction: &str, text: &str) -> String {
    format!("{}\n\n{}", instruction, text)
}
