//! Reading Assistant: select text, pick an AI action, read the answer.
//!
//! Wiring only. Business logic lives in the modules:
//!   - commands.rs      - the fixed command table + context menu entries
//!   - dispatcher.rs    - command → selection → LLM → overlay
//!   - bridge/          - page contexts, messages, overlay state
//!   - llm/             - provider registry, adapters, router, proxy mode
//!   - proxy_server.rs  - the remote relay endpoint
//!   - config.rs        - startup settings
//!   - credentials.rs   - API key lookup (env + OS keychain)

pub mod bridge;
pub mod commands;
pub mod config;
pub mod credentials;
pub mod dispatcher;
pub mod llm;
pub mod proxy_server;

pub use dispatcher::{CommandDispatcher, DispatchOutcome};
