//! Reading Assistant CLI.
//!
//! Plays the role of the browser shell: the selection comes from stdin,
//! the command name is what a shortcut or context-menu click would send,
//! and the overlay is printed to stdout.

use std::io::Write;
use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::AsyncReadExt;

use reading_assistant_lib::bridge::{render, Tabs};
use reading_assistant_lib::commands;
use reading_assistant_lib::config::{self, AssistantConfig, ProxyConfig};
use reading_assistant_lib::credentials::{self, CredentialSource, EnvCredentials};
use reading_assistant_lib::llm::{provider, Router};
use reading_assistant_lib::proxy_server;
use reading_assistant_lib::{CommandDispatcher, DispatchOutcome};

#[derive(Parser)]
#[command(name = "reading-assistant", version, about = "Summarize, paraphrase, explain or translate selected text")]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// List known LLM providers
    Providers,
    /// List context-menu entries
    Menu,
    /// Run a command on text read from stdin
    Run {
        /// summarize | paraphrase | explain | translate
        command: String,
        /// Provider id to use instead of the default
        #[arg(long)]
        provider: Option<String>,
        /// Model to request instead of the provider's default
        #[arg(long)]
        model: Option<String>,
        /// Copy the result to the clipboard
        #[arg(long)]
        copy: bool,
    },
    /// Store an API key in the OS keychain
    SaveKey { provider: String, key: String },
    /// Serve the remote proxy endpoint
    Proxy {
        /// Listen address (overrides PROXY_BIND)
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Ok(dir) = std::env::current_dir() {
        config::load_env_files(&dir);
    }
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        CliCommand::Providers => list_providers(),
        CliCommand::Menu => {
            for item in commands::context_menu() {
                println!("{:<12} {}", item.id, item.title);
            }
            Ok(())
        }
        CliCommand::Run {
            command,
            provider,
            model,
            copy,
        } => run_command(&command, provider, model, copy).await,
        CliCommand::SaveKey { provider, key } => {
            credentials::save_api_key(&provider, &key)?;
            println!("Saved API key for {}", provider);
            Ok(())
        }
        CliCommand::Proxy { bind } => {
            let mut proxy_config = ProxyConfig::from_env()?;
            if let Some(bind) = bind {
                proxy_config.bind = bind;
            }
            proxy_server::serve(proxy_config).await
        }
    }
}

fn list_providers() -> Result<(), Box<dyn std::error::Error>> {
    let assistant = AssistantConfig::from_env();
    let credentials = Arc::new(EnvCredentials);
    let router = Router::with_default_adapters(credentials.clone())
        .with_default_provider(assistant.default_provider);

    let mut out = std::io::stdout().lock();
    for p in router.providers() {
        let marker = if p.id == router.default_provider() { "*" } else { " " };
        let status = if provider::is_provider_configured(&p.id, credentials.as_ref()) {
            "configured"
        } else {
            "no key"
        };
        writeln!(
            out,
            "{} {:<11} {:<12} {:<10} {} - {}",
            marker, p.id, p.display_name, status, p.default_model, p.description
        )?;
    }
    Ok(())
}

async fn run_command(
    command: &str,
    provider: Option<String>,
    model: Option<String>,
    copy: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut selection = String::new();
    tokio::io::stdin().read_to_string(&mut selection).await?;

    let assistant = AssistantConfig::from_env();
    let credentials: Arc<dyn CredentialSource> = Arc::new(EnvCredentials);
    let backend = assistant.build_backend(credentials);

    let tabs = Arc::new(Tabs::new());
    let page = tabs.open(selection).await;

    let mut dispatcher = CommandDispatcher::new(backend, tabs.clone());
    if let Some(provider) = provider {
        dispatcher = dispatcher.with_provider(provider);
    }
    if let Some(model) = model {
        dispatcher = dispatcher.with_model(model);
    }

    match dispatcher.handle_command(command, None).await {
        DispatchOutcome::UnknownCommand => {
            eprintln!("Unknown command '{}'", command);
            return Ok(());
        }
        DispatchOutcome::NoActivePage | DispatchOutcome::EmptySelection { .. } => {
            eprintln!("Nothing selected");
            return Ok(());
        }
        DispatchOutcome::Delivered { .. } => {}
    }

    page.flush().await;
    if let Some(view) = render(&page.overlay()) {
        println!("{}", view.text);
        if copy {
            let mut clipboard = arboard::Clipboard::new()?;
            clipboard.set_text(view.text.clone())?;
            log::info!("[ACTION] Copied {} chars to clipboard", view.text.len());
        }
    }
    Ok(())
}
