pub mod config;

use std::io::Read;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use af_domain::config::Config;

use crate::api::functions::Function;
use crate::api::lambda::{self, ProxyEvent};
use crate::bootstrap;
use crate::runtime::{run_turn, TurnInput};

/// my-ai-friend: a conversational companion backend.
#[derive(Debug, Parser)]
#[command(name = "my-ai-friend", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP server (default when no subcommand is given).
    Serve,
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Run one conversation turn and print the outcome as JSON.
    Ask {
        /// Conversation identifier.
        id: String,
        /// What the user says.
        query: String,
    },
    /// Read a proxy event as JSON on stdin, run one function, and print
    /// the proxy response.
    Invoke {
        #[arg(long, value_enum)]
        function: Function,
    },
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

// ── Config loading helper ─────────────────────────────────────────────

/// Load the configuration from the path in `AF_CONFIG` (or `config.toml`
/// by default). A missing file yields the defaults. Returns the parsed
/// [`Config`] and the path that was used.
pub fn load_config() -> anyhow::Result<(Config, String)> {
    let config_path = std::env::var("AF_CONFIG").unwrap_or_else(|_| "config.toml".into());

    let config = if std::path::Path::new(&config_path).exists() {
        let raw = std::fs::read_to_string(&config_path)
            .map_err(|e| anyhow::anyhow!("reading {config_path}: {e}"))?;
        toml::from_str(&raw).map_err(|e| anyhow::anyhow!("parsing {config_path}: {e}"))?
    } else {
        Config::default()
    };

    Ok((config, config_path))
}

// ── One-shot commands ─────────────────────────────────────────────────

/// `my-ai-friend ask <id> <query>`
pub async fn ask(config: Arc<Config>, id: String, query: String) -> anyhow::Result<()> {
    let state = bootstrap::build_app_state(config)?;
    let outcome = run_turn(&state, TurnInput { id, query }).await?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

/// `my-ai-friend invoke --function <name> < event.json`
pub async fn invoke(config: Arc<Config>, function: Function) -> anyhow::Result<()> {
    let mut raw = String::new();
    std::io::stdin().read_to_string(&mut raw)?;
    let event: ProxyEvent = if raw.trim().is_empty() {
        ProxyEvent::default()
    } else {
        serde_json::from_str(&raw).map_err(|e| anyhow::anyhow!("parsing proxy event: {e}"))?
    };

    let state = bootstrap::build_app_state(config)?;
    let response = lambda::handle(&state, function, event).await?;
    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}
