mod cli;
mod config;
mod css;
mod errors;
mod mcp;
mod models;
mod state;
mod store;
mod talents;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::mcp::McpServer;
use crate::state::AppState;
use crate::store::{SupabaseStore, TalentStore};
use crate::talents::TalentService;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.command == Some(Command::CheckEnv) {
        cli::check_env();
        return Ok(());
    }

    let config = Config::from_env()?;

    // Logs go to stderr: stdout is the MCP transport
    let filter = if config.debug {
        EnvFilter::new(format!("{}=debug", env!("CARGO_CRATE_NAME")))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), config.log_level()))
        })
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(
        "Starting Popmelt Talent Profile MCP Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let talents = build_talent_service(&config);
    info!("Serving talents from {}", talents.source());

    let state = AppState::new(config, talents);
    McpServer::new(state).run_stdio().await?;

    info!("MCP Server stopped");
    Ok(())
}

/// Uses Supabase when both credentials are present and valid; otherwise the
/// built-in dataset.
fn build_talent_service(config: &Config) -> TalentService {
    let Some(credentials) = config.supabase_credentials() else {
        info!("Supabase environment variables not set, using sample data");
        return TalentService::fallback_only();
    };

    match SupabaseStore::initialize(credentials) {
        Ok(store) => {
            info!("Supabase client initialized successfully");
            let store: Arc<dyn TalentStore> = Arc::new(store);
            TalentService::new(Some(store))
        }
        Err(e) => {
            error!("Failed to initialize Supabase: {e}");
            info!("Falling back to sample data");
            TalentService::fallback_only()
        }
    }
}
