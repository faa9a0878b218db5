// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `parley serve` command implementation.
//!
//! Wires SQLite storage, the OpenAI-compatible provider, JWT authentication,
//! and the chat orchestrator into the HTTP gateway, then serves until a
//! shutdown signal arrives.

use std::sync::Arc;

use parley_agent::{ChatOrchestrator, CompletionSettings, install_signal_handler, load_system_prompt};
use parley_auth::JwtAuth;
use parley_config::ParleyConfig;
use parley_core::{ParleyError, PluginAdapter, StorageAdapter};
use parley_gateway::{GatewayState, start_server};
use parley_openai::OpenAiProvider;
use parley_storage::SqliteStorage;
use tracing::{error, info};

/// Runs the `parley serve` command.
pub async fn run_serve(config: ParleyConfig) -> Result<(), ParleyError> {
    init_tracing(&config.agent.log_level);

    info!(name = %config.agent.name, "starting parley serve");

    // Fail on missing secrets before touching the database.
    let auth = Arc::new(JwtAuth::from_config(&config.auth)?);
    let provider = Arc::new(OpenAiProvider::new(&config.openai)?);

    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;
    info!(path = %config.storage.database_path, "storage initialized");

    let system_prompt = load_system_prompt(
        &config.agent.name,
        config.agent.system_prompt.as_deref(),
        config.agent.system_prompt_file.as_deref(),
    )
    .await;

    let orchestrator = Arc::new(ChatOrchestrator::new(
        storage.clone(),
        provider,
        system_prompt,
        CompletionSettings::from(&config.openai),
    ));

    let state = GatewayState::new(
        orchestrator,
        auth,
        config.agent.fallback_message.clone(),
        config.agent.name.clone(),
    );

    let cancel = install_signal_handler();
    let served = start_server(&config.server, state, cancel).await;

    if let Err(e) = storage.shutdown().await {
        error!(error = %e, "storage shutdown failed");
    }

    served?;
    info!("parley serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("parley={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
