//! Application setup and initialization
//!
//! Wiring lives here so main.rs stays a thin entry point and tests can build
//! the router without binding a socket.

pub mod routes;
pub mod server;
pub mod services;

use crate::state::AppState;
use anyhow::{Context, Result};
use arogya_core::Config;
use axum::Router;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Fully wired application
pub struct App {
    pub state: Arc<AppState>,
    pub router: Router,
    /// Retention sweeper tasks, aborted on shutdown
    pub background_tasks: Vec<JoinHandle<()>>,
}

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<App> {
    // Validate configuration first - fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.environment())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    let state = services::initialize_services(&config).await?;
    let background_tasks = services::start_retention_sweepers(&config, &state);
    let router = routes::setup_routes(&config, state.clone())?;

    Ok(App {
        state,
        router,
        background_tasks,
    })
}
