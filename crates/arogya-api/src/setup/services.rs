//! Service construction and background task startup

use crate::state::AppState;
use anyhow::{Context, Result};
use arogya_core::{Config, StoragePolicy, UploadPurpose};
use arogya_services::{ClaudeContentValidator, ContentValidator, RetentionSweeper};
use arogya_storage::create_remote_store;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Build the remote store, content validator and staging directories.
pub async fn initialize_services(config: &Config) -> Result<Arc<AppState>> {
    let remote_store = create_remote_store(config)
        .await
        .context("Failed to initialize remote store")?;
    tracing::info!(backend = %remote_store.backend_type(), "Remote store initialized");

    let validator: Option<Arc<dyn ContentValidator>> = if config.content_validation_enabled() {
        let api_key = config.anthropic_api_key().ok_or_else(|| {
            anyhow::anyhow!("ANTHROPIC_API_KEY is required when content validation is enabled")
        })?;
        let validator: Arc<dyn ContentValidator> = Arc::new(
            ClaudeContentValidator::new(
                api_key,
                config.anthropic_vision_model(),
                config.content_validation_timeout(),
            )
            .context("Failed to initialize content validator")?,
        );
        tracing::info!(
            model = %config.anthropic_vision_model(),
            timeout_secs = config.content_validation_timeout().as_secs(),
            "Content validation enabled"
        );
        Some(validator)
    } else {
        tracing::warn!("Content validation disabled - post images are not classified");
        None
    };

    let state = AppState::new(config.clone(), remote_store, validator);

    let disk_purposes = disk_purposes(&state);
    state
        .staging
        .ensure_dirs(&disk_purposes)
        .await
        .context("Failed to create staging directories")?;

    Ok(Arc::new(state))
}

/// Start one retention sweeper per disk-staged purpose directory.
pub fn start_retention_sweepers(config: &Config, state: &AppState) -> Vec<JoinHandle<()>> {
    if !config.retention_sweep_enabled() {
        tracing::info!("Retention sweep disabled");
        return Vec::new();
    }

    disk_purposes(state)
        .into_iter()
        .map(|purpose| {
            let sweeper = Arc::new(RetentionSweeper::new(
                state.staging.purpose_dir(purpose),
                config.retention_window(),
                config.retention_sweep_interval(),
            ));
            tracing::info!(
                purpose = %purpose,
                dir = %sweeper.dir().display(),
                retention_hours = config.retention_window().as_secs() / 3600,
                "Starting retention sweeper"
            );
            sweeper.start()
        })
        .collect()
}

fn disk_purposes(state: &AppState) -> Vec<UploadPurpose> {
    [&state.post_media, &state.expert_documents]
        .into_iter()
        .map(|route| route.constraints())
        .filter(|constraints| constraints.storage == StoragePolicy::Disk)
        .map(|constraints| constraints.purpose)
        .collect()
}
