//! Server startup and graceful shutdown

use anyhow::Result;
use arogya_core::Config;
use axum::Router;
use tokio::task::JoinHandle;

/// Start the server with graceful shutdown. Background tasks are aborted
/// once the server has drained.
pub async fn start_server(
    config: &Config,
    app: Router,
    background_tasks: Vec<JoinHandle<()>>,
) -> Result<()> {
    let addr = format!("0.0.0.0:{}", config.server_port());
    tracing::info!(addr = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    let post_media = config.post_media_constraints();
    let expert_documents = config.expert_document_constraints();
    tracing::info!(
        post_media_max_mb = post_media.max_file_size / 1024 / 1024,
        post_media_types = %post_media.allowed_content_types.join(","),
        expert_document_max_mb = expert_documents.max_file_size / 1024 / 1024,
        expert_document_types = %expert_documents.allowed_content_types.join(","),
        remote_store = %config.remote_store_backend(),
        staging_dir = %config.staging_dir().display(),
        "Server ready and accepting connections"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    for task in background_tasks {
        task.abort();
    }
    tracing::info!("Background tasks stopped");

    Ok(())
}

/// Resolves on Ctrl+C (SIGINT) or SIGTERM. A handler that cannot be
/// installed is logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal");
        },
    }

    tracing::info!("Shutting down gracefully...");
}
