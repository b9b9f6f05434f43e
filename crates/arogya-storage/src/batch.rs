//! Ordered fan-out of a multi-file upload.

use crate::traits::{RemoteStore, RemoteStoreError, RemoteStoreResult};
use arogya_core::{RemoteAsset, StagedFile};
use futures::future::try_join_all;
use std::sync::Arc;

/// Upload every file concurrently and return the assets in input order.
///
/// All-or-nothing: the first failure fails the whole batch. Uploads already
/// dispatched are not cancelled or rolled back, so their remote copies may
/// be left behind.
#[tracing::instrument(skip(store, files), fields(count = files.len(), backend = %store.backend_type()))]
pub async fn upload_batch(
    store: Arc<dyn RemoteStore>,
    files: Vec<StagedFile>,
    folder: &str,
) -> RemoteStoreResult<Vec<RemoteAsset>> {
    let count = files.len();
    let start = std::time::Instant::now();

    let handles: Vec<_> = files
        .into_iter()
        .map(|file| {
            let store = Arc::clone(&store);
            let folder = folder.to_string();
            tokio::spawn(async move { store.upload(&file, &folder).await })
        })
        .collect();

    // Dropping a JoinHandle detaches its task, so a fast failure leaves siblings running.
    let joined = try_join_all(handles.into_iter().map(|handle| async move {
        match handle.await {
            Ok(result) => result,
            Err(e) => Err(RemoteStoreError::UploadFailed(format!(
                "upload task failed: {}",
                e
            ))),
        }
    }))
    .await;

    match joined {
        Ok(assets) => {
            tracing::info!(
                count,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Batch upload completed"
            );
            Ok(assets)
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                count,
                "Batch upload failed; already dispatched uploads are not rolled back"
            );
            Err(e)
        }
    }
}
