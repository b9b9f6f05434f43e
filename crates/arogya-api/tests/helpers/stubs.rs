//! Stand-in remote store and content validator.

use arogya_core::{RemoteAsset, StagedFile, ValidationVerdict};
use arogya_services::{ContentValidator, ModerationError, ModerationPolicy};
use arogya_storage::{RemoteStore, RemoteStoreBackend, RemoteStoreError, RemoteStoreResult};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Remote store whose every upload fails
pub struct FailingStore;

#[async_trait]
impl RemoteStore for FailingStore {
    async fn upload(&self, _file: &StagedFile, _folder: &str) -> RemoteStoreResult<RemoteAsset> {
        Err(RemoteStoreError::UploadFailed(
            "connection reset by peer".to_string(),
        ))
    }

    fn backend_type(&self) -> RemoteStoreBackend {
        RemoteStoreBackend::Local
    }
}

/// Validator that answers every item the same way and counts calls
pub struct StubValidator {
    outcome: Result<ValidationVerdict, String>,
    calls: AtomicUsize,
}

impl StubValidator {
    pub fn verdict(verdict: ValidationVerdict) -> Self {
        Self {
            outcome: Ok(verdict),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unavailable(detail: &str) -> Self {
        Self {
            outcome: Err(detail.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentValidator for StubValidator {
    async fn validate(
        &self,
        _item: &StagedFile,
        _policy: &ModerationPolicy,
    ) -> Result<ValidationVerdict, ModerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome
            .clone()
            .map_err(ModerationError::Unavailable)
    }
}
