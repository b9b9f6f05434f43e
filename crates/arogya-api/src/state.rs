//! Application state shared by every handler.
//!
//! Everything here is built once at startup and read-only afterwards. The
//! remote store and content validator are trait objects so tests can swap in
//! stubs without touching the handlers.

use arogya_core::{Config, UploadConstraintSet};
use arogya_processing::{DocumentTextExtractor, StagingStore, UploadAcceptor};
use arogya_services::{ContentValidator, ModerationPolicy};
use arogya_storage::RemoteStore;
use std::sync::Arc;

/// Acceptor plus destination folder for one upload purpose
#[derive(Clone)]
pub struct UploadRoute {
    pub acceptor: UploadAcceptor,
    pub folder: String,
}

impl UploadRoute {
    pub fn new(constraints: UploadConstraintSet, folder: impl Into<String>) -> Self {
        Self {
            acceptor: UploadAcceptor::new(Arc::new(constraints)),
            folder: folder.into(),
        }
    }

    pub fn constraints(&self) -> &UploadConstraintSet {
        self.acceptor.constraints()
    }
}

/// Content validation wiring. `validator` is `None` when validation is disabled.
#[derive(Clone)]
pub struct ModerationState {
    pub validator: Option<Arc<dyn ContentValidator>>,
    pub policy: ModerationPolicy,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub post_media: UploadRoute,
    pub expert_documents: UploadRoute,
    pub staging: StagingStore,
    pub remote_store: Arc<dyn RemoteStore>,
    pub extractor: DocumentTextExtractor,
    pub moderation: ModerationState,
    /// Fixed at startup: error details are shown to clients only outside production
    pub expose_error_details: bool,
}

impl AppState {
    /// Build state from configuration and already-constructed collaborators.
    pub fn new(
        config: Config,
        remote_store: Arc<dyn RemoteStore>,
        validator: Option<Arc<dyn ContentValidator>>,
    ) -> Self {
        let post_media = UploadRoute::new(
            config.post_media_constraints(),
            config.post_media_folder(),
        );
        let expert_documents = UploadRoute::new(
            config.expert_document_constraints(),
            config.expert_document_folder(),
        );
        let staging = StagingStore::new(config.staging_dir().clone());
        let expose_error_details = !config.is_production();

        Self {
            config,
            post_media,
            expert_documents,
            staging,
            remote_store,
            extractor: DocumentTextExtractor::new(),
            moderation: ModerationState {
                validator,
                policy: ModerationPolicy::indigenous_dairy(),
            },
            expose_error_details,
        }
    }
}
