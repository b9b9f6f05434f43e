//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p arogya-api`.

pub mod fixtures;
pub mod stubs;

use arogya_api::constants;
use arogya_api::setup::routes;
use arogya_api::state::AppState;
use arogya_core::{Config, PipelineConfig};
use arogya_services::ContentValidator;
use arogya_storage::{LocalStore, RemoteStore};
use axum_test::TestServer;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Per-file limit for expert documents in tests, small enough to exceed cheaply
pub const TEST_DOCUMENT_MAX_BYTES: usize = 1024 * 1024;

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server, state, and owned temp directories.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub staging_dir: TempDir,
    pub media_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Directory that disk-staged expert documents land in
    pub fn expert_staging_dir(&self) -> PathBuf {
        self.staging_dir.path().join("expert-documents")
    }

    /// Directory the local remote store writes post media into
    pub fn post_media_dir(&self) -> PathBuf {
        self.media_dir.path().join("posts")
    }
}

pub fn create_test_config(staging_dir: &Path, media_dir: &Path) -> PipelineConfig {
    PipelineConfig {
        staging_dir: staging_dir.to_path_buf(),
        local_storage_path: Some(media_dir.to_string_lossy().to_string()),
        local_storage_base_url: Some("http://localhost:3000/media".to_string()),
        expert_document_max_file_size_bytes: TEST_DOCUMENT_MAX_BYTES,
        retention_sweep_enabled: false,
        ..PipelineConfig::default()
    }
}

/// App backed by a local remote store and no content validator.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(None, None).await
}

/// App with an optional replacement remote store and content validator.
pub async fn setup_test_app_with(
    store: Option<Arc<dyn RemoteStore>>,
    validator: Option<Arc<dyn ContentValidator>>,
) -> TestApp {
    build_test_app(store, validator, |_| {}).await
}

/// App whose test configuration is adjusted by `configure` before startup.
pub async fn setup_test_app_configured(configure: impl FnOnce(&mut PipelineConfig)) -> TestApp {
    build_test_app(None, None, configure).await
}

async fn build_test_app(
    store: Option<Arc<dyn RemoteStore>>,
    validator: Option<Arc<dyn ContentValidator>>,
    configure: impl FnOnce(&mut PipelineConfig),
) -> TestApp {
    let staging_dir = tempfile::tempdir().expect("Failed to create staging directory");
    let media_dir = tempfile::tempdir().expect("Failed to create media directory");
    let mut pipeline = create_test_config(staging_dir.path(), media_dir.path());
    configure(&mut pipeline);
    let config = Config::from(pipeline);

    let store = match store {
        Some(store) => store,
        None => Arc::new(
            LocalStore::new(
                media_dir.path().to_path_buf(),
                "http://localhost:3000/media".to_string(),
            )
            .await
            .expect("Failed to create local store"),
        ),
    };

    let state = Arc::new(AppState::new(config.clone(), store, validator));
    let router = routes::setup_routes(&config, state.clone()).expect("Failed to build routes");
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        state,
        staging_dir,
        media_dir,
    }
}

/// Number of regular files directly inside `dir`; a missing directory counts as empty.
pub fn count_files(dir: &Path) -> usize {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(Result::ok)
            .filter(|e| e.path().is_file())
            .count(),
        Err(_) => 0,
    }
}
