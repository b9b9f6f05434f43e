//! Configuration module
//!
//! Configuration is read from the process environment once at startup and
//! passed explicitly to every component afterwards.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::models::UploadConstraintSet;
use crate::storage_types::RemoteStoreBackend;

const SERVER_PORT: u16 = 3000;
const RETENTION_WINDOW_HOURS: u64 = 24;
const RETENTION_SWEEP_INTERVAL_SECS: u64 = 86_400;
const POST_MEDIA_MAX_FILE_SIZE_MB: usize = 50;
const POST_MEDIA_MAX_FILES: usize = 5;
const EXPERT_DOCUMENT_MAX_FILE_SIZE_MB: usize = 5;
const CONTENT_VALIDATION_TIMEOUT_SECS: u64 = 30;
const ANTHROPIC_VISION_MODEL: &str = "claude-sonnet-4-20250514";

const POST_MEDIA_CONTENT_TYPES: &str =
    "image/jpeg,image/png,image/webp,image/gif,video/mp4,video/webm,video/quicktime";
const EXPERT_DOCUMENT_CONTENT_TYPES: &str = "application/pdf,image/jpeg,image/png";

/// Base server configuration
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
}

/// Media ingestion pipeline configuration
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub base: BaseConfig,
    // Staging and retention
    pub staging_dir: PathBuf,
    pub retention_window_hours: u64,
    pub retention_sweep_interval_secs: u64,
    pub retention_sweep_enabled: bool,
    // Remote object store
    pub remote_store_backend: RemoteStoreBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub s3_access_key_id: Option<String>,
    pub s3_secret_access_key: Option<String>,
    pub s3_session_token: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    pub cloudinary_cloud_name: Option<String>,
    pub cloudinary_api_key: Option<String>,
    pub cloudinary_api_secret: Option<String>,
    // Post media constraints
    pub post_media_max_file_size_bytes: usize,
    pub post_media_max_files: usize,
    pub post_media_allowed_content_types: Vec<String>,
    pub post_media_folder: String,
    // Expert document constraints
    pub expert_document_max_file_size_bytes: usize,
    pub expert_document_allowed_content_types: Vec<String>,
    pub expert_document_folder: String,
    // Content validation (Claude vision)
    pub content_validation_enabled: bool,
    pub anthropic_api_key: Option<String>,
    pub anthropic_vision_model: String,
    pub content_validation_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            base: BaseConfig {
                server_port: SERVER_PORT,
                cors_origins: vec!["*".to_string()],
                environment: "development".to_string(),
            },
            staging_dir: env::temp_dir().join("arogya-staging"),
            retention_window_hours: RETENTION_WINDOW_HOURS,
            retention_sweep_interval_secs: RETENTION_SWEEP_INTERVAL_SECS,
            retention_sweep_enabled: true,
            remote_store_backend: RemoteStoreBackend::Local,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            s3_access_key_id: None,
            s3_secret_access_key: None,
            s3_session_token: None,
            local_storage_path: Some("./media".to_string()),
            local_storage_base_url: Some("http://localhost:3000/media".to_string()),
            cloudinary_cloud_name: None,
            cloudinary_api_key: None,
            cloudinary_api_secret: None,
            post_media_max_file_size_bytes: POST_MEDIA_MAX_FILE_SIZE_MB * 1024 * 1024,
            post_media_max_files: POST_MEDIA_MAX_FILES,
            post_media_allowed_content_types: split_list(POST_MEDIA_CONTENT_TYPES),
            post_media_folder: "posts".to_string(),
            expert_document_max_file_size_bytes: EXPERT_DOCUMENT_MAX_FILE_SIZE_MB * 1024 * 1024,
            expert_document_allowed_content_types: split_list(EXPERT_DOCUMENT_CONTENT_TYPES),
            expert_document_folder: "expert-documents".to_string(),
            content_validation_enabled: false,
            anthropic_api_key: None,
            anthropic_vision_model: ANTHROPIC_VISION_MODEL.to_string(),
            content_validation_timeout_secs: CONTENT_VALIDATION_TIMEOUT_SECS,
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl PipelineConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| defaults.base.environment.clone());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
        };

        let remote_store_backend = match optional_var("REMOTE_STORE_BACKEND") {
            Some(value) => value.parse::<RemoteStoreBackend>()?,
            None => defaults.remote_store_backend,
        };

        let post_media_max_file_size_mb = env::var("POST_MEDIA_MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| POST_MEDIA_MAX_FILE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(POST_MEDIA_MAX_FILE_SIZE_MB);

        let expert_document_max_file_size_mb = env::var("EXPERT_DOCUMENT_MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| EXPERT_DOCUMENT_MAX_FILE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(EXPERT_DOCUMENT_MAX_FILE_SIZE_MB);

        let anthropic_api_key = optional_var("ANTHROPIC_API_KEY");
        let content_validation_enabled = env::var("CONTENT_VALIDATION_ENABLED")
            .map(|v| parse_bool(&v))
            .unwrap_or(anthropic_api_key.is_some());

        Ok(Self {
            base,
            staging_dir: optional_var("STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.staging_dir),
            retention_window_hours: env::var("RETENTION_WINDOW_HOURS")
                .unwrap_or_else(|_| RETENTION_WINDOW_HOURS.to_string())
                .parse()
                .unwrap_or(RETENTION_WINDOW_HOURS),
            retention_sweep_interval_secs: env::var("RETENTION_SWEEP_INTERVAL_SECS")
                .unwrap_or_else(|_| RETENTION_SWEEP_INTERVAL_SECS.to_string())
                .parse()
                .unwrap_or(RETENTION_SWEEP_INTERVAL_SECS),
            retention_sweep_enabled: env::var("RETENTION_SWEEP_ENABLED")
                .map(|v| parse_bool(&v))
                .unwrap_or(true),
            remote_store_backend,
            s3_bucket: optional_var("S3_BUCKET"),
            s3_region: optional_var("S3_REGION").or_else(|| optional_var("AWS_REGION")),
            s3_endpoint: optional_var("S3_ENDPOINT"),
            s3_access_key_id: optional_var("S3_ACCESS_KEY_ID")
                .or_else(|| optional_var("AWS_ACCESS_KEY_ID")),
            s3_secret_access_key: optional_var("S3_SECRET_ACCESS_KEY")
                .or_else(|| optional_var("AWS_SECRET_ACCESS_KEY")),
            s3_session_token: optional_var("S3_SESSION_TOKEN")
                .or_else(|| optional_var("AWS_SESSION_TOKEN")),
            local_storage_path: optional_var("LOCAL_STORAGE_PATH")
                .or(defaults.local_storage_path),
            local_storage_base_url: optional_var("LOCAL_STORAGE_BASE_URL")
                .or(defaults.local_storage_base_url),
            cloudinary_cloud_name: optional_var("CLOUDINARY_CLOUD_NAME"),
            cloudinary_api_key: optional_var("CLOUDINARY_API_KEY"),
            cloudinary_api_secret: optional_var("CLOUDINARY_API_SECRET"),
            post_media_max_file_size_bytes: post_media_max_file_size_mb * 1024 * 1024,
            post_media_max_files: env::var("POST_MEDIA_MAX_FILES")
                .unwrap_or_else(|_| POST_MEDIA_MAX_FILES.to_string())
                .parse()
                .unwrap_or(POST_MEDIA_MAX_FILES),
            post_media_allowed_content_types: split_list(
                &env::var("POST_MEDIA_ALLOWED_CONTENT_TYPES")
                    .unwrap_or_else(|_| POST_MEDIA_CONTENT_TYPES.to_string()),
            ),
            post_media_folder: optional_var("POST_MEDIA_FOLDER")
                .unwrap_or(defaults.post_media_folder),
            expert_document_max_file_size_bytes: expert_document_max_file_size_mb * 1024 * 1024,
            expert_document_allowed_content_types: split_list(
                &env::var("EXPERT_DOCUMENT_ALLOWED_CONTENT_TYPES")
                    .unwrap_or_else(|_| EXPERT_DOCUMENT_CONTENT_TYPES.to_string()),
            ),
            expert_document_folder: optional_var("EXPERT_DOCUMENT_FOLDER")
                .unwrap_or(defaults.expert_document_folder),
            content_validation_enabled,
            anthropic_api_key,
            anthropic_vision_model: optional_var("ANTHROPIC_VISION_MODEL")
                .unwrap_or(defaults.anthropic_vision_model),
            content_validation_timeout_secs: env::var("CONTENT_VALIDATION_TIMEOUT_SECS")
                .unwrap_or_else(|_| CONTENT_VALIDATION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONTENT_VALIDATION_TIMEOUT_SECS),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.post_media_max_file_size_bytes == 0 || self.expert_document_max_file_size_bytes == 0
        {
            return Err(anyhow::anyhow!("Maximum file sizes must be greater than zero"));
        }

        if self.post_media_max_files == 0 {
            return Err(anyhow::anyhow!("POST_MEDIA_MAX_FILES must be greater than zero"));
        }

        if self.post_media_allowed_content_types.is_empty()
            || self.expert_document_allowed_content_types.is_empty()
        {
            return Err(anyhow::anyhow!("Allowed content type lists cannot be empty"));
        }

        if self.retention_window_hours == 0 {
            return Err(anyhow::anyhow!(
                "RETENTION_WINDOW_HOURS must be greater than zero"
            ));
        }

        if self.retention_sweep_enabled && self.retention_sweep_interval_secs == 0 {
            return Err(anyhow::anyhow!(
                "RETENTION_SWEEP_INTERVAL_SECS must be greater than zero"
            ));
        }

        match self.remote_store_backend {
            RemoteStoreBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET is required when REMOTE_STORE_BACKEND=s3"
                    ));
                }
                if self.s3_access_key_id.is_none() || self.s3_secret_access_key.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_ACCESS_KEY_ID and S3_SECRET_ACCESS_KEY are required when REMOTE_STORE_BACKEND=s3"
                    ));
                }
            }
            RemoteStoreBackend::Cloudinary => {
                if self.cloudinary_cloud_name.is_none()
                    || self.cloudinary_api_key.is_none()
                    || self.cloudinary_api_secret.is_none()
                {
                    return Err(anyhow::anyhow!(
                        "CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET are required when REMOTE_STORE_BACKEND=cloudinary"
                    ));
                }
            }
            RemoteStoreBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH is required when REMOTE_STORE_BACKEND=local"
                    ));
                }
            }
        }

        if self.content_validation_enabled && self.anthropic_api_key.is_none() {
            return Err(anyhow::anyhow!(
                "CONTENT_VALIDATION_ENABLED=true requires ANTHROPIC_API_KEY to be set"
            ));
        }

        Ok(())
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config(pub Box<PipelineConfig>);

impl Config {
    fn as_pipeline(&self) -> &PipelineConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = PipelineConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_pipeline().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.as_pipeline().base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.as_pipeline().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_pipeline().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_pipeline().base.environment
    }

    pub fn staging_dir(&self) -> &PathBuf {
        &self.as_pipeline().staging_dir
    }

    pub fn retention_window(&self) -> Duration {
        Duration::from_secs(self.as_pipeline().retention_window_hours * 3600)
    }

    pub fn retention_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.as_pipeline().retention_sweep_interval_secs)
    }

    pub fn retention_sweep_enabled(&self) -> bool {
        self.as_pipeline().retention_sweep_enabled
    }

    pub fn remote_store_backend(&self) -> RemoteStoreBackend {
        self.as_pipeline().remote_store_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.as_pipeline().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.as_pipeline().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.as_pipeline().s3_endpoint.as_deref()
    }

    pub fn s3_access_key_id(&self) -> Option<&str> {
        self.as_pipeline().s3_access_key_id.as_deref()
    }

    pub fn s3_secret_access_key(&self) -> Option<&str> {
        self.as_pipeline().s3_secret_access_key.as_deref()
    }

    pub fn s3_session_token(&self) -> Option<&str> {
        self.as_pipeline().s3_session_token.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.as_pipeline().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.as_pipeline().local_storage_base_url.as_deref()
    }

    pub fn cloudinary_cloud_name(&self) -> Option<&str> {
        self.as_pipeline().cloudinary_cloud_name.as_deref()
    }

    pub fn cloudinary_api_key(&self) -> Option<&str> {
        self.as_pipeline().cloudinary_api_key.as_deref()
    }

    pub fn cloudinary_api_secret(&self) -> Option<&str> {
        self.as_pipeline().cloudinary_api_secret.as_deref()
    }

    pub fn post_media_folder(&self) -> &str {
        &self.as_pipeline().post_media_folder
    }

    pub fn expert_document_folder(&self) -> &str {
        &self.as_pipeline().expert_document_folder
    }

    /// Largest request body the HTTP layer should admit, with headroom for multipart framing
    pub fn max_request_body_bytes(&self) -> usize {
        let c = self.as_pipeline();
        let post = c.post_media_max_file_size_bytes * (c.post_media_max_files + 1);
        let docs = c.expert_document_max_file_size_bytes * 4;
        post.max(docs) + 1024 * 1024
    }

    pub fn content_validation_enabled(&self) -> bool {
        self.as_pipeline().content_validation_enabled
    }

    pub fn anthropic_api_key(&self) -> Option<&str> {
        self.as_pipeline().anthropic_api_key.as_deref()
    }

    pub fn anthropic_vision_model(&self) -> &str {
        &self.as_pipeline().anthropic_vision_model
    }

    pub fn content_validation_timeout(&self) -> Duration {
        Duration::from_secs(self.as_pipeline().content_validation_timeout_secs)
    }

    /// Constraint set for post media uploads
    pub fn post_media_constraints(&self) -> UploadConstraintSet {
        let c = self.as_pipeline();
        UploadConstraintSet::post_media(
            c.post_media_max_file_size_bytes,
            c.post_media_max_files,
            c.post_media_allowed_content_types.clone(),
        )
    }

    /// Constraint set for expert verification documents
    pub fn expert_document_constraints(&self) -> UploadConstraintSet {
        let c = self.as_pipeline();
        UploadConstraintSet::expert_documents(
            c.expert_document_max_file_size_bytes,
            c.expert_document_allowed_content_types.clone(),
        )
    }
}

impl From<PipelineConfig> for Config {
    fn from(config: PipelineConfig) -> Self {
        Config(Box::new(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StoragePolicy, UploadPurpose};

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::from(PipelineConfig::default());
        assert!(config.validate().is_ok());
        assert_eq!(config.retention_window(), Duration::from_secs(24 * 3600));
        assert_eq!(config.remote_store_backend(), RemoteStoreBackend::Local);
        assert!(!config.is_production());
    }

    #[test]
    fn test_constraint_sets_follow_config() {
        let config = Config::from(PipelineConfig::default());

        let post = config.post_media_constraints();
        assert_eq!(post.purpose, UploadPurpose::PostMedia);
        assert_eq!(post.max_file_size, 50 * 1024 * 1024);
        assert!(post.allows_content_type("video/mp4"));

        let docs = config.expert_document_constraints();
        assert_eq!(docs.storage, StoragePolicy::Disk);
        assert_eq!(docs.max_file_size, 5 * 1024 * 1024);
        assert!(docs.allows_content_type("application/pdf"));
        assert!(!docs.allows_content_type("video/mp4"));
    }

    #[test]
    fn test_validate_rejects_zero_retention_window() {
        let config = PipelineConfig {
            retention_window_hours: 0,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_requires_backend_credentials() {
        let s3 = PipelineConfig {
            remote_store_backend: RemoteStoreBackend::S3,
            ..PipelineConfig::default()
        };
        assert!(s3.validate().is_err());

        let s3_without_keys = PipelineConfig {
            remote_store_backend: RemoteStoreBackend::S3,
            s3_bucket: Some("media".to_string()),
            ..PipelineConfig::default()
        };
        assert!(s3_without_keys.validate().is_err());

        let cloudinary = PipelineConfig {
            remote_store_backend: RemoteStoreBackend::Cloudinary,
            cloudinary_cloud_name: Some("demo".to_string()),
            cloudinary_api_key: Some("key".to_string()),
            ..PipelineConfig::default()
        };
        assert!(cloudinary.validate().is_err());
    }

    #[test]
    fn test_validate_requires_key_for_content_validation() {
        let config = PipelineConfig {
            content_validation_enabled: true,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("TRUE"));
        assert!(parse_bool(" 1 "));
        assert!(!parse_bool("off"));
    }
}
