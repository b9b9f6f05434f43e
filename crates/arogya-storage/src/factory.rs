#[cfg(feature = "storage-cloudinary")]
use crate::{CloudinaryCredentials, CloudinaryStore};
#[cfg(feature = "storage-local")]
use crate::LocalStore;
#[cfg(feature = "storage-s3")]
use crate::{S3Credentials, S3Store};
use crate::{RemoteStore, RemoteStoreBackend, RemoteStoreError, RemoteStoreResult};
use arogya_core::Config;
use std::sync::Arc;

fn required(value: Option<&str>, name: &str) -> RemoteStoreResult<String> {
    value
        .map(String::from)
        .ok_or_else(|| RemoteStoreError::ConfigError(format!("{} not configured", name)))
}

/// S3 access keys come from configuration only, never from `AWS_*` variables.
#[cfg(feature = "storage-s3")]
fn s3_credentials(config: &Config) -> RemoteStoreResult<S3Credentials> {
    Ok(S3Credentials {
        access_key_id: required(config.s3_access_key_id(), "S3_ACCESS_KEY_ID")?,
        secret_access_key: required(config.s3_secret_access_key(), "S3_SECRET_ACCESS_KEY")?,
        session_token: config.s3_session_token().map(String::from),
    })
}

/// Create the remote store selected by configuration
pub async fn create_remote_store(config: &Config) -> RemoteStoreResult<Arc<dyn RemoteStore>> {
    match config.remote_store_backend() {
        #[cfg(feature = "storage-s3")]
        RemoteStoreBackend::S3 => {
            let bucket = required(config.s3_bucket(), "S3_BUCKET")?;
            let region = required(config.s3_region(), "S3_REGION or AWS_REGION")?;
            let endpoint = config.s3_endpoint().map(String::from);

            let credentials = s3_credentials(config)?;

            let store = S3Store::new(bucket, region, endpoint, credentials)?;
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "storage-s3"))]
        RemoteStoreBackend::S3 => Err(RemoteStoreError::ConfigError(
            "S3 backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-cloudinary")]
        RemoteStoreBackend::Cloudinary => {
            let credentials = CloudinaryCredentials {
                cloud_name: required(config.cloudinary_cloud_name(), "CLOUDINARY_CLOUD_NAME")?,
                api_key: required(config.cloudinary_api_key(), "CLOUDINARY_API_KEY")?,
                api_secret: required(config.cloudinary_api_secret(), "CLOUDINARY_API_SECRET")?,
            };

            let store = CloudinaryStore::new(credentials)?;
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "storage-cloudinary"))]
        RemoteStoreBackend::Cloudinary => Err(RemoteStoreError::ConfigError(
            "Cloudinary backend not available (storage-cloudinary feature not enabled)"
                .to_string(),
        )),

        #[cfg(feature = "storage-local")]
        RemoteStoreBackend::Local => {
            let base_path = required(config.local_storage_path(), "LOCAL_STORAGE_PATH")?;
            let base_url = required(config.local_storage_base_url(), "LOCAL_STORAGE_BASE_URL")?;

            let store = LocalStore::new(base_path, base_url).await?;
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "storage-local"))]
        RemoteStoreBackend::Local => Err(RemoteStoreError::ConfigError(
            "Local backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}
