use crate::keys::remote_key;
use crate::traits::{RemoteStore, RemoteStoreError, RemoteStoreResult};
use crate::RemoteStoreBackend;
use arogya_core::sniff::sniff;
use arogya_core::{RemoteAsset, StagedFile};
use async_trait::async_trait;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::{
    Attribute, Attributes, ObjectStore, PutOptions, PutPayload,
    Result as ObjectResult, RetryConfig,
};

/// Static access keys, passed in explicitly at construction
#[derive(Clone)]
pub struct S3Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl std::fmt::Debug for S3Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// S3-compatible remote store
#[derive(Clone)]
pub struct S3Store {
    store: AmazonS3,
    bucket: String,
    region: String,
    endpoint_url: Option<String>,
}

impl S3Store {
    /// Create a new S3Store
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    /// * `credentials` - Access keys; the process environment is never consulted
    ///
    /// Client retries are disabled: each file is at most one round trip.
    pub fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        credentials: S3Credentials,
    ) -> RemoteStoreResult<Self> {
        let store = Self::builder(&bucket, &region, endpoint_url.as_deref(), &credentials)
            .build()
            .map_err(|e| RemoteStoreError::ConfigError(e.to_string()))?;

        Ok(S3Store {
            store,
            bucket,
            region,
            endpoint_url,
        })
    }

    fn builder(
        bucket: &str,
        region: &str,
        endpoint_url: Option<&str>,
        credentials: &S3Credentials,
    ) -> AmazonS3Builder {
        let retry = RetryConfig {
            max_retries: 0,
            ..RetryConfig::default()
        };

        let mut builder = AmazonS3Builder::new()
            .with_region(region)
            .with_bucket_name(bucket)
            .with_access_key_id(&credentials.access_key_id)
            .with_secret_access_key(&credentials.secret_access_key)
            .with_retry(retry);

        if let Some(token) = &credentials.session_token {
            builder = builder.with_token(token);
        }

        if let Some(endpoint) = endpoint_url {
            builder = builder
                .with_endpoint(endpoint)
                .with_allow_http(endpoint.starts_with("http://"));
        }

        builder
    }

    /// Public URL for an object.
    ///
    /// AWS uses `https://{bucket}.s3.{region}.amazonaws.com/{key}`; custom
    /// endpoints use path style `{endpoint}/{bucket}/{key}`.
    fn generate_url(&self, key: &str) -> String {
        if let Some(ref endpoint) = self.endpoint_url {
            let base_url = endpoint.trim_end_matches('/');
            format!("{}/{}/{}", base_url, self.bucket, key)
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            )
        }
    }
}

#[async_trait]
impl RemoteStore for S3Store {
    async fn upload(&self, file: &StagedFile, folder: &str) -> RemoteStoreResult<RemoteAsset> {
        let data = file.read().await?;
        let key = remote_key(folder, &file.staged_name)?;
        let sniffed = sniff(&data, &file.content_type);
        let size = data.len();
        let location = Path::from(key.clone());

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, sniffed.content_type.clone().into());
        let opts = PutOptions {
            attributes,
            ..PutOptions::default()
        };

        let start = std::time::Instant::now();

        let result: ObjectResult<_> = self
            .store
            .put_opts(&location, PutPayload::from(data), opts)
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            RemoteStoreError::UploadFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            resource_kind = %sniffed.kind,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(RemoteAsset::new(
            self.generate_url(&key),
            key,
            sniffed.kind,
            size,
            sniffed.content_type,
        ))
    }

    fn backend_type(&self) -> RemoteStoreBackend {
        RemoteStoreBackend::S3
    }
}
