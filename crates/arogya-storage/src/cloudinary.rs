//! Cloudinary remote store
//!
//! Files go through a signed upload to the `auto` endpoint, so Cloudinary
//! picks the resource type from the content itself.

use crate::traits::{RemoteStore, RemoteStoreError, RemoteStoreResult};
use crate::RemoteStoreBackend;
use arogya_core::sniff::{content_type_for_extension, sniff};
use arogya_core::{RemoteAsset, ResourceKind, StagedFile};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::Duration;

const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";
const UPLOAD_TIMEOUT_SECS: u64 = 120;

/// Account credentials, passed in explicitly at construction
#[derive(Clone)]
pub struct CloudinaryCredentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl std::fmt::Debug for CloudinaryCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryCredentials")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
    resource_type: String,
    #[serde(default)]
    bytes: Option<usize>,
    #[serde(default)]
    format: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ApiErrorMessage {
    message: String,
}

#[derive(Clone)]
pub struct CloudinaryStore {
    client: reqwest::Client,
    credentials: CloudinaryCredentials,
    api_base: String,
}

impl CloudinaryStore {
    pub fn new(credentials: CloudinaryCredentials) -> RemoteStoreResult<Self> {
        Self::with_api_base(credentials, DEFAULT_API_BASE)
    }

    /// Point the store at a different API host (used against mock servers).
    pub fn with_api_base(
        credentials: CloudinaryCredentials,
        api_base: impl Into<String>,
    ) -> RemoteStoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(UPLOAD_TIMEOUT_SECS))
            .build()
            .map_err(|e| RemoteStoreError::ConfigError(e.to_string()))?;

        Ok(Self {
            client,
            credentials,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, resource_type: &str, action: &str) -> String {
        format!(
            "{}/v1_1/{}/{}/{}",
            self.api_base, self.credentials.cloud_name, resource_type, action
        )
    }

    /// Sign parameters: sorted `key=value` pairs joined with `&`, secret appended, SHA-256 hex.
    fn sign(&self, params: &[(&str, String)]) -> String {
        let mut sorted: Vec<&(&str, String)> = params.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));
        let to_sign = sorted
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha256::new();
        hasher.update(to_sign.as_bytes());
        hasher.update(self.credentials.api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    async fn error_detail(response: reqwest::Response) -> String {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ApiErrorBody>(&body) {
            Ok(parsed) => format!("{}: {}", status, parsed.error.message),
            Err(_) => format!("{}: {}", status, body),
        }
    }
}

fn resource_kind_from(resource_type: &str) -> ResourceKind {
    match resource_type {
        "image" => ResourceKind::Image,
        "video" => ResourceKind::Video,
        _ => ResourceKind::Raw,
    }
}

fn public_id_for(file: &StagedFile) -> String {
    file.staged_name
        .rsplit_once('.')
        .map(|(stem, _)| stem.to_string())
        .unwrap_or_else(|| file.staged_name.clone())
}

#[async_trait]
impl RemoteStore for CloudinaryStore {
    async fn upload(&self, file: &StagedFile, folder: &str) -> RemoteStoreResult<RemoteAsset> {
        if folder.contains("..") {
            return Err(RemoteStoreError::InvalidKey(folder.to_string()));
        }
        let data = file.read().await?;
        let size = data.len();
        let folder = folder.trim_matches('/').to_string();
        let public_id = public_id_for(file);
        let timestamp = chrono::Utc::now().timestamp().to_string();

        let params = vec![
            ("folder", folder.clone()),
            ("public_id", public_id.clone()),
            ("timestamp", timestamp.clone()),
        ];
        let signature = self.sign(&params);

        let part = Part::bytes(data.to_vec())
            .file_name(file.staged_name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| RemoteStoreError::UploadFailed(e.to_string()))?;

        let form = Form::new()
            .part("file", part)
            .text("api_key", self.credentials.api_key.clone())
            .text("folder", folder)
            .text("public_id", public_id)
            .text("timestamp", timestamp)
            .text("signature_algorithm", "sha256")
            .text("signature", signature);

        let start = std::time::Instant::now();

        let response = self
            .client
            .post(self.endpoint("auto", "upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    staged_name = %file.staged_name,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Cloudinary upload request failed"
                );
                RemoteStoreError::UploadFailed(e.to_string())
            })?;

        if !response.status().is_success() {
            let detail = Self::error_detail(response).await;
            tracing::error!(
                detail = %detail,
                staged_name = %file.staged_name,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Cloudinary upload rejected"
            );
            return Err(RemoteStoreError::UploadFailed(detail));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| RemoteStoreError::UploadFailed(format!("Invalid response: {}", e)))?;

        let kind = resource_kind_from(&body.resource_type);
        // Cloudinary reports a format name ("jpg"), not a MIME type.
        let content_type = body
            .format
            .as_deref()
            .and_then(content_type_for_extension)
            .map(String::from)
            .unwrap_or_else(|| sniff(&data, &file.content_type).content_type);

        tracing::info!(
            public_id = %body.public_id,
            resource_kind = %kind,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Cloudinary upload successful"
        );

        Ok(RemoteAsset::new(
            body.secure_url,
            body.public_id,
            kind,
            body.bytes.unwrap_or(size),
            content_type,
        ))
    }

    fn backend_type(&self) -> RemoteStoreBackend {
        RemoteStoreBackend::Cloudinary
    }
}
