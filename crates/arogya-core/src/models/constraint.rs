//! Upload constraint sets
//!
//! A constraint set describes what one upload purpose accepts: the multipart
//! fields, how many files each field may carry, the allowed MIME types, the
//! per-file size limit and where accepted files are staged. New upload
//! purposes are added by building another set, not by adding control flow.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;

/// Logical purpose of an upload request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UploadPurpose {
    PostMedia,
    ExpertDocuments,
}

impl UploadPurpose {
    /// Directory segment used when files of this purpose are staged on disk.
    ///
    /// Each purpose gets its own directory so the retention sweeper can
    /// target it independently.
    pub fn staging_dir_name(&self) -> &'static str {
        match self {
            UploadPurpose::PostMedia => "post-images",
            UploadPurpose::ExpertDocuments => "expert-documents",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UploadPurpose::PostMedia => "post_media",
            UploadPurpose::ExpertDocuments => "expert_documents",
        }
    }
}

impl Display for UploadPurpose {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Where accepted files are buffered until the request completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoragePolicy {
    /// Bytes live only as long as the request
    Memory,
    /// Bytes are written under the purpose's staging directory and outlive the request
    Disk,
}

/// One named multipart file field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub name: String,
    pub max_count: usize,
    pub required: bool,
    /// Noun used in client-facing limit messages, e.g. "images"
    pub label: String,
}

impl FieldRule {
    pub fn required(name: impl Into<String>, max_count: usize, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_count,
            required: true,
            label: label.into(),
        }
    }

    pub fn optional(name: impl Into<String>, max_count: usize, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_count,
            required: false,
            label: label.into(),
        }
    }
}

/// Declarative upload constraints for one purpose
#[derive(Debug, Clone)]
pub struct UploadConstraintSet {
    pub purpose: UploadPurpose,
    pub fields: Vec<FieldRule>,
    pub allowed_content_types: Vec<String>,
    /// Maximum size of a single file in bytes (inclusive)
    pub max_file_size: usize,
    /// Optional limit across all fields
    pub max_total_files: Option<usize>,
    pub storage: StoragePolicy,
    /// Plural noun for the whole request, e.g. "documents"
    pub item_noun: String,
}

impl UploadConstraintSet {
    pub const POST_IMAGES_FIELD: &'static str = "images";
    pub const POST_VIDEO_FIELD: &'static str = "video";
    pub const IDENTITY_PROOF_FIELD: &'static str = "identityProof";
    pub const DEGREE_CERTIFICATE_FIELD: &'static str = "degreeCertificate";
    pub const REGISTRATION_PROOF_FIELD: &'static str = "registrationProof";
    pub const PRACTICE_PROOF_FIELD: &'static str = "practiceProof";

    /// Post media: up to `max_images` images plus one optional video, buffered in memory
    /// because every file is forwarded to the remote store immediately.
    pub fn post_media(
        max_file_size: usize,
        max_images: usize,
        allowed_content_types: Vec<String>,
    ) -> Self {
        Self {
            purpose: UploadPurpose::PostMedia,
            fields: vec![
                FieldRule::optional(Self::POST_IMAGES_FIELD, max_images, "images"),
                FieldRule::optional(Self::POST_VIDEO_FIELD, 1, "video"),
            ],
            allowed_content_types: normalize_all(allowed_content_types),
            max_file_size,
            max_total_files: None,
            storage: StoragePolicy::Memory,
            item_noun: "media files".to_string(),
        }
    }

    /// Expert verification documents, staged on disk so they remain available
    /// for manual review after the request completes.
    pub fn expert_documents(max_file_size: usize, allowed_content_types: Vec<String>) -> Self {
        Self {
            purpose: UploadPurpose::ExpertDocuments,
            fields: vec![
                FieldRule::required(Self::IDENTITY_PROOF_FIELD, 1, "identityProof document"),
                FieldRule::required(
                    Self::DEGREE_CERTIFICATE_FIELD,
                    1,
                    "degreeCertificate document",
                ),
                FieldRule::required(
                    Self::REGISTRATION_PROOF_FIELD,
                    1,
                    "registrationProof document",
                ),
                FieldRule::optional(Self::PRACTICE_PROOF_FIELD, 1, "practiceProof document"),
            ],
            allowed_content_types: normalize_all(allowed_content_types),
            max_file_size,
            max_total_files: Some(4),
            storage: StoragePolicy::Disk,
            item_noun: "documents".to_string(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Compares the normalized MIME type only, so parameters cannot bypass the allowlist.
    pub fn allows_content_type(&self, content_type: &str) -> bool {
        let normalized = normalize_mime_type(content_type);
        self.allowed_content_types.iter().any(|ct| *ct == normalized)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.as_str())
    }

    /// Largest number of files a single request can carry
    pub fn max_files_per_request(&self) -> usize {
        let per_field: usize = self.fields.iter().map(|f| f.max_count).sum();
        self.max_total_files
            .map(|total| total.min(per_field))
            .unwrap_or(per_field)
    }
}

/// Normalize a MIME type by stripping parameters and lowercasing
/// (e.g. "Image/JPEG; charset=utf-8" -> "image/jpeg").
pub fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
        .to_lowercase()
}

fn normalize_all(types: Vec<String>) -> Vec<String> {
    types
        .iter()
        .map(|t| normalize_mime_type(t))
        .filter(|t| !t.is_empty())
        .collect()
}
