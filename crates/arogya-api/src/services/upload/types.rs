use arogya_core::{ExtractedText, RemoteAsset};
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Rejection attached to a post whose media failed content validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct InvalidMark {
    pub reason: String,
}

/// Draft post assembled from one media upload
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PostDraft {
    /// Plain form fields sent alongside the media, e.g. `title`
    pub fields: BTreeMap<String, String>,
    /// Uploaded media in the order the files were sent
    pub media: Vec<RemoteAsset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid: Option<InvalidMark>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PostResponse {
    pub post: PostDraft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Pending,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VerificationDocument {
    /// Multipart field the document was sent under, e.g. `identityProof`
    pub field: String,
    pub asset: RemoteAsset,
    /// Present for PDF documents only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<ExtractedText>,
}

/// Expert verification record awaiting manual review
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VerificationRecord {
    pub status: VerificationStatus,
    pub documents: Vec<VerificationDocument>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VerificationResponse {
    pub verification: VerificationRecord,
}
