//! Content sniffing from leading magic bytes.
//!
//! Remote backends use this to pick the resource kind from the content
//! itself rather than trusting the MIME type declared by the client.

use crate::models::{normalize_mime_type, ResourceKind};

/// Detected resource kind and content type for a buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sniffed {
    pub kind: ResourceKind,
    pub content_type: String,
}

/// Detect a content type from magic bytes. Returns `None` when unrecognized.
pub fn detect_content_type(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some("image/png")
    } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        Some("image/webp")
    } else if data.starts_with(b"%PDF-") {
        Some("application/pdf")
    } else if data.len() >= 12 && &data[4..8] == b"ftyp" {
        if &data[8..10] == b"qt" {
            Some("video/quicktime")
        } else {
            Some("video/mp4")
        }
    } else if data.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
        Some("video/webm")
    } else {
        None
    }
}

/// Map a content type to the resource kind a remote store files it under.
pub fn kind_for_content_type(content_type: &str) -> ResourceKind {
    let normalized = normalize_mime_type(content_type);
    if normalized.starts_with("image/") {
        ResourceKind::Image
    } else if normalized.starts_with("video/") {
        ResourceKind::Video
    } else {
        ResourceKind::Raw
    }
}

/// Sniff `data`, falling back to the declared type when the bytes are not recognized.
pub fn sniff(data: &[u8], declared: &str) -> Sniffed {
    let content_type = detect_content_type(data)
        .map(str::to_string)
        .unwrap_or_else(|| normalize_mime_type(declared));
    Sniffed {
        kind: kind_for_content_type(&content_type),
        content_type,
    }
}

/// File extension for a content type, used when naming staged and remote files.
pub fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    match normalize_mime_type(content_type).as_str() {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "application/pdf" => Some("pdf"),
        "video/mp4" => Some("mp4"),
        "video/webm" => Some("webm"),
        "video/quicktime" => Some("mov"),
        _ => None,
    }
}

/// Content type for a file extension or remote format name such as `jpg`.
pub fn content_type_for_extension(extension: &str) -> Option<&'static str> {
    match extension.trim_start_matches('.').to_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "pdf" => Some("application/pdf"),
        "mp4" => Some("video/mp4"),
        "webm" => Some("video/webm"),
        "mov" => Some("video/quicktime"),
        _ => None,
    }
}
