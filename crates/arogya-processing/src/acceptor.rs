//! Upload acceptor
//!
//! One generic acceptor drives every upload purpose from its
//! `UploadConstraintSet`. Parts are checked as they stream in, so a violation
//! is reported before the rest of the body is read and before anything is
//! staged. A session that returns an error must be dropped: the request fails
//! as a whole.

use arogya_core::models::normalize_mime_type;
use arogya_core::UploadConstraintSet;
use bytes::{Bytes, BytesMut};
use std::collections::HashMap;
use std::sync::Arc;

const MB: usize = 1024 * 1024;

/// Constraint violations detected while accepting a request
#[derive(Debug, thiserror::Error)]
pub enum AcceptError {
    #[error("Unsupported file type: {content_type}")]
    UnsupportedType { field: String, content_type: String },

    #[error("Unexpected field: {0}")]
    FieldNotAllowed(String),

    #[error("File too large. Maximum size is {}", format_limit(.max))]
    FileTooLarge { field: String, max: usize },

    #[error("{0}")]
    TooManyFiles(String),

    #[error("Missing required {noun}: {}", .fields.join(", "))]
    MissingRequiredField { noun: String, fields: Vec<String> },

    #[error("Empty file in field: {0}")]
    EmptyFile(String),

    #[error("Malformed multipart request: {0}")]
    MalformedRequest(String),
}

/// Human-readable size limit used in client-facing messages
pub fn format_limit(max: &usize) -> String {
    if *max >= MB && *max % MB == 0 {
        format!("{} MB", max / MB)
    } else {
        format!("{} bytes", max)
    }
}

/// A file that satisfied every constraint
#[derive(Debug, Clone)]
pub struct AcceptedFile {
    pub field_name: String,
    pub original_filename: Option<String>,
    pub content_type: String,
    pub data: Bytes,
}

impl AcceptedFile {
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

#[derive(Debug)]
struct OpenPart {
    field_name: String,
    original_filename: Option<String>,
    content_type: String,
    data: BytesMut,
}

/// Generic upload acceptor for one constraint set
#[derive(Debug, Clone)]
pub struct UploadAcceptor {
    constraints: Arc<UploadConstraintSet>,
}

impl UploadAcceptor {
    pub fn new(constraints: Arc<UploadConstraintSet>) -> Self {
        Self { constraints }
    }

    pub fn constraints(&self) -> &UploadConstraintSet {
        &self.constraints
    }

    /// Whether `name` is one of the declared file fields
    pub fn is_file_field(&self, name: &str) -> bool {
        self.constraints.field(name).is_some()
    }

    /// Start accepting one request
    pub fn session(&self) -> AcceptSession {
        AcceptSession {
            constraints: Arc::clone(&self.constraints),
            per_field: HashMap::new(),
            accepted: Vec::new(),
            open: None,
        }
    }
}

/// Per-request acceptance state
#[derive(Debug)]
pub struct AcceptSession {
    constraints: Arc<UploadConstraintSet>,
    per_field: HashMap<String, usize>,
    accepted: Vec<AcceptedFile>,
    open: Option<OpenPart>,
}

impl AcceptSession {
    /// Start a new file part. Any part still open is closed first.
    pub fn begin_part(
        &mut self,
        field_name: &str,
        original_filename: Option<&str>,
        content_type: Option<&str>,
    ) -> Result<(), AcceptError> {
        self.end_part()?;

        let constraints = &self.constraints;
        let content_type = content_type
            .map(normalize_mime_type)
            .unwrap_or_else(|| "application/octet-stream".to_string());

        if !constraints.allows_content_type(&content_type) {
            return Err(AcceptError::UnsupportedType {
                field: field_name.to_string(),
                content_type,
            });
        }

        let rule = constraints
            .field(field_name)
            .ok_or_else(|| AcceptError::FieldNotAllowed(field_name.to_string()))?;

        let count = self.per_field.get(field_name).copied().unwrap_or(0);
        if count + 1 > rule.max_count {
            return Err(AcceptError::TooManyFiles(format!(
                "Too many files. Maximum {} {} allowed",
                rule.max_count, rule.label
            )));
        }

        let total: usize = self.per_field.values().sum();
        if let Some(max_total) = constraints.max_total_files {
            if total + 1 > max_total {
                return Err(AcceptError::TooManyFiles(format!(
                    "Too many files. Maximum is {} {}",
                    max_total, constraints.item_noun
                )));
            }
        }

        self.per_field.insert(field_name.to_string(), count + 1);
        self.open = Some(OpenPart {
            field_name: field_name.to_string(),
            original_filename: original_filename.map(str::to_string),
            content_type,
            data: BytesMut::new(),
        });
        Ok(())
    }

    /// Append bytes to the open part. The size limit is inclusive.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Result<(), AcceptError> {
        let max = self.constraints.max_file_size;
        let part = self.open.as_mut().ok_or_else(|| {
            AcceptError::MalformedRequest("file data received outside a file part".to_string())
        })?;

        if part.data.len() + chunk.len() > max {
            return Err(AcceptError::FileTooLarge {
                field: part.field_name.clone(),
                max,
            });
        }
        part.data.extend_from_slice(chunk);
        Ok(())
    }

    /// Close the open part, if any.
    pub fn end_part(&mut self) -> Result<(), AcceptError> {
        if let Some(part) = self.open.take() {
            if part.data.is_empty() {
                return Err(AcceptError::EmptyFile(part.field_name));
            }
            self.accepted.push(AcceptedFile {
                field_name: part.field_name,
                original_filename: part.original_filename,
                content_type: part.content_type,
                data: part.data.freeze(),
            });
        }
        Ok(())
    }

    /// Number of files accepted so far, including an open part
    pub fn file_count(&self) -> usize {
        self.per_field.values().sum()
    }

    /// Close the request and check that every required field is present.
    /// Files are returned in the order they arrived.
    pub fn finish(mut self) -> Result<Vec<AcceptedFile>, AcceptError> {
        self.end_part()?;

        let missing: Vec<String> = self
            .constraints
            .required_fields()
            .filter(|name| self.per_field.get(*name).copied().unwrap_or(0) == 0)
            .map(str::to_string)
            .collect();

        if !missing.is_empty() {
            return Err(AcceptError::MissingRequiredField {
                noun: self.constraints.item_noun.clone(),
                fields: missing,
            });
        }

        Ok(self.accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_acceptor(max_size: usize) -> UploadAcceptor {
        UploadAcceptor::new(Arc::new(UploadConstraintSet::post_media(
            max_size,
            5,
            vec!["image/jpeg".into(), "image/png".into(), "video/mp4".into()],
        )))
    }

    fn document_acceptor() -> UploadAcceptor {
        UploadAcceptor::new(Arc::new(UploadConstraintSet::expert_documents(
            5 * MB,
            vec!["application/pdf".into(), "image/png".into()],
        )))
    }

    fn add_file(
        session: &mut AcceptSession,
        field: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<(), AcceptError> {
        session.begin_part(field, Some("file.bin"), Some(content_type))?;
        session.push_chunk(data)?;
        session.end_part()
    }

    #[test]
    fn test_size_limit_is_inclusive() {
        let acceptor = post_acceptor(10);

        let mut session = acceptor.session();
        add_file(&mut session, "images", "image/png", &[0u8; 10]).unwrap();
        assert_eq!(session.finish().unwrap()[0].size(), 10);

        let mut session = acceptor.session();
        let err = add_file(&mut session, "images", "image/png", &[0u8; 11]).unwrap_err();
        assert!(matches!(err, AcceptError::FileTooLarge { max: 10, .. }));
    }

    #[test]
    fn test_size_limit_applies_across_chunks() {
        let acceptor = post_acceptor(10);
        let mut session = acceptor.session();
        session.begin_part("images", None, Some("image/png")).unwrap();
        session.push_chunk(&[0u8; 6]).unwrap();
        let err = session.push_chunk(&[0u8; 5]).unwrap_err();
        assert_eq!(err.to_string(), "File too large. Maximum size is 10 bytes");
    }

    #[test]
    fn test_field_count_limit() {
        let acceptor = post_acceptor(MB);

        let mut session = acceptor.session();
        for _ in 0..5 {
            add_file(&mut session, "images", "image/jpeg", b"jpeg").unwrap();
        }
        assert_eq!(session.file_count(), 5);
        let err = add_file(&mut session, "images", "image/jpeg", b"jpeg").unwrap_err();
        assert_eq!(err.to_string(), "Too many files. Maximum 5 images allowed");

        let mut session = acceptor.session();
        for _ in 0..5 {
            add_file(&mut session, "images", "image/jpeg", b"jpeg").unwrap();
        }
        add_file(&mut session, "video", "video/mp4", b"mp4").unwrap();
        assert_eq!(session.finish().unwrap().len(), 6);
    }

    #[test]
    fn test_unsupported_type_rejected_before_field_check() {
        let acceptor = post_acceptor(MB);
        let mut session = acceptor.session();
        let err = session
            .begin_part("nope", Some("virus.exe"), Some("application/x-msdownload"))
            .unwrap_err();
        assert!(matches!(err, AcceptError::UnsupportedType { .. }));
        assert_eq!(
            err.to_string(),
            "Unsupported file type: application/x-msdownload"
        );
        assert_eq!(session.file_count(), 0);
    }

    #[test]
    fn test_undeclared_field_rejected() {
        let acceptor = post_acceptor(MB);
        let mut session = acceptor.session();
        let err = session
            .begin_part("avatar", Some("a.png"), Some("image/png"))
            .unwrap_err();
        assert!(matches!(err, AcceptError::FieldNotAllowed(ref f) if f == "avatar"));
    }

    #[test]
    fn test_expert_documents_practice_proof_optional() {
        let acceptor = document_acceptor();
        let mut session = acceptor.session();
        add_file(&mut session, "identityProof", "application/pdf", b"%PDF-1.4").unwrap();
        add_file(&mut session, "degreeCertificate", "image/png", b"png").unwrap();
        add_file(&mut session, "registrationProof", "application/pdf", b"%PDF-1.4").unwrap();

        let accepted = session.finish().unwrap();
        let fields: Vec<&str> = accepted.iter().map(|f| f.field_name.as_str()).collect();
        assert_eq!(
            fields,
            vec!["identityProof", "degreeCertificate", "registrationProof"]
        );
    }

    #[test]
    fn test_expert_documents_missing_required() {
        let acceptor = document_acceptor();
        let mut session = acceptor.session();
        add_file(&mut session, "identityProof", "application/pdf", b"%PDF-1.4").unwrap();
        add_file(&mut session, "registrationProof", "application/pdf", b"%PDF-1.4").unwrap();

        let err = session.finish().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required documents: degreeCertificate"
        );
    }

    #[test]
    fn test_expert_documents_one_per_field() {
        let acceptor = document_acceptor();
        let mut session = acceptor.session();
        add_file(&mut session, "identityProof", "application/pdf", b"%PDF-1.4").unwrap();
        let err = add_file(&mut session, "identityProof", "application/pdf", b"%PDF-1.4")
            .unwrap_err();
        assert!(matches!(err, AcceptError::TooManyFiles(_)));
    }

    #[test]
    fn test_content_type_parameters_are_ignored() {
        let acceptor = post_acceptor(MB);
        let mut session = acceptor.session();
        add_file(&mut session, "images", "Image/PNG; charset=binary", b"png").unwrap();
        let accepted = session.finish().unwrap();
        assert_eq!(accepted[0].content_type, "image/png");
    }

    #[test]
    fn test_empty_file_rejected() {
        let acceptor = post_acceptor(MB);
        let mut session = acceptor.session();
        session.begin_part("images", None, Some("image/png")).unwrap();
        assert!(matches!(session.end_part(), Err(AcceptError::EmptyFile(_))));
    }

    #[test]
    fn test_format_limit() {
        assert_eq!(format_limit(&(5 * MB)), "5 MB");
        assert_eq!(format_limit(&1500), "1500 bytes");
    }
}
