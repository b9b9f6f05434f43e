//! Drive an `AcceptSession` from an axum multipart body.
//!
//! File parts are fed to the acceptor chunk by chunk, so a constraint
//! violation stops reading the body immediately. Parts without a filename
//! under an undeclared field name are plain form fields.

use crate::error::HttpAppError;
use arogya_core::AppError;
use arogya_processing::{AcceptedFile, UploadAcceptor};
use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use std::collections::BTreeMap;

/// Longest value accepted for a plain text field
const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

/// Accepted files in arrival order plus the plain form fields
#[derive(Debug, Default)]
pub struct AcceptedUpload {
    pub files: Vec<AcceptedFile>,
    pub fields: BTreeMap<String, String>,
}

/// `body_limit` is the request body cap enforced by the HTTP layer; it is
/// named in the error when the body is cut off.
pub async fn accept_multipart(
    acceptor: &UploadAcceptor,
    mut multipart: Multipart,
    body_limit: usize,
) -> Result<AcceptedUpload, HttpAppError> {
    let body_error = |e: MultipartError| HttpAppError::from_multipart(e, body_limit);
    let mut session = acceptor.session();
    let mut fields = BTreeMap::new();

    while let Some(mut field) = multipart.next_field().await.map_err(body_error)? {
        let name = field.name().map(str::to_string).unwrap_or_default();
        let file_name = field.file_name().map(str::to_string);

        if file_name.is_none() && !acceptor.is_file_field(&name) {
            let value = field.text().await.map_err(body_error)?;
            if value.len() > MAX_TEXT_FIELD_BYTES {
                return Err(AppError::InvalidInput(format!(
                    "Field {} exceeds {} bytes",
                    name, MAX_TEXT_FIELD_BYTES
                ))
                .into());
            }
            fields.insert(name, value);
            continue;
        }

        let content_type = field.content_type().map(str::to_string);
        session.begin_part(&name, file_name.as_deref(), content_type.as_deref())?;
        while let Some(chunk) = field.chunk().await.map_err(body_error)? {
            session.push_chunk(&chunk)?;
        }
        session.end_part()?;
    }

    let files = session.finish()?;
    tracing::debug!(
        purpose = %acceptor.constraints().purpose,
        file_count = files.len(),
        total_bytes = files.iter().map(AcceptedFile::size).sum::<usize>(),
        "Multipart request accepted"
    );

    Ok(AcceptedUpload { files, fields })
}
