use std::sync::Arc;

use arogya_core::sniff::sniff;
use arogya_core::{AppError, ExtractedText, ResourceKind, StagedFile};
use arogya_processing::{AcceptedFile, DocumentTextExtractor};
use arogya_storage::upload_batch;
use axum::extract::Multipart;
use futures::future::try_join_all;

use crate::error::HttpAppError;
use crate::state::{AppState, UploadRoute};
use crate::utils::multipart::accept_multipart;

use super::types::{
    InvalidMark, PostDraft, VerificationDocument, VerificationRecord, VerificationStatus,
};

/// Pipeline orchestration for the two upload purposes.
///
/// Constraint violations surface from the acceptor before anything is
/// staged. Any later failure fails the whole request.
pub struct MediaIngestionService {
    state: Arc<AppState>,
}

impl MediaIngestionService {
    pub fn new(state: &Arc<AppState>) -> Self {
        Self {
            state: state.clone(),
        }
    }

    /// accept → stage in memory → validate images → upload
    ///
    /// A definitive rejection from the content validator still creates the
    /// draft, marked invalid with the reason. An unavailable validator fails
    /// the request before anything reaches the remote store.
    #[tracing::instrument(skip(self, multipart), fields(purpose = "post_media"))]
    pub async fn ingest_post(&self, multipart: Multipart) -> Result<PostDraft, HttpAppError> {
        let route = &self.state.post_media;
        let upload = accept_multipart(&route.acceptor, multipart, self.body_limit()).await?;
        let staged = self.stage(route, upload.files).await?;

        let invalid = self.validate_images(&staged).await?;
        if let Some(mark) = &invalid {
            tracing::info!(reason = %mark.reason, "Post media rejected by content validation");
        }

        let media = upload_batch(self.state.remote_store.clone(), staged, &route.folder).await?;

        tracing::info!(
            media_count = media.len(),
            invalid = invalid.is_some(),
            "Post media ingested"
        );

        Ok(PostDraft {
            fields: upload.fields,
            media,
            invalid,
        })
    }

    /// accept → stage on disk → extract PDF text → upload
    ///
    /// Staged copies stay on disk for manual review once the request
    /// succeeds. When extraction or upload fails they are discarded.
    #[tracing::instrument(skip(self, multipart), fields(purpose = "expert_documents"))]
    pub async fn ingest_expert_documents(
        &self,
        multipart: Multipart,
    ) -> Result<VerificationRecord, HttpAppError> {
        let route = &self.state.expert_documents;
        let upload = accept_multipart(&route.acceptor, multipart, self.body_limit()).await?;
        let staged = self.stage(route, upload.files).await?;

        let documents = match self.extract_and_upload(route, &staged).await {
            Ok(documents) => documents,
            Err(e) => {
                self.state.staging.discard(&staged).await;
                return Err(e);
            }
        };

        tracing::info!(
            document_count = documents.len(),
            with_text = documents.iter().filter(|d| d.extracted_text.is_some()).count(),
            "Expert documents ingested"
        );

        Ok(VerificationRecord {
            status: VerificationStatus::Pending,
            documents,
        })
    }

    fn body_limit(&self) -> usize {
        self.state.config.max_request_body_bytes()
    }

    async fn stage(
        &self,
        route: &UploadRoute,
        files: Vec<AcceptedFile>,
    ) -> Result<Vec<StagedFile>, HttpAppError> {
        let constraints = route.constraints();
        let staged = self
            .state
            .staging
            .stage_all(files, constraints.purpose, constraints.storage)
            .await?;
        Ok(staged)
    }

    /// Classify every image item. Video and other media are not sent to the
    /// classifier. Returns the first rejection in upload order.
    async fn validate_images(
        &self,
        staged: &[StagedFile],
    ) -> Result<Option<InvalidMark>, HttpAppError> {
        let moderation = &self.state.moderation;
        let Some(validator) = moderation.validator.as_ref() else {
            return Ok(None);
        };

        let mut images = Vec::new();
        for file in staged {
            let data = file.read().await.map_err(AppError::from)?;
            if sniff(&data, &file.content_type).kind == ResourceKind::Image {
                images.push(file);
            }
        }

        let verdicts = try_join_all(
            images
                .iter()
                .map(|file| validator.validate(file, &moderation.policy)),
        )
        .await?;

        Ok(verdicts
            .into_iter()
            .find(|verdict| !verdict.valid)
            .map(|verdict| InvalidMark {
                reason: verdict
                    .reason
                    .unwrap_or_else(|| moderation.policy.default_rejection_reason.clone()),
            }))
    }

    async fn extract_and_upload(
        &self,
        route: &UploadRoute,
        staged: &[StagedFile],
    ) -> Result<Vec<VerificationDocument>, HttpAppError> {
        let mut texts: Vec<Option<ExtractedText>> = Vec::with_capacity(staged.len());
        for file in staged {
            let data = file.read().await.map_err(AppError::from)?;
            let text = if DocumentTextExtractor::supports(&data) {
                Some(self.state.extractor.extract(data).await?)
            } else {
                None
            };
            texts.push(text);
        }

        let assets = upload_batch(
            self.state.remote_store.clone(),
            staged.to_vec(),
            &route.folder,
        )
        .await?;

        Ok(staged
            .iter()
            .zip(assets)
            .zip(texts)
            .map(|((file, asset), extracted_text)| VerificationDocument {
                field: file.field_name.clone(),
                asset,
                extracted_text,
            })
            .collect())
    }
}
