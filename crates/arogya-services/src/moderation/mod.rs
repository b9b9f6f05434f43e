//! Content validation against a natural-language moderation policy.
//!
//! A definitive `{valid: false}` verdict and an unreachable or confused
//! classifier are different outcomes: the first is a `ValidationVerdict`, the
//! second is `ModerationError::Unavailable`.

pub mod claude;
pub mod policy;

use arogya_core::{StagedFile, ValidationVerdict};
use async_trait::async_trait;

pub use claude::ClaudeContentValidator;
pub use policy::ModerationPolicy;

#[derive(Debug, thiserror::Error)]
pub enum ModerationError {
    #[error("Content validation unavailable: {0}")]
    Unavailable(String),

    #[error("Staged file unreadable: {0}")]
    StagedRead(#[from] std::io::Error),
}

#[async_trait]
pub trait ContentValidator: Send + Sync {
    /// Classify one media item under `policy`.
    async fn validate(
        &self,
        item: &StagedFile,
        policy: &ModerationPolicy,
    ) -> Result<ValidationVerdict, ModerationError>;
}
