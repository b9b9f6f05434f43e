//! Arogya Services Layer
//!
//! Services that sit around the request path: semantic content validation
//! of uploaded images and the background retention sweep of staged files.

pub mod moderation;
pub mod retention;

pub use moderation::{ClaudeContentValidator, ContentValidator, ModerationError, ModerationPolicy};
pub use retention::{RetentionSweeper, SweepReport};
