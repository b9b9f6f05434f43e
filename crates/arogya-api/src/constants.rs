//! API constants

/// Current API version segment
pub const API_VERSION: &str = "v0";

/// Versioned API prefix used for every upload route
pub const API_PREFIX: &str = "/api/v0";

/// Path of the post media upload endpoint, relative to `API_PREFIX`
pub const POST_MEDIA_PATH: &str = "/posts/media";

/// Path of the expert document upload endpoint, relative to `API_PREFIX`
pub const EXPERT_DOCUMENTS_PATH: &str = "/experts/documents";
