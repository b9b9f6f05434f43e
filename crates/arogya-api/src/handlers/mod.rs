pub mod expert_documents;
pub mod health;
pub mod post_media;
