//! Arogya Storage Library
//!
//! Remote object store adapters for the media ingestion pipeline. A staged
//! file is forwarded to the configured backend (S3-compatible storage,
//! Cloudinary, or the local filesystem) and comes back as a durable
//! `RemoteAsset`.
//!
//! # Remote key format
//!
//! Every backend stores a file under `{folder}/{staged_name}`, where the
//! staged name is the collision-resistant `{uuid}.{ext}` assigned at staging
//! time. Keys must not contain `..` or a leading `/`.

pub mod batch;
#[cfg(feature = "storage-cloudinary")]
pub mod cloudinary;
pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

pub use arogya_core::RemoteStoreBackend;
pub use batch::upload_batch;
#[cfg(feature = "storage-cloudinary")]
pub use cloudinary::{CloudinaryCredentials, CloudinaryStore};
pub use factory::create_remote_store;
#[cfg(feature = "storage-local")]
pub use local::LocalStore;
#[cfg(feature = "storage-s3")]
pub use s3::{S3Credentials, S3Store};
pub use traits::{RemoteStore, RemoteStoreError, RemoteStoreResult};
