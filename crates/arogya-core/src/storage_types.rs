use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Remote object store backends
///
/// Defined in core because configuration selects the backend before the
/// storage crate builds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteStoreBackend {
    S3,
    Cloudinary,
    Local,
}

impl FromStr for RemoteStoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "s3" => Ok(RemoteStoreBackend::S3),
            "cloudinary" => Ok(RemoteStoreBackend::Cloudinary),
            "local" => Ok(RemoteStoreBackend::Local),
            _ => Err(anyhow::anyhow!("Invalid remote store backend: {}", s)),
        }
    }
}

impl Display for RemoteStoreBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            RemoteStoreBackend::S3 => write!(f, "s3"),
            RemoteStoreBackend::Cloudinary => write!(f, "cloudinary"),
            RemoteStoreBackend::Local => write!(f, "local"),
        }
    }
}
