use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;

/// Resource kind of a remote asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Image,
    Video,
    /// Documents and anything else that is not rendered as media
    Raw,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Image => "image",
            ResourceKind::Video => "video",
            ResourceKind::Raw => "raw",
        }
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Durable result of one successful remote upload. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RemoteAsset {
    secure_url: String,
    public_id: String,
    resource_kind: ResourceKind,
    bytes: usize,
    content_type: String,
}

impl RemoteAsset {
    pub fn new(
        secure_url: impl Into<String>,
        public_id: impl Into<String>,
        resource_kind: ResourceKind,
        bytes: usize,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            secure_url: secure_url.into(),
            public_id: public_id.into(),
            resource_kind,
            bytes,
            content_type: content_type.into(),
        }
    }

    pub fn secure_url(&self) -> &str {
        &self.secure_url
    }

    pub fn public_id(&self) -> &str {
        &self.public_id
    }

    pub fn resource_kind(&self) -> ResourceKind {
        self.resource_kind
    }

    pub fn bytes(&self) -> usize {
        self.bytes
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }
}
