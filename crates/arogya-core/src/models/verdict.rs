use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Outcome of content validation for a single media item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ValidationVerdict {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ValidationVerdict {
    pub fn accept() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    pub fn reject(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
        }
    }
}

/// Plain text pulled out of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ExtractedText {
    pub text: String,
    pub page_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_deserializes_without_reason() {
        let v: ValidationVerdict = serde_json::from_str(r#"{"valid": false}"#).unwrap();
        assert!(!v.valid);
        assert!(v.reason.is_none());
        assert_eq!(
            serde_json::to_string(&ValidationVerdict::accept()).unwrap(),
            r#"{"valid":true}"#
        );
    }
}
