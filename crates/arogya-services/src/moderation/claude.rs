//! Content validation through Anthropic's Claude vision API

use anyhow::{Context, Result};
use arogya_core::sniff::detect_content_type;
use arogya_core::{StagedFile, ValidationVerdict};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use super::{ContentValidator, ModerationError, ModerationPolicy};

const API_BASE: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 256;
const CLASSIFY_INSTRUCTION: &str =
    "Classify this image under the policy. Respond with the JSON object only.";

/// Claude vision content validator
pub struct ClaudeContentValidator {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
    api_base: String,
}

impl Debug for ClaudeContentValidator {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ClaudeContentValidator")
            .field("model", &self.model)
            .finish()
    }
}

// Messages API request/response structures
#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<MessageParam>,
}

#[derive(Debug, Serialize)]
struct MessageParam {
    role: String,
    content: Vec<ContentBlock>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
    Image { source: ImageSource },
}

#[derive(Debug, Serialize)]
struct ImageSource {
    #[serde(rename = "type")]
    source_type: String,
    media_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlockResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlockResponse {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

/// The only reply shape accepted from the classifier
#[derive(Debug, Deserialize)]
struct ClassifierReply {
    valid: bool,
    #[serde(default)]
    reason: Option<String>,
}

impl ClaudeContentValidator {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        Self::with_api_base(api_key, model, timeout, API_BASE)
    }

    /// Point the validator at a different API host (used against mock servers).
    pub fn with_api_base(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
        api_base: impl Into<String>,
    ) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client for content validation")?;

        Ok(Self {
            http_client,
            api_key: api_key.into(),
            model: model.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    /// Call the Messages API and return the first text block.
    async fn classify(&self, image_data: &[u8], media_type: &str, policy: &ModerationPolicy) -> Result<String> {
        use base64::Engine;
        let base64_image = base64::engine::general_purpose::STANDARD.encode(image_data);

        let body = MessagesRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            system: policy.prompt.clone(),
            messages: vec![MessageParam {
                role: "user".to_string(),
                content: vec![
                    ContentBlock::Image {
                        source: ImageSource {
                            source_type: "base64".to_string(),
                            media_type: media_type.to_string(),
                            data: base64_image,
                        },
                    },
                    ContentBlock::Text {
                        text: CLASSIFY_INSTRUCTION.to_string(),
                    },
                ],
            }],
        };

        let response = self
            .http_client
            .post(format!("{}/messages", self.api_base))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .context("Failed to send request to Claude API")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "Claude API request failed: {} - {}",
                status,
                error_text
            ));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .context("Failed to parse Claude API response")?;

        parsed
            .content
            .into_iter()
            .find_map(|b| match b {
                ContentBlockResponse::Text { text } => Some(text),
                ContentBlockResponse::Other => None,
            })
            .context("Claude API response contained no text")
    }

    /// Parse the classifier's reply, accepting JSON inside markdown code fences.
    fn parse_reply(text: &str, policy: &ModerationPolicy) -> Result<ValidationVerdict> {
        let json_text = if text.contains("```json") {
            text.split("```json")
                .nth(1)
                .and_then(|s| s.split("```").next())
                .unwrap_or(text)
                .trim()
        } else if text.contains("```") {
            text.split("```")
                .nth(1)
                .and_then(|s| s.split("```").next())
                .unwrap_or(text)
                .trim()
        } else {
            text.trim()
        };

        let reply: ClassifierReply =
            serde_json::from_str(json_text).context("Classifier reply is not the expected JSON")?;

        if reply.valid {
            Ok(ValidationVerdict::accept())
        } else {
            let reason = reply
                .reason
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| policy.default_rejection_reason.clone());
            Ok(ValidationVerdict::reject(reason))
        }
    }
}

#[async_trait]
impl ContentValidator for ClaudeContentValidator {
    #[tracing::instrument(skip(self, item, policy), fields(field = %item.field_name, policy = %policy.name))]
    async fn validate(
        &self,
        item: &StagedFile,
        policy: &ModerationPolicy,
    ) -> Result<ValidationVerdict, ModerationError> {
        let data = item.read().await?;
        let media_type = detect_content_type(&data)
            .unwrap_or(item.content_type.as_str())
            .to_string();
        let start = std::time::Instant::now();

        let verdict = match self.classify(&data, &media_type, policy).await {
            Ok(text) => Self::parse_reply(&text, policy),
            Err(e) => Err(e),
        }
        .map_err(|e| {
            tracing::warn!(
                error = %e,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Content validation unavailable"
            );
            ModerationError::Unavailable(format!("{:#}", e))
        })?;

        tracing::info!(
            valid = verdict.valid,
            reason = ?verdict.reason,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Content validation completed"
        );

        Ok(verdict)
    }
}
