//! Gemini AI provider implementation.
//!
//! Implements multimodal content generation using Google's Gemini REST API.

use super::{GenerationReply, ProviderError, RequestPart, VisionProvider};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Header carrying the API key. Request URLs must never contain the key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini provider configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub timeout: Duration,
}

/// Gemini vision provider.
pub struct GeminiVisionProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiVisionProvider {
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                ProviderError::NotConfigured(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Build the API URL for the given model and method.
    fn api_url(&self, method: &str) -> String {
        format!("{}:{}", self.model_url(), method)
    }

    fn model_url(&self) -> String {
        format!(
            "{}/models/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Convert request parts to Gemini content parts, keeping their order.
    fn to_content_parts(parts: &[RequestPart]) -> Vec<ContentPart> {
        parts
            .iter()
            .map(|part| match part {
                RequestPart::Text(text) => ContentPart::Text { text: text.clone() },
                RequestPart::Blob(attachment) => ContentPart::InlineData {
                    inline_data: InlineData {
                        mime_type: attachment.mime_type.clone(),
                        data: STANDARD.encode(&attachment.data),
                    },
                },
            })
            .collect()
    }
}

#[async_trait]
impl VisionProvider for GeminiVisionProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate_content(
        &self,
        parts: &[RequestPart],
    ) -> Result<Box<dyn GenerationReply>, ProviderError> {
        if parts.is_empty() {
            return Err(ProviderError::InvalidRequest(
                "At least one content part is required".to_string(),
            ));
        }

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: Self::to_content_parts(parts),
            }],
        };

        let url = self.api_url("generateContent");

        tracing::debug!(
            model = %self.config.model,
            part_count = parts.len(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(network_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited);
            }

            return Err(ProviderError::ApiError(format!(
                "Gemini API error {}: {}",
                status, error_text
            )));
        }

        let mut api_response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))?;
        api_response.collect_text();

        let finish_reason = api_response
            .candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref());

        if finish_reason == Some("SAFETY") {
            return Err(ProviderError::ContentFiltered);
        }

        if let Some(usage) = &api_response.usage_metadata {
            tracing::debug!(
                model = %self.config.model,
                input_tokens = usage.prompt_token_count.unwrap_or(0),
                output_tokens = usage.candidates_token_count.unwrap_or(0),
                finish_reason = ?finish_reason,
                "Gemini API responded"
            );
        }

        Ok(Box::new(api_response))
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.config.api_key.is_empty() {
            return Err(ProviderError::NotConfigured(
                "Gemini API key not configured".to_string(),
            ));
        }

        // Fetch the configured model to verify both key and model name
        let response = self
            .client
            .get(self.model_url())
            .header(API_KEY_HEADER, &self.config.api_key)
            .send()
            .await
            .map_err(network_error)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ProviderError::ApiError(format!(
                "Health check failed: {}",
                response.status()
            )))
        }
    }
}

fn network_error(err: reqwest::Error) -> ProviderError {
    ProviderError::NetworkError(err.without_url().to_string())
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum ContentPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(alias = "inlineData")]
        inline_data: InlineData,
    },
    Other(serde_json::Value),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(skip)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Join the text parts of the first candidate; `None` when it has none.
    fn collect_text(&mut self) {
        let texts: Vec<&str> = self
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| match p {
                        ContentPart::Text { text } => Some(text.as_str()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        self.text = if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        };
    }
}

impl GenerationReply for GenerateContentResponse {
    fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<i32>,
    candidates_token_count: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Attachment;
    use crate::services::providers::reply_text;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> GenerateContentResponse {
        let mut response: GenerateContentResponse = serde_json::from_value(value).unwrap();
        response.collect_text();
        response
    }

    #[test]
    fn request_keeps_prompt_before_image() {
        let parts = GeminiVisionProvider::to_content_parts(&[
            RequestPart::Text("Describe".into()),
            RequestPart::Blob(Attachment {
                mime_type: "image/jpeg".into(),
                data: vec![0xff, 0xd8],
            }),
        ]);
        let value = serde_json::to_value(&parts).unwrap();

        assert_eq!(value[0]["text"], "Describe");
        assert_eq!(value[1]["inline_data"]["mimeType"], "image/jpeg");
        assert_eq!(value[1]["inline_data"]["data"], "/9g=");
    }

    #[test]
    fn reply_joins_text_parts_of_first_candidate() {
        let response = parse(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Fat: " }, { "text": "5g" }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 3 }
        }));

        assert_eq!(reply_text(&response), Some("Fat: 5g"));
    }

    #[test]
    fn blocked_prompt_has_no_text() {
        let response = parse(json!({ "promptFeedback": { "blockReason": "OTHER" } }));
        assert_eq!(reply_text(&response), None);
    }

    #[test]
    fn non_text_parts_are_ignored() {
        let response = parse(json!({
            "candidates": [{
                "content": { "parts": [{ "inlineData": { "mimeType": "image/png", "data": "AA==" } }] }
            }]
        }));
        assert_eq!(reply_text(&response), None);
    }

    #[test]
    fn api_url_names_model_without_key() {
        let provider = GeminiVisionProvider::new(GeminiConfig {
            api_key: "secret".into(),
            model: "gemini-1.5-flash".into(),
            api_base: "https://example.test/v1beta/".into(),
            timeout: Duration::from_secs(5),
        })
        .unwrap();

        assert_eq!(
            provider.api_url("generateContent"),
            "https://example.test/v1beta/models/gemini-1.5-flash:generateContent"
        );
        assert!(!provider.api_url("generateContent").contains("secret"));
        assert_eq!(provider.model(), "gemini-1.5-flash");
    }

    #[tokio::test]
    async fn health_check_requires_api_key() {
        let provider = GeminiVisionProvider::new(GeminiConfig {
            api_key: String::new(),
            model: "gemini-1.5-flash".into(),
            api_base: "https://example.test/v1beta".into(),
            timeout: Duration::from_secs(5),
        })
        .unwrap();

        assert!(matches!(
            provider.health_check().await,
            Err(ProviderError::NotConfigured(_))
        ));
    }

    fn unreachable_provider(api_key: &str) -> GeminiVisionProvider {
        GeminiVisionProvider::new(GeminiConfig {
            api_key: api_key.into(),
            model: "gemini-1.5-flash".into(),
            api_base: "http://127.0.0.1:9".into(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn connection_failure_does_not_leak_api_key() {
        let provider = unreachable_provider("SUPERSECRETKEY");

        let err = provider
            .generate_content(&[RequestPart::Text("Describe".into())])
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ProviderError::NetworkError(_)));
        assert!(!err.to_string().contains("SUPERSECRETKEY"));

        let detail = service_core::error::AppError::from(crate::error::AnalysisError::from(err))
            .detail();
        assert!(detail.starts_with("Error analyzing image"));
        assert!(!detail.contains("SUPERSECRETKEY"));
    }

    #[tokio::test]
    async fn failed_health_check_does_not_leak_api_key() {
        let err = unreachable_provider("SUPERSECRETKEY")
            .health_check()
            .await
            .unwrap_err();
        assert!(!err.to_string().contains("SUPERSECRETKEY"));
    }
}
