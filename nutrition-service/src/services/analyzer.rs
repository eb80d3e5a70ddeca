//! Product analysis pipeline: normalize, ask the model, structure the reply.

use crate::error::AnalysisError;
use crate::models::AnalysisResult;
use crate::services::metrics;
use crate::services::normalizer::ImageNormalizer;
use crate::services::parser::parse_reply;
use crate::services::providers::{reply_text, RequestPart, VisionProvider};
use image::DynamicImage;
use std::sync::Arc;
use std::time::Instant;

/// Instruction sent with every product photo.
pub const ANALYSIS_PROMPT: &str = "Analyze this product image and provide:
1. Fat content (if visible)
2. Whether it's gluten-free
3. Any other relevant nutritional information

Please be specific and concise in your response.";

#[derive(Clone)]
pub struct ProductAnalyzer {
    provider: Arc<dyn VisionProvider>,
    normalizer: ImageNormalizer,
}

impl ProductAnalyzer {
    pub fn new(provider: Arc<dyn VisionProvider>) -> Self {
        Self {
            provider,
            normalizer: ImageNormalizer::default(),
        }
    }

    pub fn provider(&self) -> &Arc<dyn VisionProvider> {
        &self.provider
    }

    /// Analyze a decoded product photo.
    pub async fn analyze(&self, image: DynamicImage) -> Result<AnalysisResult, AnalysisError> {
        let start = Instant::now();
        let result = self.run(image).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(e) => e.kind(),
        };
        metrics::record_analysis(outcome, start.elapsed());

        result
    }

    async fn run(&self, image: DynamicImage) -> Result<AnalysisResult, AnalysisError> {
        let normalizer = self.normalizer;
        let normalized = tokio::task::spawn_blocking(move || normalizer.normalize(&image))
            .await
            .map_err(|e| AnalysisError::Internal(format!("Image worker failed: {}", e)))??;

        tracing::debug!(
            mime_type = normalized.mime_type,
            bytes = normalized.data.len(),
            "Image normalized"
        );

        let parts = [
            RequestPart::Text(ANALYSIS_PROMPT.to_string()),
            RequestPart::Blob(normalized.into()),
        ];

        let provider_name = self.provider.name().to_string();
        let call_start = Instant::now();
        let reply = self.provider.generate_content(&parts).await;
        metrics::record_provider_call(&provider_name, reply.is_ok(), call_start.elapsed());

        let reply = reply.map_err(|e| {
            tracing::error!(provider = %provider_name, error = %e, "Provider call failed");
            AnalysisError::from(e)
        })?;

        let text = reply_text(reply.as_ref()).ok_or(AnalysisError::NoResponseText)?;
        if text.is_empty() {
            return Err(AnalysisError::EmptyResponseText);
        }

        tracing::info!(
            provider = %provider_name,
            reply_len = text.len(),
            "Received analysis reply"
        );

        Ok(parse_reply(text))
    }
}
