//! Error types for the analysis pipeline and their HTTP mapping.

use crate::services::providers::ProviderError;
use service_core::error::AppError;
use thiserror::Error;

/// Decoding, conversion, resizing or encoding of an image failed.
#[derive(Error, Debug)]
#[error("Error processing image: {0}")]
pub struct ImageProcessingError(pub String);

impl From<image::ImageError> for ImageProcessingError {
    fn from(err: image::ImageError) -> Self {
        ImageProcessingError(err.to_string())
    }
}

/// Reaching or interpreting the AI provider failed.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Error analyzing image: {0}")]
    Image(#[from] ImageProcessingError),

    #[error("Error analyzing image: Failed to analyze image - no response text")]
    NoResponseText,

    #[error("Error analyzing image: Failed to analyze image - empty response text")]
    EmptyResponseText,

    #[error("Error analyzing image: {0}")]
    Provider(#[from] ProviderError),

    #[error("Error analyzing image: {0}")]
    Internal(String),
}

impl AnalysisError {
    /// Metric label for the failure.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::Image(_) => "image_error",
            AnalysisError::NoResponseText => "no_text",
            AnalysisError::EmptyResponseText => "empty_text",
            AnalysisError::Provider(_) => "provider_error",
            AnalysisError::Internal(_) => "internal_error",
        }
    }
}

impl From<ImageProcessingError> for AppError {
    fn from(err: ImageProcessingError) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_failure_is_wrapped_by_analysis_error() {
        let err = AnalysisError::from(ImageProcessingError("image has zero size".into()));
        assert_eq!(
            err.to_string(),
            "Error analyzing image: Error processing image: image has zero size"
        );
    }

    #[test]
    fn missing_and_empty_text_are_distinguishable() {
        let missing = AnalysisError::NoResponseText.to_string();
        let empty = AnalysisError::EmptyResponseText.to_string();

        assert!(missing.contains("no response text"));
        assert!(empty.contains("empty response text"));
        assert_ne!(missing, empty);
    }

    #[test]
    fn provider_cause_is_kept() {
        let err = AnalysisError::from(ProviderError::ApiError("AI model error".into()));
        assert!(err.to_string().starts_with("Error analyzing image"));
        assert!(err.to_string().contains("AI model error"));
    }

    #[test]
    fn app_error_detail_is_the_full_message() {
        let app: AppError = AnalysisError::EmptyResponseText.into();
        assert_eq!(
            app.detail(),
            "Error analyzing image: Failed to analyze image - empty response text"
        );
    }
}
