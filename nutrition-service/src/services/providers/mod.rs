//! AI provider abstractions and implementations.
//!
//! This module provides a trait-based abstraction for multimodal providers,
//! allowing easy swapping between backends (Gemini, blocking SDK clients,
//! mock).

pub mod blocking;
pub mod gemini;
pub mod mock;

pub use blocking::{Blocking, BlockingVisionClient};

use crate::models::Attachment;
use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Content filtered")]
    ContentFiltered,

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// One element of the ordered content list sent to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestPart {
    Text(String),
    Blob(Attachment),
}

/// A reply from which text can be pulled.
///
/// Some clients put the answer on the reply itself, others wrap it in a
/// nested result object. Callers probe `text()` first and fall back to
/// `result()`; see [`reply_text`].
pub trait GenerationReply: Send + Sync {
    /// Text carried directly on the reply, if the reply has a text field.
    fn text(&self) -> Option<&str>;

    /// Nested result holding the final answer, for deferred-style replies.
    fn result(&self) -> Option<&dyn GenerationReply> {
        None
    }
}

/// Resolve the reply text: direct shape first, then the nested result.
///
/// `None` means neither shape carries a text field; `Some("")` means the
/// field is present but empty.
pub fn reply_text(reply: &dyn GenerationReply) -> Option<&str> {
    reply
        .text()
        .or_else(|| reply.result().and_then(|nested| nested.text()))
}

/// Reply with the text directly on it.
#[derive(Debug, Clone, Default)]
pub struct TextReply {
    pub text: Option<String>,
}

impl TextReply {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

impl GenerationReply for TextReply {
    fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

/// Reply that only exposes its answer through a nested result.
#[derive(Debug, Clone, Default)]
pub struct DeferredReply {
    pub result: Option<TextReply>,
}

impl GenerationReply for DeferredReply {
    fn text(&self) -> Option<&str> {
        None
    }

    fn result(&self) -> Option<&dyn GenerationReply> {
        self.result.as_ref().map(|r| r as &dyn GenerationReply)
    }
}

/// Trait for multimodal content generation providers (e.g., Gemini).
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Short provider name used in logs and metrics.
    fn name(&self) -> &str;

    /// Generate a reply for the ordered content parts.
    async fn generate_content(
        &self,
        parts: &[RequestPart],
    ) -> Result<Box<dyn GenerationReply>, ProviderError>;

    /// Health check.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
