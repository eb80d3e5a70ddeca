//! Mock provider implementation for testing.

use super::{DeferredReply, GenerationReply, ProviderError, RequestPart, TextReply, VisionProvider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// What the mock hands back from `generate_content`.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Reply text directly on the reply.
    Text(String),
    /// Reply text behind a nested result.
    Nested(String),
    /// Reply with neither shape.
    Missing,
    /// Provider failure with the given message.
    Fail(String),
    /// Panic inside the call.
    Panic(String),
}

/// Mock vision provider for testing.
pub struct MockVisionProvider {
    reply: MockReply,
    calls: AtomicUsize,
    last_parts: Mutex<Vec<RequestPart>>,
}

impl MockVisionProvider {
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_parts: Mutex::new(Vec::new()),
        }
    }

    /// Number of `generate_content` calls received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Parts passed to the most recent call.
    pub fn last_parts(&self) -> Vec<RequestPart> {
        self.last_parts
            .lock()
            .map(|parts| parts.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl VisionProvider for MockVisionProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate_content(
        &self,
        parts: &[RequestPart],
    ) -> Result<Box<dyn GenerationReply>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_parts.lock() {
            *last = parts.to_vec();
        }

        match &self.reply {
            MockReply::Text(text) => Ok(Box::new(TextReply::new(text.clone()))),
            MockReply::Nested(text) => Ok(Box::new(DeferredReply {
                result: Some(TextReply::new(text.clone())),
            })),
            MockReply::Missing => Ok(Box::new(TextReply::default())),
            MockReply::Fail(message) => Err(ProviderError::ApiError(message.clone())),
            MockReply::Panic(message) => panic!("{}", message),
        }
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        match &self.reply {
            MockReply::Fail(message) => Err(ProviderError::NotConfigured(message.clone())),
            _ => Ok(()),
        }
    }
}
