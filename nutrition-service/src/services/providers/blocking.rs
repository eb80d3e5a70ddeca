//! Adapter for synchronous SDK-style clients.

use super::{GenerationReply, ProviderError, RequestPart, VisionProvider};
use async_trait::async_trait;
use std::sync::Arc;

/// A client whose generation call blocks the calling thread.
pub trait BlockingVisionClient: Send + Sync + 'static {
    fn name(&self) -> &str;

    fn generate_content(
        &self,
        parts: &[RequestPart],
    ) -> Result<Box<dyn GenerationReply>, ProviderError>;

    fn health_check(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}

/// Runs a [`BlockingVisionClient`] on tokio's blocking pool so it can be
/// used wherever a [`VisionProvider`] is expected.
pub struct Blocking<C> {
    client: Arc<C>,
}

impl<C: BlockingVisionClient> Blocking<C> {
    pub fn new(client: C) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

#[async_trait]
impl<C: BlockingVisionClient> VisionProvider for Blocking<C> {
    fn name(&self) -> &str {
        self.client.name()
    }

    async fn generate_content(
        &self,
        parts: &[RequestPart],
    ) -> Result<Box<dyn GenerationReply>, ProviderError> {
        let client = self.client.clone();
        let parts = parts.to_vec();

        tokio::task::spawn_blocking(move || client.generate_content(&parts))
            .await
            .map_err(|e| ProviderError::ApiError(format!("Blocking client task failed: {}", e)))?
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        let client = self.client.clone();

        tokio::task::spawn_blocking(move || client.health_check())
            .await
            .map_err(|e| ProviderError::ApiError(format!("Blocking client task failed: {}", e)))?
    }
}
