//! Trait definitions for text-generation backends.

use async_trait::async_trait;
use bulle_core::{GenerateRequest, GenerateResponse};
use bulle_error::BulleResult;
use std::sync::Arc;

/// Core trait that all generation backends implement.
///
/// One prompt in, one text blob out. Failures are reported as
/// [`GenerationError`](bulle_error::GenerationError)s and are never retried by callers.
#[async_trait]
pub trait BulleDriver: Send + Sync {
    /// Generate text for a single prompt.
    async fn generate(&self, req: &GenerateRequest) -> BulleResult<GenerateResponse>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "gemini-1.5-pro-latest").
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<T: BulleDriver + ?Sized> BulleDriver for Arc<T> {
    async fn generate(&self, req: &GenerateRequest) -> BulleResult<GenerateResponse> {
        (**self).generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
