//! Text-generation provider trait

use crate::{CompletionRequest, Result};
use async_trait::async_trait;

/// Trait for streaming text-generation providers.
///
/// Implementations issue one streaming completion per call and return only
/// the fully accumulated, whitespace-trimmed text. An interrupted stream is
/// an error, never a partial result.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Stream a completion and return the accumulated text
    async fn generate(&self, request: CompletionRequest) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
