//! The provider seam

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// A chat model that turns a conversation into one assistant message.
///
/// The report server holds this as `Arc<dyn LLMProvider>` so tests can swap
/// in a scripted implementation.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Run a single, non-streamed completion
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Short provider name for logs
    fn name(&self) -> &str;
}
