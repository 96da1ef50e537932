//! The completion service seam.

use async_trait::async_trait;

use crate::error::Result;

/// A service that answers one instruction text with one response text.
///
/// Both the rule generation and the transformation execution steps use
/// this interface. Implementations do not retry.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn submit(&self, prompt: &str) -> Result<String>;

    /// Provider name for logs and messages.
    fn provider_name(&self) -> &'static str;

    fn model_name(&self) -> &str;
}

#[async_trait]
impl<T: CompletionService + ?Sized> CompletionService for Box<T> {
    async fn submit(&self, prompt: &str) -> Result<String> {
        (**self).submit(prompt).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
