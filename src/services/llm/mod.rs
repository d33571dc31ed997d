/// Hosted language model abstraction
///
/// The pipeline only needs single-shot text completion. Each stage issues
/// exactly one call per run through [`complete_within`], which applies the
/// per-call timeout and the caller's cancellation token.
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::LlmError;
use crate::services::deadline::{bounded, Interrupted};

pub mod openrouter;

pub use openrouter::OpenRouterClient;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Sends `prompt` as a system instruction and returns the model's reply
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

/// One bounded completion call, with the reply trimmed and checked for content
pub async fn complete_within(
    llm: &dyn LlmClient,
    prompt: &str,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<String, LlmError> {
    let reply = bounded(timeout, cancel, llm.complete(prompt))
        .await
        .map_err(|interrupted| match interrupted {
            Interrupted::TimedOut => LlmError::Timeout,
            Interrupted::Cancelled => LlmError::Cancelled,
        })??;

    let reply = reply.trim();
    if reply.is_empty() {
        return Err(LlmError::EmptyResponse);
    }

    tracing::debug!(provider = llm.name(), chars = reply.len(), "LLM completion received");
    Ok(reply.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reply_is_trimmed() {
        let mut llm = MockLlmClient::new();
        llm.expect_complete()
            .returning(|_| Ok("  berlin jazz bars \n".to_string()));
        llm.expect_name().return_const("mock");

        let reply = complete_within(&llm, "p", Duration::from_secs(1), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(reply, "berlin jazz bars");
    }

    #[tokio::test]
    async fn test_blank_reply_is_error() {
        let mut llm = MockLlmClient::new();
        llm.expect_complete().returning(|_| Ok("   ".to_string()));
        llm.expect_name().return_const("mock");

        let result =
            complete_within(&llm, "p", Duration::from_secs(1), &CancellationToken::new()).await;
        assert!(matches!(result, Err(LlmError::EmptyResponse)));
    }

    #[tokio::test]
    async fn test_cancelled_before_call() {
        let mut llm = MockLlmClient::new();
        llm.expect_complete().returning(|_| Ok("never".to_string()));
        llm.expect_name().return_const("mock");

        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = complete_within(&llm, "p", Duration::from_secs(1), &cancel).await;
        assert!(matches!(result, Err(LlmError::Cancelled)));
    }
}
