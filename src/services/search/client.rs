use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::{
    error::SearchError,
    models::{Language, SearchResult},
    services::{
        deadline::{bounded, Interrupted},
        retry::{RetryError, RetryPolicy},
        search::{parser, SearchBackend},
    },
};

/// Search with retries, per-call timeouts and result normalization
#[derive(Clone)]
pub struct SearchClient {
    backend: Arc<dyn SearchBackend>,
    policy: RetryPolicy,
    result_cap: usize,
    call_timeout: Duration,
}

impl SearchClient {
    pub fn new(
        backend: Arc<dyn SearchBackend>,
        policy: RetryPolicy,
        result_cap: usize,
        call_timeout: Duration,
    ) -> Self {
        Self {
            backend,
            policy,
            result_cap,
            call_timeout,
        }
    }

    pub fn result_cap(&self) -> usize {
        self.result_cap
    }

    /// Searches for `query`, returning at most `result_cap` results
    ///
    /// Transient failures are retried per the policy. When retries run out the
    /// error is [`SearchError::Exhausted`]; use [`SearchError::is_rate_limited`]
    /// to tell a throttled backend from other failures.
    pub async fn search(
        &self,
        query: &str,
        language: Language,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let outcome = self
            .policy
            .run(cancel, SearchError::is_transient, |attempt| {
                tracing::debug!(
                    query = %query,
                    attempt,
                    backend = self.backend.name(),
                    "Search attempt"
                );
                self.attempt(query, language, cancel)
            })
            .await;

        match outcome {
            Ok(results) => {
                tracing::info!(
                    query = %query,
                    results = results.len(),
                    backend = self.backend.name(),
                    "Search completed"
                );
                Ok(results)
            }
            Err(RetryError::Exhausted { attempts, last }) => Err(SearchError::Exhausted {
                attempts,
                last: Box::new(last),
            }),
            Err(RetryError::Permanent { error, .. }) => Err(error),
            Err(RetryError::Cancelled { .. }) => Err(SearchError::Cancelled),
        }
    }

    async fn attempt(
        &self,
        query: &str,
        language: Language,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let raw = bounded(
            self.call_timeout,
            cancel,
            self.backend.raw_search(query, language),
        )
        .await
        .map_err(|interrupted| match interrupted {
            Interrupted::TimedOut => SearchError::Timeout,
            Interrupted::Cancelled => SearchError::Cancelled,
        })??;

        Ok(parser::normalize(raw, self.result_cap))
    }
}
