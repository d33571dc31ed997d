use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::{
    error::SearchError,
    models::{NoticeKind, PipelineOutcome, PipelineRequest, PipelineResult, SearchResult},
    services::{
        composer::QueryComposer, context::RunContext, fallback::FallbackGenerator,
        llm::LlmClient, search::SearchClient, summarizer::Summarizer,
    },
};

/// Why the run skipped real search results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    RateLimited,
    NoResults,
    SearchFailed,
    Cancelled,
}

impl FallbackReason {
    fn notice(&self) -> NoticeKind {
        match self {
            FallbackReason::RateLimited => NoticeKind::RateLimited,
            FallbackReason::NoResults => NoticeKind::NoResults,
            FallbackReason::SearchFailed => NoticeKind::SearchFailed,
            FallbackReason::Cancelled => NoticeKind::Cancelled,
        }
    }
}

/// Which stage follows the search
#[derive(Debug)]
pub enum Branch {
    Summarize(Vec<SearchResult>),
    Fallback {
        reason: FallbackReason,
        detail: Option<String>,
    },
}

impl Branch {
    /// Decides the branch from the search outcome
    pub fn route(searched: Result<Vec<SearchResult>, SearchError>) -> Self {
        match searched {
            Ok(results) if results.is_empty() => Branch::Fallback {
                reason: FallbackReason::NoResults,
                detail: None,
            },
            Ok(results) => Branch::Summarize(results),
            Err(e) if e.is_cancelled() => Branch::Fallback {
                reason: FallbackReason::Cancelled,
                detail: None,
            },
            Err(e) if e.is_rate_limited() => Branch::Fallback {
                reason: FallbackReason::RateLimited,
                detail: None,
            },
            Err(e) => Branch::Fallback {
                reason: FallbackReason::SearchFailed,
                detail: Some(e.to_string()),
            },
        }
    }
}

/// Compose → search → summarize or fall back
#[derive(Clone)]
pub struct Pipeline {
    composer: QueryComposer,
    search: SearchClient,
    summarizer: Summarizer,
    fallback: FallbackGenerator,
}

impl Pipeline {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        search: SearchClient,
        call_timeout: Duration,
        fallback_enabled: bool,
    ) -> Self {
        Self {
            composer: QueryComposer::new(llm.clone(), call_timeout),
            search,
            summarizer: Summarizer::new(llm.clone(), call_timeout),
            fallback: FallbackGenerator::new(llm, call_timeout, fallback_enabled),
        }
    }

    /// Runs one request to completion; never fails
    ///
    /// Every problem along the way is recovered locally and reported through
    /// [`PipelineOutcome::notices`].
    #[instrument(
        skip_all,
        fields(city = %request.profile.city(), language = %request.language)
    )]
    pub async fn run(&self, request: PipelineRequest, cancel: CancellationToken) -> PipelineOutcome {
        let mut ctx = RunContext::new(request.language, cancel);

        let refined_query = self.composer.compose(&request, &mut ctx).await;

        let searched = self
            .search
            .search(&refined_query, request.language, ctx.cancel_token())
            .await;

        let (used_fallback, recommendation_text) = match Branch::route(searched) {
            Branch::Summarize(results) => {
                let text = self.summarizer.summarize(&results, &request, &mut ctx).await;
                (false, text)
            }
            Branch::Fallback { reason, detail } => {
                tracing::info!(reason = ?reason, "Taking fallback path");
                ctx.notify(reason.notice(), detail.as_deref());
                let text = self.fallback.generate(&request, &mut ctx).await;
                (true, text)
            }
        };

        tracing::info!(
            query = %refined_query,
            used_fallback,
            "Pipeline completed"
        );

        PipelineOutcome {
            result: PipelineResult {
                refined_query,
                used_fallback,
                recommendation_text,
            },
            notices: ctx.into_notices(),
        }
    }
}
