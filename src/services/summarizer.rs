use std::sync::Arc;
use std::time::Duration;

use crate::{
    i18n::{self, TextKey},
    models::{NoticeKind, PipelineRequest, SearchResult},
    services::{
        context::RunContext,
        llm::{complete_within, LlmClient},
    },
};

/// Only the top results go into the prompt to keep it short
pub const SUMMARY_RESULT_LIMIT: usize = 3;

/// Turns search results into a localized recommendation list
#[derive(Clone)]
pub struct Summarizer {
    llm: Arc<dyn LlmClient>,
    call_timeout: Duration,
}

impl Summarizer {
    pub fn new(llm: Arc<dyn LlmClient>, call_timeout: Duration) -> Self {
        Self { llm, call_timeout }
    }

    pub async fn summarize(
        &self,
        results: &[SearchResult],
        request: &PipelineRequest,
        ctx: &mut RunContext,
    ) -> String {
        let prompt = build_prompt(results, request);

        match complete_within(
            self.llm.as_ref(),
            &prompt,
            self.call_timeout,
            ctx.cancel_token(),
        )
        .await
        {
            Ok(text) => text,
            Err(e) => {
                ctx.notify(NoticeKind::SummarizerFailed, Some(&e.to_string()));
                i18n::text(TextKey::SummaryUnavailable, request.language).to_string()
            }
        }
    }
}

pub(crate) fn build_prompt(results: &[SearchResult], request: &PipelineRequest) -> String {
    let top = &results[..results.len().min(SUMMARY_RESULT_LIMIT)];
    let results_json = serde_json::to_string(top).unwrap_or_else(|_| "[]".to_string());

    format!(
        "You are a witty, helpful local guide. Summarize these web search results into 3-5 personalized suggestions.\n\
         User profile: {profile}. Prompt: {prompt}.\n\
         Focus on positive, local vibes (restaurants, concerts, etc.). Include links and brief descriptions.\n\
         Output in {language}: bullet points, engaging tone.\n\
         Results: {results}",
        profile = request.profile.to_prompt_json(request.language),
        prompt = request.prompt.trim(),
        language = request.language.code().to_uppercase(),
        results = results_json,
    )
}
