use std::sync::Arc;
use std::time::Duration;

use crate::{
    i18n::{self, TextKey},
    models::{NoticeKind, PipelineRequest},
    services::{
        context::RunContext,
        llm::{complete_within, LlmClient},
    },
};

/// Suggestions invented by the LLM when live search has nothing to offer
#[derive(Clone)]
pub struct FallbackGenerator {
    llm: Arc<dyn LlmClient>,
    call_timeout: Duration,
    enabled: bool,
}

impl FallbackGenerator {
    pub fn new(llm: Arc<dyn LlmClient>, call_timeout: Duration, enabled: bool) -> Self {
        Self {
            llm,
            call_timeout,
            enabled,
        }
    }

    /// Never fails: a disabled generator or a failed call yields the no-results text
    pub async fn generate(&self, request: &PipelineRequest, ctx: &mut RunContext) -> String {
        let no_results = i18n::text(TextKey::NoResults, request.language).to_string();
        if !self.enabled {
            return no_results;
        }

        let prompt = build_prompt(request);
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
                ctx.notify(NoticeKind::FallbackFailed, Some(&e.to_string()));
                no_results
            }
        }
    }
}

pub(crate) fn build_prompt(request: &PipelineRequest) -> String {
    format!(
        "You are a friendly local guide. Live web search is unavailable right now.\n\
         User profile: {profile}. Prompt: {prompt}.\n\
         Suggest 3-5 plausible places or activities in {city} that fit this mood and these interests: {interests}.\n\
         Start with a one-line note that these are general ideas, not verified by live search, and tell the user to check opening times.\n\
         Output in {language}: bullet points, engaging tone, no invented links.",
        profile = request.profile.to_prompt_json(request.language),
        prompt = request.prompt.trim(),
        city = request.profile.city(),
        interests = request.profile.interest_list(request.language),
        language = request.language.code().to_uppercase(),
    )
}
