use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};

use crate::{
    models::{NoticeKind, PipelineRequest},
    services::{
        context::RunContext,
        llm::{complete_within, LlmClient},
    },
};

/// Turns a profile and mood prompt into a single search query
#[derive(Clone)]
pub struct QueryComposer {
    llm: Arc<dyn LlmClient>,
    call_timeout: Duration,
}

impl QueryComposer {
    pub fn new(llm: Arc<dyn LlmClient>, call_timeout: Duration) -> Self {
        Self { llm, call_timeout }
    }

    /// Asks the LLM for a query; a failed call yields [`template_query`] and a notice
    pub async fn compose(&self, request: &PipelineRequest, ctx: &mut RunContext) -> String {
        let prompt = build_prompt(request, today());

        let reply = complete_within(
            self.llm.as_ref(),
            &prompt,
            self.call_timeout,
            ctx.cancel_token(),
        )
        .await;

        match reply.map(|reply| clean_query(&reply)) {
            Ok(Some(query)) => {
                tracing::info!(query = %query, "Refined search query");
                query
            }
            Ok(None) => {
                ctx.notify(NoticeKind::ComposerFailed, Some("empty query"));
                template_query(request, today())
            }
            Err(e) => {
                ctx.notify(NoticeKind::ComposerFailed, Some(&e.to_string()));
                template_query(request, today())
            }
        }
    }
}

/// Deterministic query used when the LLM is unavailable
pub fn template_query(request: &PipelineRequest, today: NaiveDate) -> String {
    format!(
        "{} in {} {}",
        request.prompt.trim(),
        request.profile.city(),
        today.format("%B %Y")
    )
}

pub(crate) fn build_prompt(request: &PipelineRequest, today: NaiveDate) -> String {
    let interests = request.profile.interest_list(request.language);
    let interests = if interests.is_empty() {
        "anything upbeat".to_string()
    } else {
        interests
    };

    format!(
        "You are a friendly local guide. User profile: {profile}.\n\
         User prompt: {prompt}.\n\
         Write one concise web search query that finds positive local places or events in {city} matching this mood.\n\
         Focus on these interests: {interests}.\n\
         Be specific, e.g. \"best cozy restaurants in {city} concerts {month}\".\n\
         Reply with the search query only, without quotes or explanation.",
        profile = request.profile.to_prompt_json(request.language),
        prompt = request.prompt.trim(),
        city = request.profile.city(),
        interests = interests,
        month = today.format("%B %Y"),
    )
}

/// First non-empty line of the reply with labels and wrapping quotes removed
fn clean_query(reply: &str) -> Option<String> {
    let line = reply.lines().map(str::trim).find(|line| !line.is_empty())?;
    let line = line
        .strip_prefix("Search query:")
        .or_else(|| line.strip_prefix("Query:"))
        .unwrap_or(line);
    let query = line.trim().trim_matches(['"', '\'', '`']).trim();

    (!query.is_empty()).then(|| query.to_string())
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
