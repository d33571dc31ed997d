#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use local_goodies::error::{LlmError, SearchError};
use local_goodies::models::{Language, RawRecord, RawSearchResponse};
use local_goodies::services::llm::LlmClient;
use local_goodies::services::retry::RetryPolicy;
use local_goodies::services::search::{SearchBackend, SearchClient};
use local_goodies::services::Pipeline;

pub const MAX_ATTEMPTS: u32 = 3;
pub const REFINED_QUERY: &str = "live music Lisbon tonight concerts pubs";
pub const FALLBACK_TEXT: &str = "- Fado evening in Alfama (idea, not verified by live search)";

/// LLM stand-in that answers by pipeline stage and counts calls.
/// Summaries echo the prompt so tests can see what reached the model.
#[derive(Default)]
pub struct StageLlm {
    pub failing: bool,
    pub compose_calls: AtomicU32,
    pub summarize_calls: AtomicU32,
    pub fallback_calls: AtomicU32,
}

impl StageLlm {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn summarize_calls(&self) -> u32 {
        self.summarize_calls.load(Ordering::SeqCst)
    }

    pub fn fallback_calls(&self) -> u32 {
        self.fallback_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl LlmClient for StageLlm {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let reply = if prompt.contains("Summarize these web search results") {
            self.summarize_calls.fetch_add(1, Ordering::SeqCst);
            prompt.to_string()
        } else if prompt.contains("Live web search is unavailable") {
            self.fallback_calls.fetch_add(1, Ordering::SeqCst);
            FALLBACK_TEXT.to_string()
        } else {
            self.compose_calls.fetch_add(1, Ordering::SeqCst);
            REFINED_QUERY.to_string()
        };

        if self.failing {
            return Err(LlmError::Auth("invalid API key".to_string()));
        }
        Ok(reply)
    }

    fn name(&self) -> &'static str {
        "stage"
    }
}

pub enum Behavior {
    Records(Vec<RawRecord>),
    Text(String),
    Empty,
    RateLimited,
    /// Fails transiently this many times, then returns the records
    FlakyThen(u32, Vec<RawRecord>),
    Rejected,
}

/// Search backend stand-in with a fixed behavior and a call counter
pub struct ScriptedSearch {
    behavior: Behavior,
    calls: AtomicU32,
}

impl ScriptedSearch {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl SearchBackend for ScriptedSearch {
    async fn raw_search(
        &self,
        _query: &str,
        _language: Language,
    ) -> Result<RawSearchResponse, SearchError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        match &self.behavior {
            Behavior::Records(records) => Ok(RawSearchResponse::Records(records.clone())),
            Behavior::Text(text) => Ok(RawSearchResponse::Text(text.clone())),
            Behavior::Empty => Ok(RawSearchResponse::Records(Vec::new())),
            Behavior::RateLimited => Err(SearchError::RateLimited(
                "https://html.duckduckgo.com/html 202 Ratelimit".to_string(),
            )),
            Behavior::FlakyThen(failures, records) => {
                if call <= *failures {
                    Err(SearchError::Unavailable("connection reset".to_string()))
                } else {
                    Ok(RawSearchResponse::Records(records.clone()))
                }
            }
            Behavior::Rejected => Err(SearchError::Rejected("status 403".to_string())),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

pub fn lisbon_records() -> Vec<RawRecord> {
    vec![
        RawRecord {
            title: Some("Hot Clube de Portugal".to_string()),
            link: Some("https://www.hotclube.pt".to_string()),
            snippet: Some("Lisbon's legendary jazz club with live sets tonight".to_string()),
        },
        RawRecord {
            title: Some("Musicbox Lisboa".to_string()),
            link: Some("https://musicboxlisboa.com".to_string()),
            snippet: Some("Concerts and DJ nights in Cais do Sodré".to_string()),
        },
    ]
}

pub fn build_pipeline(llm: Arc<StageLlm>, search: Arc<ScriptedSearch>) -> Pipeline {
    let client = SearchClient::new(
        search,
        RetryPolicy::new(MAX_ATTEMPTS, Duration::ZERO, Duration::ZERO, Duration::ZERO),
        5,
        Duration::from_secs(5),
    );
    Pipeline::new(llm, client, Duration::from_secs(5), true)
}
