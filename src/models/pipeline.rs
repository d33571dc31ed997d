use serde::Serialize;

use super::{Language, UserProfile};

/// One unit of work for the recommendation pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineRequest {
    pub profile: UserProfile,
    pub prompt: String,
    pub language: Language,
}

/// Final text returned for display
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PipelineResult {
    /// Query that was sent to the search backend
    pub refined_query: String,
    pub used_fallback: bool,
    pub recommendation_text: String,
}

/// Category of a non-fatal warning raised during a pipeline run
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    ComposerFailed,
    RateLimited,
    SearchFailed,
    NoResults,
    SummarizerFailed,
    FallbackFailed,
    Cancelled,
}

/// A localized warning delivered alongside the result
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PipelineOutcome {
    #[serde(flatten)]
    pub result: PipelineResult,
    pub notices: Vec<Notice>,
}

impl PipelineOutcome {
    pub fn has_notice(&self, kind: NoticeKind) -> bool {
        self.notices.iter().any(|notice| notice.kind == kind)
    }
}
