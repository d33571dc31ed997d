mod common;

use std::sync::Arc;

use common::{
    build_pipeline, lisbon_records, Behavior, ScriptedSearch, StageLlm, FALLBACK_TEXT,
    MAX_ATTEMPTS, REFINED_QUERY,
};
use local_goodies::models::{Interest, Language, NoticeKind, PipelineRequest, UserProfile};
use tokio_util::sync::CancellationToken;

fn lisbon_request(language: Language) -> PipelineRequest {
    PipelineRequest {
        profile: UserProfile::new("Lisbon", [Interest::Concerts, Interest::Pubs]).unwrap(),
        prompt: "live music tonight".to_string(),
        language,
    }
}

#[tokio::test]
async fn test_structured_results_are_summarized() {
    let llm = Arc::new(StageLlm::default());
    let search = Arc::new(ScriptedSearch::new(Behavior::Records(lisbon_records())));
    let pipeline = build_pipeline(llm.clone(), search.clone());

    let outcome = pipeline
        .run(lisbon_request(Language::En), CancellationToken::new())
        .await;

    assert_eq!(outcome.result.refined_query, REFINED_QUERY);
    assert!(outcome.result.refined_query.contains("Lisbon"));
    assert!(!outcome.result.used_fallback);
    assert!(outcome
        .result
        .recommendation_text
        .contains("Hot Clube de Portugal"));
    assert!(outcome.notices.is_empty());
    assert_eq!(search.calls(), 1);
    assert_eq!(llm.summarize_calls(), 1);
    assert_eq!(llm.fallback_calls(), 0);
}

#[tokio::test]
async fn test_rate_limit_takes_fallback_without_summarizing() {
    let llm = Arc::new(StageLlm::default());
    let search = Arc::new(ScriptedSearch::new(Behavior::RateLimited));
    let pipeline = build_pipeline(llm.clone(), search.clone());

    let outcome = pipeline
        .run(lisbon_request(Language::En), CancellationToken::new())
        .await;

    assert!(outcome.result.used_fallback);
    assert_eq!(outcome.result.recommendation_text, FALLBACK_TEXT);
    assert_eq!(search.calls(), MAX_ATTEMPTS);
    assert_eq!(llm.summarize_calls(), 0);
    assert!(outcome.has_notice(NoticeKind::RateLimited));
    assert!(!outcome.has_notice(NoticeKind::SearchFailed));
}

#[tokio::test]
async fn test_empty_results_take_fallback() {
    let llm = Arc::new(StageLlm::default());
    let search = Arc::new(ScriptedSearch::new(Behavior::Empty));
    let pipeline = build_pipeline(llm.clone(), search);

    let outcome = pipeline
        .run(lisbon_request(Language::En), CancellationToken::new())
        .await;

    assert!(outcome.result.used_fallback);
    assert_eq!(outcome.result.recommendation_text, FALLBACK_TEXT);
    assert!(outcome.has_notice(NoticeKind::NoResults));
    assert_eq!(llm.summarize_calls(), 0);
}

#[tokio::test]
async fn test_transient_failures_below_limit_recover() {
    let llm = Arc::new(StageLlm::default());
    let failures = MAX_ATTEMPTS - 1;
    let search = Arc::new(ScriptedSearch::new(Behavior::FlakyThen(
        failures,
        lisbon_records(),
    )));
    let pipeline = build_pipeline(llm, search.clone());

    let outcome = pipeline
        .run(lisbon_request(Language::En), CancellationToken::new())
        .await;

    assert_eq!(search.calls(), failures + 1);
    assert!(!outcome.result.used_fallback);
}

#[tokio::test]
async fn test_transient_failures_at_limit_fall_back() {
    let llm = Arc::new(StageLlm::default());
    let search = Arc::new(ScriptedSearch::new(Behavior::FlakyThen(
        MAX_ATTEMPTS,
        lisbon_records(),
    )));
    let pipeline = build_pipeline(llm, search.clone());

    let outcome = pipeline
        .run(lisbon_request(Language::En), CancellationToken::new())
        .await;

    assert_eq!(search.calls(), MAX_ATTEMPTS);
    assert!(outcome.result.used_fallback);
    assert!(outcome.has_notice(NoticeKind::SearchFailed));
}

#[tokio::test]
async fn test_permanent_search_error_attempted_once() {
    let llm = Arc::new(StageLlm::default());
    let search = Arc::new(ScriptedSearch::new(Behavior::Rejected));
    let pipeline = build_pipeline(llm, search.clone());

    let outcome = pipeline
        .run(lisbon_request(Language::En), CancellationToken::new())
        .await;

    assert_eq!(search.calls(), 1);
    assert!(outcome.result.used_fallback);
    let notice = outcome
        .notices
        .iter()
        .find(|n| n.kind == NoticeKind::SearchFailed)
        .unwrap();
    assert!(notice.message.contains("status 403"));
}

#[tokio::test]
async fn test_unstructured_response_is_partitioned() {
    let llm = Arc::new(StageLlm::default());
    let search = Arc::new(ScriptedSearch::new(Behavior::Text(
        "Fado at Tasca do Chico tonight\nJazz jam in Bairro Alto\nRooftop DJ set at Park Bar"
            .to_string(),
    )));
    let pipeline = build_pipeline(llm, search);

    let outcome = pipeline
        .run(lisbon_request(Language::En), CancellationToken::new())
        .await;

    assert!(!outcome.result.used_fallback);
    assert!(outcome.result.recommendation_text.contains("Tasca do Chico"));
    assert!(outcome.result.recommendation_text.contains(r#""href":"""#));
}

#[tokio::test]
async fn test_llm_outage_still_returns_text() {
    let llm = Arc::new(StageLlm::failing());
    let search = Arc::new(ScriptedSearch::new(Behavior::Records(lisbon_records())));
    let pipeline = build_pipeline(llm, search);

    let outcome = pipeline
        .run(lisbon_request(Language::De), CancellationToken::new())
        .await;

    assert!(outcome.result.refined_query.starts_with("live music tonight in Lisbon"));
    assert!(!outcome.result.used_fallback);
    assert_eq!(
        outcome.result.recommendation_text,
        "Vorschläge konnten nicht erstellt werden."
    );
    assert!(outcome.has_notice(NoticeKind::ComposerFailed));
    assert!(outcome.has_notice(NoticeKind::SummarizerFailed));
    assert!(outcome.notices[0].message.starts_with("Fehler beim Sprachmodell"));
}

#[tokio::test]
async fn test_total_outage_gives_apology() {
    let llm = Arc::new(StageLlm::failing());
    let search = Arc::new(ScriptedSearch::new(Behavior::RateLimited));
    let pipeline = build_pipeline(llm, search);

    let outcome = pipeline
        .run(lisbon_request(Language::En), CancellationToken::new())
        .await;

    assert!(outcome.result.used_fallback);
    assert_eq!(
        outcome.result.recommendation_text,
        "No suggestions found. Try a different prompt!"
    );
}

#[tokio::test]
async fn test_cancelled_run_completes() {
    let llm = Arc::new(StageLlm::default());
    let search = Arc::new(ScriptedSearch::new(Behavior::Records(lisbon_records())));
    let pipeline = build_pipeline(llm, search);

    let cancel = CancellationToken::new();
    cancel.cancel();
    let outcome = pipeline.run(lisbon_request(Language::En), cancel).await;

    assert!(outcome.result.used_fallback);
    assert!(!outcome.result.recommendation_text.is_empty());
    assert!(outcome.has_notice(NoticeKind::Cancelled));
}
