use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors surfaced through the HTTP API
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Failures of the hosted language model
#[derive(thiserror::Error, Debug)]
pub enum LlmError {
    #[error("LLM authentication failed: {0}")]
    Auth(String),

    #[error("LLM quota exceeded: {0}")]
    Quota(String),

    #[error("LLM API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("LLM HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LLM call timed out")]
    Timeout,

    #[error("LLM call cancelled")]
    Cancelled,

    #[error("Malformed LLM response: {0}")]
    Malformed(String),

    #[error("LLM returned an empty response")]
    EmptyResponse,
}

/// Failures of the web search backend
#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    #[error("Search backend rate limited: {0}")]
    RateLimited(String),

    #[error("Search call timed out")]
    Timeout,

    #[error("Search backend unavailable: {0}")]
    Unavailable(String),

    #[error("Search backend rejected request: {0}")]
    Rejected(String),

    #[error("Search cancelled")]
    Cancelled,

    #[error("Search failed after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        last: Box<SearchError>,
    },
}

impl SearchError {
    /// Whether another attempt could succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            SearchError::RateLimited(_) | SearchError::Timeout | SearchError::Unavailable(_)
        )
    }

    /// Whether rate limiting is the root cause, looking through exhausted retries
    pub fn is_rate_limited(&self) -> bool {
        match self {
            SearchError::RateLimited(_) => true,
            SearchError::Exhausted { last, .. } => last.is_rate_limited(),
            _ => false,
        }
    }

    /// Whether the caller cancelled the search
    pub fn is_cancelled(&self) -> bool {
        match self {
            SearchError::Cancelled => true,
            SearchError::Exhausted { last, .. } => last.is_cancelled(),
            _ => false,
        }
    }

    /// Classifies a non-success HTTP status from a search backend
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let detail = format!("status {}: {}", status, truncate(body, 200));
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            SearchError::RateLimited(detail)
        } else if status.is_server_error() || status == reqwest::StatusCode::REQUEST_TIMEOUT {
            SearchError::Unavailable(detail)
        } else if looks_rate_limited(body) {
            SearchError::RateLimited(detail)
        } else {
            SearchError::Rejected(detail)
        }
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return SearchError::Timeout;
        }
        if let Some(status) = e.status() {
            return SearchError::from_status(status, &e.to_string());
        }
        let text = e.to_string();
        if looks_rate_limited(&text) {
            SearchError::RateLimited(text)
        } else {
            SearchError::Unavailable(text)
        }
    }
}

/// Last-resort rate limit detection on free-form error text
pub fn looks_rate_limited(text: &str) -> bool {
    const MARKERS: [&str; 4] = ["rate limit", "ratelimit", "rate-limit", "too many requests"];
    let lower = text.to_lowercase();
    MARKERS.iter().any(|marker| lower.contains(marker))
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_status_classification() {
        assert!(SearchError::from_status(StatusCode::TOO_MANY_REQUESTS, "").is_rate_limited());
        assert!(matches!(
            SearchError::from_status(StatusCode::BAD_GATEWAY, ""),
            SearchError::Unavailable(_)
        ));
        assert!(matches!(
            SearchError::from_status(StatusCode::FORBIDDEN, "bad key"),
            SearchError::Rejected(_)
        ));
        assert!(
            SearchError::from_status(StatusCode::FORBIDDEN, "202 Ratelimit exceeded")
                .is_rate_limited()
        );
    }

    #[test]
    fn test_rate_limit_seen_through_exhausted() {
        let err = SearchError::Exhausted {
            attempts: 3,
            last: Box::new(SearchError::RateLimited("429".to_string())),
        };
        assert!(err.is_rate_limited());
        assert!(!err.is_transient());
    }

    #[test]
    fn test_heuristic_markers() {
        assert!(looks_rate_limited("DuckDuckGoSearchException: Ratelimit"));
        assert!(looks_rate_limited("Too Many Requests"));
        assert!(!looks_rate_limited("connection reset by peer"));
    }
}
