/// Web search abstraction
///
/// Backends return whatever shape they naturally produce ([`RawSearchResponse`]);
/// the [`SearchClient`] owns retries, timeouts and normalization so every
/// backend gets the same treatment.
use crate::{
    error::SearchError,
    models::{Language, RawSearchResponse},
};

pub mod client;
pub mod duckduckgo;
pub mod json_api;
pub mod parser;

pub use client::SearchClient;
pub use duckduckgo::DuckDuckGoBackend;
pub use json_api::JsonSearchBackend;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SearchBackend: Send + Sync {
    /// Runs one search request without retrying
    async fn raw_search(
        &self,
        query: &str,
        language: Language,
    ) -> Result<RawSearchResponse, SearchError>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}
