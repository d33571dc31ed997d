/// Generic HTTP search backend
///
/// Sends `GET {endpoint}?q=<query>&lang=<code>` and accepts either a JSON
/// record list (`[...]` or `{"results": [...]}`) or plain text. Works with
/// self-hosted metasearch proxies and simple search gateways.
use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::{
    error::SearchError,
    models::{Language, RawRecord, RawSearchResponse},
    services::search::SearchBackend,
};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonPayload {
    List(Vec<RawRecord>),
    Wrapped { results: Vec<RawRecord> },
}

#[derive(Clone)]
pub struct JsonSearchBackend {
    http_client: HttpClient,
    endpoint: String,
    api_key: Option<String>,
}

impl JsonSearchBackend {
    pub fn new(endpoint: String, api_key: Option<String>) -> Self {
        Self {
            http_client: HttpClient::new(),
            endpoint,
            api_key,
        }
    }
}

#[async_trait::async_trait]
impl SearchBackend for JsonSearchBackend {
    async fn raw_search(
        &self,
        query: &str,
        language: Language,
    ) -> Result<RawSearchResponse, SearchError> {
        let mut request = self
            .http_client
            .get(&self.endpoint)
            .query(&[("q", query), ("lang", language.code())]);

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Search API request failed");
            return Err(SearchError::from_status(status, &body));
        }

        let body = response.text().await?;

        match serde_json::from_str::<JsonPayload>(&body) {
            Ok(JsonPayload::List(records)) | Ok(JsonPayload::Wrapped { results: records }) => {
                Ok(RawSearchResponse::Records(records))
            }
            Err(e) => {
                tracing::debug!(error = %e, "Search API response is not structured, passing text through");
                Ok(RawSearchResponse::Text(body))
            }
        }
    }

    fn name(&self) -> &'static str {
        "json"
    }
}
