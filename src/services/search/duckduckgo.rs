/// DuckDuckGo HTML search backend
///
/// Posts the query to the keyless HTML endpoint and scrapes result blocks
/// into records. When the page layout does not match (DuckDuckGo changes it
/// from time to time) the visible text is handed back unstructured and the
/// line parser takes over.
///
/// Throttling shows up as HTTP 429, or as a 202 "anomaly" page without any
/// results.
use reqwest::{Client as HttpClient, StatusCode, Url};
use scraper::{Html, Selector};

use crate::{
    error::{looks_rate_limited, SearchError},
    models::{Language, RawRecord, RawSearchResponse},
    services::search::SearchBackend,
};

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) local-goodies/0.1";

#[derive(Clone)]
pub struct DuckDuckGoBackend {
    http_client: HttpClient,
    endpoint: String,
}

impl DuckDuckGoBackend {
    pub fn new(endpoint: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            endpoint,
        }
    }

    fn region(language: Language) -> &'static str {
        match language {
            Language::En => "wt-wt",
            Language::De => "de-de",
        }
    }
}

#[async_trait::async_trait]
impl SearchBackend for DuckDuckGoBackend {
    async fn raw_search(
        &self,
        query: &str,
        language: Language,
    ) -> Result<RawSearchResponse, SearchError> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "text/html")
            .form(&[("q", query), ("kl", Self::region(language))])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, "DuckDuckGo request failed");
            return Err(SearchError::from_status(status, &body));
        }

        // A body that fails to arrive is a transport failure, not an empty page
        let body = response.text().await?;

        let records = parse_results_page(&body);
        if !records.is_empty() {
            return Ok(RawSearchResponse::Records(records));
        }

        if status == StatusCode::ACCEPTED || looks_rate_limited(&body) {
            return Err(SearchError::RateLimited(format!(
                "DuckDuckGo returned {} without results",
                status
            )));
        }

        Ok(RawSearchResponse::Text(visible_text(&body)))
    }

    fn name(&self) -> &'static str {
        "duckduckgo"
    }
}

/// Extracts `{title, link, snippet}` from each result block on the page
pub fn parse_results_page(html: &str) -> Vec<RawRecord> {
    let document = Html::parse_document(html);
    let (Ok(result_sel), Ok(link_sel), Ok(snippet_sel)) = (
        Selector::parse(".result"),
        Selector::parse("a.result__a"),
        Selector::parse(".result__snippet"),
    ) else {
        return Vec::new();
    };

    document
        .select(&result_sel)
        .filter_map(|result| {
            let link = result.select(&link_sel).next()?;
            let title = collapse_whitespace(&link.text().collect::<String>());
            if title.is_empty() {
                return None;
            }

            let href = link.value().attr("href").map(resolve_redirect);
            let snippet = result
                .select(&snippet_sel)
                .next()
                .map(|el| collapse_whitespace(&el.text().collect::<String>()));

            Some(RawRecord {
                title: Some(title),
                link: href,
                snippet,
            })
        })
        .collect()
}

/// Unwraps DuckDuckGo's `/l/?uddg=<target>` redirect links
pub fn resolve_redirect(href: &str) -> String {
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    };

    Url::parse(&absolute)
        .ok()
        .and_then(|url| {
            url.query_pairs()
                .find(|(key, _)| key == "uddg")
                .map(|(_, target)| target.into_owned())
        })
        .unwrap_or(absolute)
}

fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let Ok(body_sel) = Selector::parse("body") else {
        return String::new();
    };

    document
        .select(&body_sel)
        .flat_map(|body| body.text())
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
