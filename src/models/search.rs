use serde::{Deserialize, Serialize};

/// A normalized web search hit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub title: String,
    /// Empty when the backend did not supply a link
    pub href: String,
    /// Snippet text
    pub body: String,
}

/// A record as a structured backend reports it
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RawRecord {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "href", alias = "url")]
    pub link: Option<String>,
    #[serde(default, alias = "body", alias = "content")]
    pub snippet: Option<String>,
}

/// Backend response before normalization
#[derive(Debug, Clone, PartialEq)]
pub enum RawSearchResponse {
    Records(Vec<RawRecord>),
    Text(String),
}
