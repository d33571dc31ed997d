//! Normalization of raw backend output into [`SearchResult`]s.
//!
//! Structured records map field by field. Text blobs are first tried as a
//! JSON payload that was delivered as a string; anything else is split into
//! one result per non-empty line.

use serde_json::Value;

use crate::models::{RawRecord, RawSearchResponse, SearchResult};

pub const NO_TITLE: &str = "No title";

const TITLE_PREVIEW_CHARS: usize = 50;

/// Converts a backend response into at most `cap` results
pub fn normalize(raw: RawSearchResponse, cap: usize) -> Vec<SearchResult> {
    match raw {
        RawSearchResponse::Records(records) => from_records(records, cap),
        RawSearchResponse::Text(text) => parse_text(&text, cap),
    }
}

/// Best-effort parsing of an unstructured response body
pub fn parse_text(text: &str, cap: usize) -> Vec<SearchResult> {
    match parse_json_payload(text) {
        Some(JsonPayload::Records(records)) => from_records(records, cap),
        Some(JsonPayload::Lines(lines)) => partition_lines(&lines.join("\n"), cap),
        None => partition_lines(text, cap),
    }
}

/// One result per non-empty line; `href` is the first URL on the line, if any
pub fn partition_lines(text: &str, cap: usize) -> Vec<SearchResult> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(cap)
        .map(|line| SearchResult {
            title: title_preview(line),
            href: first_link(line).unwrap_or_default(),
            body: line.to_string(),
        })
        .collect()
}

fn from_records(records: Vec<RawRecord>, cap: usize) -> Vec<SearchResult> {
    records
        .into_iter()
        .filter_map(record_to_result)
        .take(cap)
        .collect()
}

fn record_to_result(record: RawRecord) -> Option<SearchResult> {
    let title = non_blank(record.title);
    let body = non_blank(record.snippet);

    // A record with neither title nor snippet gives the summarizer nothing
    if title.is_none() && body.is_none() {
        return None;
    }

    Some(SearchResult {
        title: title.unwrap_or_else(|| NO_TITLE.to_string()),
        href: non_blank(record.link).unwrap_or_default(),
        body: body.unwrap_or_default(),
    })
}

/// What a JSON body delivered as text turned out to hold
enum JsonPayload {
    Records(Vec<RawRecord>),
    /// An array of plain strings, one result each
    Lines(Vec<String>),
}

fn parse_json_payload(text: &str) -> Option<JsonPayload> {
    let trimmed = text.trim();
    if !trimmed.starts_with('[') && !trimmed.starts_with('{') {
        return None;
    }

    match serde_json::from_str::<Value>(trimmed).ok()? {
        Value::Array(items) => from_json_items(items),
        Value::Object(mut object) => match object.remove("results")? {
            Value::Array(items) => from_json_items(items),
            _ => None,
        },
        _ => None,
    }
}

/// `None` when the array holds nothing usable, so the text is split by line
fn from_json_items(items: Vec<Value>) -> Option<JsonPayload> {
    if items.is_empty() {
        return Some(JsonPayload::Records(Vec::new()));
    }

    let mut records = Vec::new();
    let mut lines = Vec::new();
    for item in items {
        match item {
            Value::String(line) => lines.push(line),
            Value::Object(_) => {
                if let Ok(record) = serde_json::from_value::<RawRecord>(item) {
                    records.push(record);
                }
            }
            _ => {}
        }
    }

    if !records.is_empty() {
        Some(JsonPayload::Records(records))
    } else if !lines.is_empty() {
        Some(JsonPayload::Lines(lines))
    } else {
        None
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn title_preview(line: &str) -> String {
    if line.chars().count() <= TITLE_PREVIEW_CHARS {
        return line.to_string();
    }
    let preview: String = line.chars().take(TITLE_PREVIEW_CHARS).collect();
    format!("{}...", preview.trim_end())
}

fn first_link(line: &str) -> Option<String> {
    line.split_whitespace()
        .find(|token| token.starts_with("https://") || token.starts_with("http://"))
        .map(|token| {
            token
                .trim_end_matches([',', '.', ';', ')', ']', '"'])
                .to_string()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, link: &str, snippet: &str) -> RawRecord {
        RawRecord {
            title: Some(title.to_string()),
            link: Some(link.to_string()),
            snippet: Some(snippet.to_string()),
        }
    }

    #[test]
    fn test_records_map_fields_and_cap() {
        let records = (0..8)
            .map(|i| record(&format!("Venue {}", i), "https://example.com", "Great vibes"))
            .collect();

        let results = normalize(RawSearchResponse::Records(records), 5);
        assert_eq!(results.len(), 5);
        assert_eq!(results[0].title, "Venue 0");
        assert_eq!(results[0].href, "https://example.com");
        assert_eq!(results[0].body, "Great vibes");
    }

    #[test]
    fn test_records_missing_fields() {
        let records = vec![
            RawRecord {
                title: None,
                link: None,
                snippet: Some("Open-air cinema by the river".to_string()),
            },
            RawRecord::default(),
        ];

        let results = normalize(RawSearchResponse::Records(records), 5);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, NO_TITLE);
        assert_eq!(results[0].href, "");
    }

    #[test]
    fn test_unstructured_blob_partitioned() {
        let blob = "Jazz night at Hot Clube\n\n  Fado in Alfama every evening  \nRooftop bar with DJ sets\nStreet food market\nCraft beer tasting\nLate-night karaoke\n";

        let results = parse_text(blob, 3);
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.href.is_empty()));
        assert_eq!(results[1].body, "Fado in Alfama every evening");
        assert_eq!(results[1].title, "Fado in Alfama every evening");
    }

    #[test]
    fn test_long_line_title_truncated() {
        let line = "a".repeat(80);
        let results = partition_lines(&line, 5);
        assert_eq!(results[0].title, format!("{}...", "a".repeat(50)));
        assert_eq!(results[0].body.len(), 80);
    }

    #[test]
    fn test_link_extracted_from_line() {
        let results = partition_lines("Fado night, see https://fado.pt/tonight.", 5);
        assert_eq!(results[0].href, "https://fado.pt/tonight");
    }

    #[test]
    fn test_json_string_payload() {
        let text = r#"[{"title": "Lux Frágil", "link": "https://luxfragil.com", "snippet": "Club by the river"}]"#;
        let results = normalize(RawSearchResponse::Text(text.to_string()), 5);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Lux Frágil");
        assert_eq!(results[0].href, "https://luxfragil.com");
    }

    #[test]
    fn test_json_object_with_results() {
        let text = r#"{"results": [{"title": "A", "url": "https://a.example", "content": "B"}]}"#;
        let results = parse_text(text, 5);
        assert_eq!(results[0].href, "https://a.example");
        assert_eq!(results[0].body, "B");
    }

    #[test]
    fn test_empty_text_yields_nothing() {
        assert!(parse_text("  \n\n ", 5).is_empty());
    }

    #[test]
    fn test_json_string_array_partitioned() {
        let text = r#"["Fado night at Tasca do Chico", "Jazz jam in Bairro Alto https://jazz.example"]"#;
        let results = parse_text(text, 5);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Fado night at Tasca do Chico");
        assert_eq!(results[1].href, "https://jazz.example");
    }

    #[test]
    fn test_json_array_without_records_split_as_text() {
        let results = parse_text("[1, 2, 3]", 5);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].body, "[1, 2, 3]");
    }

    #[test]
    fn test_empty_json_array_yields_nothing() {
        assert!(parse_text("[]", 5).is_empty());
        assert!(parse_text(r#"{"results": []}"#, 5).is_empty());
    }
}
