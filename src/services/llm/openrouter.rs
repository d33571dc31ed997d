/// OpenRouter chat completions client
///
/// OpenRouter speaks the OpenAI `/chat/completions` protocol, so any
/// compatible endpoint works by changing the base URL.
use reqwest::{Client as HttpClient, StatusCode};
use serde::{Deserialize, Serialize};

use crate::{error::LlmError, services::llm::LlmClient};

#[derive(Clone)]
pub struct OpenRouterClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl OpenRouterClient {
    pub fn new(api_key: String, api_url: String, model: String, temperature: f32) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            model,
            temperature,
        }
    }

    fn classify_failure(status: StatusCode, body: String) -> LlmError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::Auth(body),
            StatusCode::TOO_MANY_REQUESTS | StatusCode::PAYMENT_REQUIRED => LlmError::Quota(body),
            _ => LlmError::Api {
                status: status.as_u16(),
                body,
            },
        }
    }
}

#[async_trait::async_trait]
impl LlmClient for OpenRouterClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.api_url.trim_end_matches('/'));
        let payload = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: [ChatMessage {
                role: "system",
                content: prompt,
            }],
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %body,
                model = %self.model,
                "LLM request failed"
            );
            return Err(Self::classify_failure(status, body));
        }

        let response_text = response.text().await?;
        let body: ChatResponse = serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(error = %e, response = %response_text, "Failed to parse LLM response");
            LlmError::Malformed(e.to_string())
        })?;

        let answer = body
            .choices
            .into_iter()
            .find_map(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)?;

        tracing::info!(model = %self.model, chars = answer.len(), "LLM response generated");

        Ok(answer)
    }

    fn name(&self) -> &'static str {
        "openrouter"
    }
}
