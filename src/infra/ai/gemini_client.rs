// =============================================================================
// GEMINI CLIENT - Google AI Studio API Integration
// =============================================================================
//
// Implements the `CompletionProvider` port against Gemini's `generateContent`
// endpoint (https://ai.google.dev/gemini-api/docs).
//
// - Authentication: API key as a query parameter (`?key=API_KEY`), not a
//   Bearer header.
// - Request format: `contents[]` with nested `parts`.
// - Response format: content at `candidates[0].content.parts[].text`.

use crate::core::ai::{AiConfig, CompletionProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::error::Error;

const GENERATE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

/// One message in the request/response. The assistant sends a single user
/// turn: the fully assembled grounded prompt.
#[derive(Debug, Serialize, Deserialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,

    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Content,

    #[allow(dead_code)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
    #[allow(dead_code)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiErrorDetail,
}

/// Client for Gemini's generateContent endpoint.
pub struct GeminiClient {
    client: Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: crate::infra::http_client(),
            api_key: api_key.into(),
        }
    }

    fn build_request(prompt: &str, config: &AiConfig) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: Some(GenerationConfig {
                temperature: Some(config.temperature),
                max_output_tokens: config.max_output_tokens,
            }),
        }
    }

    fn extract_text(response: &GenerateContentResponse) -> Option<String> {
        let candidate = response.candidates.as_ref()?.first()?;
        let text: Vec<&str> = candidate
            .content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text.join(""))
        }
    }
}

#[async_trait]
impl CompletionProvider for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        config: &AiConfig,
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            GENERATE_URL, config.model, self.api_key
        );

        let request = Self::build_request(prompt, config);

        tracing::debug!(model = %config.model, prompt_len = prompt.len(), "Gemini request");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;

            // Prefer the structured error message when the body parses.
            if let Ok(error_response) = serde_json::from_str::<GeminiErrorResponse>(&error_text) {
                return Err(format!(
                    "Gemini API error ({}): {}",
                    status, error_response.error.message
                )
                .into());
            }

            return Err(format!("Gemini API error: {} - {}", status, error_text).into());
        }

        let response_json: GenerateContentResponse = response.json().await?;

        Self::extract_text(&response_json).ok_or_else(|| {
            "No content in Gemini response - the model may have been blocked by safety filters"
                .into()
        })
    }
}
