//! Gemini `generateContent` client.
//!
//! Sends the prompt and the photo as an inline image part, asks for a JSON
//! response constrained by a schema, and parses the first candidate's text.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::config::AiConfig;
use crate::error::{AiError, Result};

use super::data_uri::DataUri;
use super::generator::{ContentGenerator, GenerateFuture};
use super::prompt::{campaign_ideas_prompt, product_details_prompt};
use super::types::{CampaignIdeas, ContentRequest, ProductContent};

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Environment variables consulted for the API key, in order
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "CHAVE_API_GEMINI"];

/// Client for the Gemini REST API
pub struct GeminiClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GeminiClient {
    /// Create a client with default endpoint and no request timeout
    pub fn new<S: Into<String>>(api_key: S, model: S) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    /// Build a client from configuration, resolving the API key
    pub fn from_config(config: &AiConfig) -> Result<Self> {
        let api_key = resolve_api_key(config.api_key.as_deref(), |name| std::env::var(name).ok())
            .ok_or(AiError::MissingApiKey)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| generation_error(format!("could not build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }

    async fn generate_structured<T: DeserializeOwned>(
        &self,
        prompt: String,
        photo: &DataUri,
        schema: Value,
    ) -> Result<T> {
        let body = request_body(prompt, photo, schema);

        debug!(
            "POST {} ({}, {} image bytes)",
            self.url(),
            photo.mime_type(),
            photo.data().len()
        );

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| generation_error(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| generation_error(e.to_string()))?;

        if !status.is_success() {
            warn!("Gemini returned HTTP {}", status);
            return Err(generation_error(format!("HTTP {}: {}", status, api_error_message(&text))));
        }

        let response: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|e| generation_error(format!("unexpected response body: {}", e)))?;

        parse_structured(&candidate_text(response)?)
    }
}

impl ContentGenerator for GeminiClient {
    fn generate_product_content<'a>(&'a self, request: &'a ContentRequest) -> GenerateFuture<'a, ProductContent> {
        Box::pin(async move {
            info!("🤖 Requesting product content from {}", self.model);
            self.generate_structured(
                product_details_prompt(request.description()),
                &request.photo,
                product_content_schema(),
            )
            .await
        })
    }

    fn suggest_campaign_ideas<'a>(&'a self, request: &'a ContentRequest) -> GenerateFuture<'a, CampaignIdeas> {
        Box::pin(async move {
            info!("🤖 Requesting campaign ideas from {}", self.model);
            self.generate_structured(
                campaign_ideas_prompt(request.description()),
                &request.photo,
                campaign_ideas_schema(),
            )
            .await
        })
    }
}

/// First non-empty of the configured key and the known environment variables
pub fn resolve_api_key<F>(configured: Option<&str>, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    configured
        .map(str::to_string)
        .into_iter()
        .chain(API_KEY_VARS.iter().filter_map(|name| lookup(*name)))
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
}

fn generation_error(message: String) -> crate::error::FotixError {
    AiError::Generation { message }.into()
}

fn request_body(prompt: String, photo: &DataUri, schema: Value) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![
                Part {
                    text: Some(prompt),
                    inline_data: None,
                },
                Part {
                    text: None,
                    inline_data: Some(InlineData {
                        mime_type: photo.mime_type().to_string(),
                        data: photo.base64_data(),
                    }),
                },
            ],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: schema,
        },
    }
}

fn product_content_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING", "description": "The title of the product." },
            "description": { "type": "STRING", "description": "The description of the product." },
            "seoTags": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "SEO tags for the product."
            }
        },
        "required": ["title", "description", "seoTags"]
    })
}

fn campaign_ideas_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "campaignIdeas": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "AI-generated marketing campaign ideas for the product."
            }
        },
        "required": ["campaignIdeas"]
    })
}

/// Concatenated text parts of the first candidate
fn candidate_text(response: GenerateContentResponse) -> Result<String> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(generation_error(format!("prompt blocked: {}", reason)));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| generation_error("model returned no candidates".to_string()))?;

    let text: String = candidate
        .content
        .unwrap_or_default()
        .parts
        .into_iter()
        .filter_map(|part| part.text)
        .collect();

    if text.trim().is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".to_string());
        return Err(generation_error(format!("model returned no text (finish reason: {})", reason)));
    }

    Ok(text)
}

/// Parse model output as JSON, tolerating a Markdown code fence around it
fn parse_structured<T: DeserializeOwned>(text: &str) -> Result<T> {
    let trimmed = text.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);

    serde_json::from_str(unfenced.trim())
        .map_err(|e| generation_error(format!("could not parse model output: {}", e)))
}

/// `error.message` from a Google API error body, or the raw body
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FotixError;

    fn response(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let photo = DataUri::new("image/png", vec![1, 2, 3]);
        let body = serde_json::to_value(request_body(
            "describe".to_string(),
            &photo,
            product_content_schema(),
        ))
        .unwrap();

        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "describe");
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[1]["inlineData"]["data"], "AQID");
        assert!(parts[0].get("inlineData").is_none());
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(
            body["generationConfig"]["responseSchema"]["required"][2],
            "seoTags"
        );
    }

    #[test]
    fn test_parses_first_candidate() {
        let parsed = response(
            r#"{"candidates":[{"content":{"role":"model","parts":[
                {"text":"{\"title\":\"Linen shirt\","},
                {"text":"\"description\":\"Cool.\",\"seoTags\":[\"linen\"]}"}
            ]},"finishReason":"STOP"}]}"#,
        );

        let content: ProductContent = parse_structured(&candidate_text(parsed).unwrap()).unwrap();
        assert_eq!(content.title, "Linen shirt");
        assert_eq!(content.seo_tags, vec!["linen"]);
    }

    #[test]
    fn test_fenced_output_is_accepted() {
        let ideas: CampaignIdeas =
            parse_structured("```json\n{\"campaignIdeas\":[\"Summer drop\"]}\n```").unwrap();
        assert_eq!(ideas.campaign_ideas, vec!["Summer drop"]);
    }

    #[test]
    fn test_blocked_prompt_is_a_generation_error() {
        let parsed = response(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#);
        let err = candidate_text(parsed).unwrap_err();
        assert!(matches!(err, FotixError::Ai(AiError::Generation { ref message }) if message.contains("SAFETY")));
    }

    #[test]
    fn test_empty_candidate_reports_finish_reason() {
        let parsed = response(r#"{"candidates":[{"finishReason":"MAX_TOKENS"}]}"#);
        let err = candidate_text(parsed).unwrap_err();
        assert!(err.to_string().contains("MAX_TOKENS"));
    }

    #[test]
    fn test_api_error_message_extraction() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(api_error_message(body), "API key not valid.");
        assert_eq!(api_error_message("  upstream down "), "upstream down");
    }

    #[test]
    fn test_api_key_resolution_order() {
        let env = |name: &str| match name {
            "GEMINI_API_KEY" => Some(String::new()),
            "CHAVE_API_GEMINI" => Some("from-chave".to_string()),
            _ => None,
        };

        assert_eq!(resolve_api_key(Some("configured"), env), Some("configured".to_string()));
        assert_eq!(resolve_api_key(None, env), Some("from-chave".to_string()));
        assert_eq!(resolve_api_key(Some(" "), |_| None), None);
    }

    #[test]
    fn test_url_trims_endpoint_slash() {
        let mut client = GeminiClient::new("key", "gemini-test");
        client.endpoint = "http://localhost:8080/v1beta/".to_string();
        assert_eq!(
            client.url(),
            "http://localhost:8080/v1beta/models/gemini-test:generateContent"
        );
    }
}
