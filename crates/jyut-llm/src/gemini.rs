use async_trait::async_trait;
use jyut_config::vertex::VertexConfig;
use serde::Deserialize;
use serde_json::json;

use crate::{GenerateError, Generation, GenerationRequest, ProviderMetadata, TextGenerator, check_status};

const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_HARASSMENT",
];

/// Gemini through the Vertex AI `generateContent` endpoint
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    vertex: VertexConfig,
    model: String,
}

impl GeminiClient {
    pub fn new(client: reqwest::Client, vertex: VertexConfig, model: String) -> Self {
        Self {
            client,
            vertex,
            model,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/{}/publishers/google/models/{}:generateContent",
            self.vertex.api_host(&self.vertex.location),
            self.vertex.parent(),
            self.model
        )
    }
}

pub(crate) fn request_body(request: &GenerationRequest) -> serde_json::Value {
    let safety_settings: Vec<_> = HARM_CATEGORIES
        .iter()
        .map(|category| json!({ "category": category, "threshold": "BLOCK_NONE" }))
        .collect();

    let mut generation_config = json!({
        "temperature": request.temperature,
        "maxOutputTokens": request.max_output_tokens,
    });
    if let Some(top_p) = request.top_p {
        generation_config["topP"] = json!(top_p);
    }

    let mut body = json!({
        "contents": [{ "role": "user", "parts": [{ "text": request.prompt }] }],
        "generationConfig": generation_config,
        "safetySettings": safety_settings,
    });
    if let Some(system) = &request.system {
        body["systemInstruction"] = json!({ "parts": [{ "text": system }] });
    }

    body
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

pub(crate) fn response_text(json: serde_json::Value) -> Result<String, GenerateError> {
    let response: GenerateContentResponse = serde_json::from_value(json)
        .map_err(|e| GenerateError::ApiError(format!("Failed to parse response: {}", e)))?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        return Err(GenerateError::EmptyResponse);
    }

    Ok(text.to_string())
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, GenerateError> {
        if self.vertex.access_token.is_empty() {
            return Err(GenerateError::AuthenticationError);
        }

        tracing::debug!(model = %self.model, "gemini generateContent");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.vertex.access_token)
            .json(&request_body(request))
            .send()
            .await?;

        check_status(response.status())?;

        let json: serde_json::Value = response.json().await.map_err(|e| {
            GenerateError::ApiError(format!("Failed to parse response: {}", e))
        })?;

        Ok(Generation {
            text: response_text(json)?,
            provider: "gemini".to_string(),
            model: self.model.clone(),
        })
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "Gemini".to_string(),
            model: self.model.clone(),
            region: self.vertex.location.clone(),
        }
    }
}
