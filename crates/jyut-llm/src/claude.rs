use async_trait::async_trait;
use jyut_config::vertex::VertexConfig;
use serde::Deserialize;
use serde_json::json;

use crate::{GenerateError, Generation, GenerationRequest, ProviderMetadata, TextGenerator, check_status};

const ANTHROPIC_VERSION: &str = "vertex-2023-10-16";

/// Claude served from Vertex AI (`rawPredict`)
#[derive(Clone)]
pub struct ClaudeVertexClient {
    client: reqwest::Client,
    vertex: VertexConfig,
    region: String,
    model: String,
}

impl ClaudeVertexClient {
    pub fn new(client: reqwest::Client, vertex: VertexConfig, region: String, model: String) -> Self {
        Self {
            client,
            vertex,
            region,
            model,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/anthropic/models/{}:rawPredict",
            self.vertex.api_host(&self.region),
            self.vertex.project_id,
            self.region,
            self.model
        )
    }
}

pub(crate) fn request_body(request: &GenerationRequest) -> serde_json::Value {
    let mut body = json!({
        "anthropic_version": ANTHROPIC_VERSION,
        "max_tokens": request.max_output_tokens,
        "temperature": request.temperature,
        "messages": [{ "role": "user", "content": request.prompt }],
    });
    if let Some(system) = &request.system {
        body["system"] = json!(system);
    }
    if let Some(top_p) = request.top_p {
        body["top_p"] = json!(top_p);
    }

    body
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

pub(crate) fn response_text(json: serde_json::Value) -> Result<String, GenerateError> {
    let response: MessagesResponse = serde_json::from_value(json)
        .map_err(|e| GenerateError::ApiError(format!("Failed to parse response: {}", e)))?;

    response
        .content
        .into_iter()
        .find(|block| block.kind == "text")
        .and_then(|block| block.text)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or(GenerateError::EmptyResponse)
}

#[async_trait]
impl TextGenerator for ClaudeVertexClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, GenerateError> {
        if self.vertex.access_token.is_empty() {
            return Err(GenerateError::AuthenticationError);
        }

        tracing::debug!(model = %self.model, region = %self.region, "claude rawPredict");

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
            provider: "claude".to_string(),
            model: self.model.clone(),
        })
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "Claude on Vertex AI".to_string(),
            model: self.model.clone(),
            region: self.region.clone(),
        }
    }
}
