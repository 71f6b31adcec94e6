mod claude;
mod gemini;

pub use claude::ClaudeVertexClient;
pub use gemini::GeminiClient;

/// Text generation provider interface
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Run one prompt and return the model's text, trimmed
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, GenerateError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system: Option<String>,
    pub prompt: String,
    pub temperature: f32,
    pub top_p: Option<f32>,
    pub max_output_tokens: u32,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            temperature: 1.0,
            top_p: None,
            max_output_tokens: 1024,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_settings(mut self, settings: &jyut_config::llm::GenerationSettings) -> Self {
        self.temperature = settings.temperature;
        self.top_p = Some(settings.top_p);
        self.max_output_tokens = settings.max_output_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Generation {
    pub text: String,
    pub provider: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub model: String,
    pub region: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication error")]
    AuthenticationError,

    #[error("Model returned no text")]
    EmptyResponse,
}

/// Map the status codes both Vertex endpoints share
pub(crate) fn check_status(status: reqwest::StatusCode) -> Result<(), GenerateError> {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(GenerateError::RateLimitExceeded);
    }

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(GenerateError::AuthenticationError);
    }

    if !status.is_success() {
        return Err(GenerateError::ApiError(format!("HTTP {status}")));
    }

    Ok(())
}
