use std::env;

use serde::{Deserialize, Serialize};

fn default_gemini_model() -> String {
    "gemini-1.5-flash-001".to_string()
}

fn default_claude_model() -> String {
    "claude-3-5-sonnet-v2@20241022".to_string()
}

fn default_claude_region() -> String {
    "us-east5".to_string()
}

fn default_temperature() -> f32 {
    2.0
}

fn default_top_p() -> f32 {
    0.95
}

fn default_max_output_tokens() -> u32 {
    8192
}

fn default_meaning_temperature() -> f32 {
    0.2
}

fn default_cantonese_temperature() -> f32 {
    0.7
}

fn default_cantonese_max_tokens() -> u32 {
    100
}

/// Sampling parameters passed to a model
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct GenerationSettings {
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LlmConfig {
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
    #[serde(default = "default_claude_model")]
    pub claude_model: String,
    /// Claude on Vertex is served from a different region than Gemini
    #[serde(default = "default_claude_region")]
    pub claude_region: String,
    /// Used for script conversion and Mandarin sentences
    pub generation: GenerationSettings,
    #[serde(default = "default_meaning_temperature")]
    pub meaning_temperature: f32,
    #[serde(default = "default_cantonese_temperature")]
    pub cantonese_temperature: f32,
    #[serde(default = "default_cantonese_max_tokens")]
    pub cantonese_max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            gemini_model: default_gemini_model(),
            claude_model: default_claude_model(),
            claude_region: default_claude_region(),
            generation: GenerationSettings::default(),
            meaning_temperature: default_meaning_temperature(),
            cantonese_temperature: default_cantonese_temperature(),
            cantonese_max_tokens: default_cantonese_max_tokens(),
        }
    }
}

impl LlmConfig {
    pub fn new() -> Self {
        let defaults = Self::default();

        Self {
            gemini_model: env::var("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            claude_model: env::var("CLAUDE_MODEL").unwrap_or(defaults.claude_model),
            claude_region: env::var("CLAUDE_REGION").unwrap_or(defaults.claude_region),
            ..defaults
        }
    }
}
