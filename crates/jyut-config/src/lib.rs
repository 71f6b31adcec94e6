use std::env;

use serde::{Deserialize, Serialize};

use self::llm::LlmConfig;
use self::retrieval::RetrievalConfig;
use self::store::StoreConfig;
use self::upload::UploadConfig;
use self::vertex::VertexConfig;

pub mod llm;
pub mod retrieval;
pub mod store;
pub mod upload;
pub mod vertex;

fn default_timeout_seconds() -> u64 {
    60
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub vertex: VertexConfig,
    pub llm: LlmConfig,
    pub retrieval: RetrievalConfig,
    pub upload: UploadConfig,
    pub store: StoreConfig,

    /// Per-request HTTP timeout
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vertex: VertexConfig::default(),
            llm: LlmConfig::default(),
            retrieval: RetrievalConfig::default(),
            upload: UploadConfig::default(),
            store: StoreConfig::default(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        let timeout_seconds = env::var("TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_timeout_seconds);

        Config {
            vertex: VertexConfig::new(),
            llm: LlmConfig::new(),
            retrieval: RetrievalConfig::new(),
            upload: UploadConfig::new(),
            store: StoreConfig::new(),

            timeout_seconds,
        }
    }

    /// Overlay a JSON profile on this config. Keys present in the profile win;
    /// everything else, including the access token, is kept.
    pub fn with_profile(self, json: &str) -> Result<Self, serde_json::Error> {
        let profile: serde_json::Value = serde_json::from_str(json)?;
        let mut merged = serde_json::to_value(&self)?;
        merge(&mut merged, profile);

        let mut config: Config = serde_json::from_value(merged)?;
        if config.vertex.access_token.is_empty() {
            config.vertex.access_token = self.vertex.access_token;
        }
        Ok(config)
    }
}

fn merge(base: &mut serde_json::Value, overlay: serde_json::Value) {
    match (base, overlay) {
        (serde_json::Value::Object(base), serde_json::Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_profile_keeps_defaults() {
        let config = Config::default()
            .with_profile(r#"{ "vertex": { "project_id": "demo" }, "upload": { "workers": 8 } }"#)
            .unwrap();

        assert_eq!(config.vertex.project_id, "demo");
        assert_eq!(config.vertex.location, "us-central1");
        assert_eq!(config.upload.workers, 8);
        assert_eq!(config.upload.flush_every, 10);
        assert_eq!(config.retrieval.similarity_top_k, 3);
        assert_eq!(config.store.collection, "vocabulary");
        assert_eq!(config.timeout_seconds, 60);
    }

    #[test]
    fn generation_defaults_match_sentence_settings() {
        let config = Config::default();

        assert_eq!(config.llm.generation.temperature, 2.0);
        assert_eq!(config.llm.generation.max_output_tokens, 8192);
        assert_eq!(config.llm.cantonese_max_tokens, 100);
        assert_eq!(config.llm.claude_region, "us-east5");
    }

    #[test]
    fn profile_overlays_environment_values() {
        let mut base = Config::default();
        base.vertex.project_id = "from-env".to_string();
        base.vertex.access_token = "token".to_string();
        base.retrieval.corpus_display_name = "wordshk".to_string();

        let config = base
            .with_profile(
                r#"{ "vertex": { "location": "europe-west4" }, "upload": { "workers": 2 } }"#,
            )
            .unwrap();

        assert_eq!(config.vertex.project_id, "from-env");
        assert_eq!(config.vertex.location, "europe-west4");
        assert_eq!(config.vertex.access_token, "token");
        assert_eq!(config.retrieval.corpus_display_name, "wordshk");
        assert_eq!(config.upload.workers, 2);
        assert_eq!(config.upload.flush_every, 10);
    }

    #[test]
    fn profile_values_replace_environment_values() {
        let mut base = Config::default();
        base.vertex.project_id = "from-env".to_string();

        let config = base
            .with_profile(r#"{ "vertex": { "project_id": "from-profile" } }"#)
            .unwrap();

        assert_eq!(config.vertex.project_id, "from-profile");
    }

    #[test]
    fn access_token_is_never_written_out() {
        let mut config = Config::default();
        config.vertex.access_token = "secret".to_string();

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }
}
