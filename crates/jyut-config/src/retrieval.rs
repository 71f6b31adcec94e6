use std::env;

use serde::{Deserialize, Serialize};

fn default_top_k() -> u32 {
    3
}

fn default_distance_threshold() -> f64 {
    0.5
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Display name of the corpus to use; empty means "first corpus found"
    pub corpus_display_name: String,
    #[serde(default = "default_top_k")]
    pub similarity_top_k: u32,
    #[serde(default = "default_distance_threshold")]
    pub vector_distance_threshold: f64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            corpus_display_name: String::new(),
            similarity_top_k: default_top_k(),
            vector_distance_threshold: default_distance_threshold(),
        }
    }
}

impl RetrievalConfig {
    pub fn new() -> Self {
        Self {
            corpus_display_name: env::var("RAG_CORPUS_DISPLAY_NAME").unwrap_or_default(),
            ..Self::default()
        }
    }
}
