use std::env;

use serde::{Deserialize, Serialize};

fn default_location() -> String {
    "us-central1".to_string()
}

/// Google Cloud project coordinates shared by every Vertex AI call
#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct VertexConfig {
    pub project_id: String,
    #[serde(default = "default_location")]
    pub location: String,
    /// OAuth bearer token, obtained outside of this tool
    #[serde(skip_serializing)]
    pub access_token: String,
}

impl Default for VertexConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            location: default_location(),
            access_token: String::new(),
        }
    }
}

impl VertexConfig {
    pub fn new() -> Self {
        let project_id = env::var("VERTEX_PROJECT_ID").unwrap_or_default();
        let location = env::var("VERTEX_LOCATION").unwrap_or_else(|_| default_location());
        let access_token = env::var("GOOGLE_ACCESS_TOKEN").unwrap_or_default();

        Self {
            project_id,
            location,
            access_token,
        }
    }

    /// Regional API host, e.g. `https://us-central1-aiplatform.googleapis.com`
    pub fn api_host(&self, region: &str) -> String {
        format!("https://{region}-aiplatform.googleapis.com")
    }

    /// `projects/{project}/locations/{location}`
    pub fn parent(&self) -> String {
        format!("projects/{}/locations/{}", self.project_id, self.location)
    }
}
