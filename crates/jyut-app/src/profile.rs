use std::fs;
use std::path::Path;

use anyhow::Context;
use jyut_config::Config;

/// Config from the environment, with a JSON profile layered on top when given
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = Config::new();
    let Some(path) = path else {
        return Ok(config);
    };

    tracing::info!("Loading config profile: {}", path.display());
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;

    config
        .with_profile(&json)
        .with_context(|| format!("Invalid config {}", path.display()))
}

/// Fail early on settings every cloud command needs
pub fn require_cloud(config: &Config) -> anyhow::Result<()> {
    if config.vertex.project_id.is_empty() {
        anyhow::bail!("VERTEX_PROJECT_ID is not set");
    }
    if config.vertex.access_token.is_empty() {
        anyhow::bail!("GOOGLE_ACCESS_TOKEN is not set");
    }
    Ok(())
}
