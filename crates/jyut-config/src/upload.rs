use std::env;

use serde::{Deserialize, Serialize};

fn default_workers() -> usize {
    4
}

fn default_max_retries() -> u32 {
    5
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    60_000
}

fn default_flush_every() -> usize {
    10
}

fn default_progress_file() -> String {
    "upload_progress.json".to_string()
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct UploadConfig {
    /// Concurrent upload tasks
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Write the progress file after this many completed uploads
    #[serde(default = "default_flush_every")]
    pub flush_every: usize,
    #[serde(default = "default_progress_file")]
    pub progress_file: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            flush_every: default_flush_every(),
            progress_file: default_progress_file(),
        }
    }
}

impl UploadConfig {
    pub fn new() -> Self {
        let workers = env::var("UPLOAD_WORKERS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or_else(default_workers);

        let progress_file =
            env::var("UPLOAD_PROGRESS_FILE").unwrap_or_else(|_| default_progress_file());

        Self {
            workers,
            progress_file,
            ..Self::default()
        }
    }
}
