use std::env;

use serde::{Deserialize, Serialize};

fn default_database() -> String {
    "(default)".to_string()
}

fn default_collection() -> String {
    "vocabulary".to_string()
}

fn default_batch_size() -> usize {
    500
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct StoreConfig {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Firestore rejects commits with more than 500 writes
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            collection: default_collection(),
            batch_size: default_batch_size(),
        }
    }
}

impl StoreConfig {
    pub fn new() -> Self {
        Self {
            database: env::var("FIRESTORE_DATABASE").unwrap_or_else(|_| default_database()),
            collection: env::var("FIRESTORE_COLLECTION").unwrap_or_else(|_| default_collection()),
            batch_size: default_batch_size(),
        }
    }
}
