use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use jyut_lang_cantonese::vocab::{clean_input_lines, parse_anki_export};

use crate::state::AppState;

/// Replace the vocabulary collection with the contents of an Anki export
pub async fn handle_import_vocab(state: Arc<AppState>, input: &Path) -> anyhow::Result<()> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let records = parse_anki_export(&text);
    tracing::info!("Parsed {} entries from {}", records.len(), input.display());

    let store = &state.config.store;
    let client = state.firestore();
    let uploaded =
        jyut_store::replace_collection(&client, &store.collection, &records, store.batch_size)
            .await?;
    tracing::info!("Successfully uploaded {} entries to Firestore", uploaded);
    Ok(())
}

pub async fn handle_add_timestamps(state: Arc<AppState>) -> anyhow::Result<()> {
    let store = &state.config.store;
    let client = state.firestore();
    let updated = jyut_store::add_timestamps(&client, &store.collection, store.batch_size).await?;
    tracing::info!("Successfully added timestamps to {} documents", updated);
    Ok(())
}

/// Rewrite `input` in place, keeping only the word column
pub fn handle_clean_input(input: &Path) -> anyhow::Result<()> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let cleaned = clean_input_lines(&text);
    fs::write(input, &cleaned)?;

    tracing::info!("Cleaned {} lines in {}", cleaned.lines().count(), input.display());
    Ok(())
}
