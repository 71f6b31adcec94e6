use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use jyut_lang_cantonese::SentencePair;
use jyut_lang_cantonese::vocab::{format_tsv_line, read_word_list};
use jyut_store::FirestoreClient;
use jyut_types::SinkKind;

use crate::state::AppState;

/// Destination for generated sentence pairs
pub enum Sink {
    Tsv(BufWriter<File>),
    Firestore {
        client: FirestoreClient,
        collection: String,
    },
    /// Print only
    Stdout,
}

impl Sink {
    pub fn open(state: &AppState, kind: SinkKind, output: Option<&Path>) -> anyhow::Result<Self> {
        match (kind, output) {
            (SinkKind::Tsv, Some(path)) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                Ok(Sink::Tsv(BufWriter::new(file)))
            }
            (SinkKind::Tsv, None) => Ok(Sink::Stdout),
            (SinkKind::Firestore, _) => Ok(Sink::Firestore {
                client: state.firestore(),
                collection: state.config.store.collection.clone(),
            }),
        }
    }

    pub async fn write(&mut self, pair: &SentencePair) -> anyhow::Result<()> {
        match self {
            Sink::Tsv(writer) => {
                writer.write_all(format_tsv_line(pair).as_bytes())?;
                writer.flush()?;
            }
            Sink::Firestore { client, collection } => {
                let name = jyut_store::save_record(client, collection, &pair.to_record()).await?;
                tracing::debug!("Stored {}", name);
            }
            Sink::Stdout => {
                print!("{}", format_tsv_line(pair));
            }
        }
        Ok(())
    }
}

pub async fn handle_generate(
    state: Arc<AppState>,
    input: &Path,
    output: Option<&Path>,
    sink: SinkKind,
) -> anyhow::Result<()> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let words = read_word_list(&text);
    tracing::info!("Loaded {} vocabulary words", words.len());

    let pipeline = state.pipeline().await?;
    let mut sink = Sink::open(&state, sink, output)?;

    let mut generated = 0;
    for word in &words {
        match pipeline.generate(word).await {
            Ok(pair) => {
                sink.write(&pair).await?;
                generated += 1;
                tracing::info!("Generated sentences for '{}'", word);
            }
            Err(e) => tracing::warn!("Failed to generate sentences for '{}': {}", word, e),
        }
    }

    tracing::info!(
        "Processing complete. {} of {} words generated",
        generated,
        words.len()
    );
    Ok(())
}

/// One word, printed as JSON and optionally stored
pub async fn handle_word(state: Arc<AppState>, word: &str, store: bool) -> anyhow::Result<()> {
    let pipeline = state.pipeline().await?;
    let pair = pipeline.generate(word).await?;

    if store {
        let mut sink = Sink::open(&state, SinkKind::Firestore, None)?;
        sink.write(&pair).await?;
    }

    println!("{}", serde_json::to_string_pretty(&pair.to_record())?);
    Ok(())
}
