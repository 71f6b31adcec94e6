use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use jyut_config::Config;
use jyut_lang_cantonese::SentencePipeline;
use jyut_llm::{ClaudeVertexClient, GeminiClient};
use jyut_rag::{CorpusRetriever, RagClient};
use jyut_store::FirestoreClient;

/// Settings fixed for the whole run plus the shared HTTP client
pub struct AppState {
    pub config: Config,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { config, http })
    }

    pub fn rag_client(&self) -> RagClient {
        RagClient::new(self.http.clone(), self.config.vertex.clone())
    }

    /// Resolve the corpus named in config (or the first one) to its resource name
    pub async fn corpus(&self) -> anyhow::Result<String> {
        let corpus = self
            .rag_client()
            .resolve_corpus(&self.config.retrieval.corpus_display_name)
            .await
            .context("Unable to proceed without a valid RAG corpus")?;

        tracing::info!("Using RAG corpus: {}", corpus);
        Ok(corpus)
    }

    pub async fn pipeline(&self) -> anyhow::Result<SentencePipeline> {
        let corpus = self.corpus().await?;
        let config = &self.config;

        let gemini = GeminiClient::new(
            self.http.clone(),
            config.vertex.clone(),
            config.llm.gemini_model.clone(),
        );
        let claude = ClaudeVertexClient::new(
            self.http.clone(),
            config.vertex.clone(),
            config.llm.claude_region.clone(),
            config.llm.claude_model.clone(),
        );
        let retriever =
            CorpusRetriever::new(self.rag_client(), corpus, config.retrieval.clone());

        Ok(SentencePipeline::new(
            Arc::new(gemini),
            Arc::new(claude),
            Arc::new(retriever),
            config.llm.clone(),
        ))
    }

    pub fn firestore(&self) -> FirestoreClient {
        FirestoreClient::new(self.http.clone(), &self.config.vertex, &self.config.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clients_are_built_from_the_run_config() {
        let mut config = Config::default();
        config.vertex.project_id = "demo".to_string();
        config.store.database = "vocab-db".to_string();

        let state = AppState::new(config).unwrap();

        assert_eq!(state.config.vertex.project_id, "demo");
        assert_eq!(
            state.firestore().documents_root(),
            "projects/demo/databases/vocab-db/documents"
        );
    }
}
