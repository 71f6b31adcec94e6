use std::sync::Arc;

use jyut_config::llm::LlmConfig;
use jyut_core::dictionary::Retriever;
use jyut_llm::{GenerationRequest, TextGenerator};
use jyut_types::VocabRecord;

use crate::matcher::{MatchResult, find_best_entry};
use crate::prompt::{self, CantonesePromptContext};

/// Both sentences for one vocabulary word
#[derive(Debug, Clone, PartialEq)]
pub struct SentencePair {
    pub simplified: String,
    pub traditional: String,
    pub mandarin: String,
    pub cantonese: String,
    /// The dictionary entry that shaped the Cantonese prompt
    pub entry: MatchResult,
}

impl SentencePair {
    pub fn to_record(&self) -> VocabRecord {
        VocabRecord {
            simplified: self.simplified.clone(),
            mandarin: self.mandarin.clone(),
            cantonese: self.cantonese.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Empty vocabulary word")]
    EmptyWord,

    #[error("Failed to generate a Mandarin sentence for '{0}'")]
    NoMandarin(String),

    #[error("Failed to generate a Cantonese sentence for '{0}'")]
    NoCantonese(String),
}

/// Gemini for conversion, Mandarin and definitions; Claude for Cantonese;
/// the corpus for dictionary context.
pub struct SentencePipeline {
    gemini: Arc<dyn TextGenerator>,
    claude: Arc<dyn TextGenerator>,
    retriever: Arc<dyn Retriever>,
    llm: LlmConfig,
}

impl SentencePipeline {
    pub fn new(
        gemini: Arc<dyn TextGenerator>,
        claude: Arc<dyn TextGenerator>,
        retriever: Arc<dyn Retriever>,
        llm: LlmConfig,
    ) -> Self {
        Self {
            gemini,
            claude,
            retriever,
            llm,
        }
    }

    /// Traditional-script form of `word`; the input itself if conversion fails
    pub async fn to_traditional(&self, word: &str) -> String {
        let request = GenerationRequest::new(prompt::traditional_conversion(word))
            .with_settings(&self.llm.generation);

        match self.gemini.generate(&request).await {
            Ok(generation) => generation.text,
            Err(e) => {
                tracing::error!("Error converting to Traditional Chinese: {}", e);
                word.to_string()
            }
        }
    }

    pub async fn mandarin_sentence(&self, word: &str) -> Option<String> {
        let request = GenerationRequest::new(prompt::mandarin_sentence(word))
            .with_system(prompt::MANDARIN_SYSTEM)
            .with_settings(&self.llm.generation);

        self.gemini
            .generate(&request)
            .await
            .map(|g| g.text)
            .inspect_err(|e| tracing::error!("Error generating Mandarin sentence: {}", e))
            .ok()
    }

    /// One-sentence Mandarin definition, used when the dictionary can't be trusted alone
    pub async fn mandarin_meaning(&self, word: &str) -> Option<String> {
        let request = GenerationRequest::new(prompt::mandarin_meaning(word))
            .with_temperature(self.llm.meaning_temperature);

        self.gemini
            .generate(&request)
            .await
            .map(|g| g.text)
            .inspect_err(|e| tracing::error!("Error getting Mandarin meaning: {}", e))
            .ok()
    }

    /// Retrieve candidates for the Traditional form and pick the best entry.
    /// Retrieval failures count as "nothing retrieved".
    pub async fn lookup(&self, traditional: &str) -> MatchResult {
        let candidates: Vec<String> = match self.retriever.retrieve(traditional).await {
            Ok(contexts) => contexts.into_iter().map(|c| c.text).collect(),
            Err(e) => {
                tracing::error!("Error performing retrieval: {}", e);
                Vec::new()
            }
        };

        tracing::debug!("Retrieved {} candidates for '{}'", candidates.len(), traditional);
        find_best_entry(&candidates, traditional)
    }

    pub async fn cantonese_sentence(&self, traditional: &str, entry: &MatchResult) -> Option<String> {
        let meaning = if entry.needs_meaning() {
            self.mandarin_meaning(traditional).await
        } else {
            None
        };

        let system = CantonesePromptContext::new(entry, meaning.as_deref()).system_instruction();
        let request = GenerationRequest::new(prompt::cantonese_sentence(traditional))
            .with_system(system)
            .with_temperature(self.llm.cantonese_temperature)
            .with_max_output_tokens(self.llm.cantonese_max_tokens);

        self.claude
            .generate(&request)
            .await
            .map(|g| g.text)
            .inspect_err(|e| tracing::error!("Error generating Cantonese sentence: {}", e))
            .ok()
    }

    /// Full run for one Simplified-script word
    pub async fn generate(&self, word: &str) -> Result<SentencePair, PipelineError> {
        let word = word.trim();
        if word.is_empty() {
            return Err(PipelineError::EmptyWord);
        }

        let traditional = self.to_traditional(word).await;
        tracing::info!("Processing: '{}' ({})", word, traditional);

        let mandarin = self.mandarin_sentence(word).await;

        let entry = self.lookup(&traditional).await;
        tracing::info!(
            exact = entry.is_exact_match,
            formal = entry.is_formal,
            alternatives = entry.alternatives.len(),
            "Dictionary entry for '{}'",
            traditional
        );

        let cantonese = self.cantonese_sentence(&traditional, &entry).await;

        let mandarin = mandarin.ok_or_else(|| PipelineError::NoMandarin(word.to_string()))?;
        let cantonese = cantonese.ok_or_else(|| PipelineError::NoCantonese(word.to_string()))?;

        Ok(SentencePair {
            simplified: word.to_string(),
            traditional,
            mandarin,
            cantonese,
            entry,
        })
    }
}
