/// Similarity search over the dictionary corpus
#[async_trait::async_trait]
pub trait Retriever: Send + Sync {
    /// Ranked contexts for `query`, most relevant first. May be empty.
    async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedContext>, RetrieveError>;
}

/// Individual dictionary entry as serialized in the corpus
pub trait DictionaryEntry: Send + Sync {
    /// Leading numeric entry ID, if the text carries one
    fn id(&self) -> Option<&str>;

    /// Headword before the first colon, if the text is well formed
    fn headword(&self) -> Option<&str>;

    /// The full serialized entry
    fn raw_text(&self) -> &str;

    /// Whether this entry is filed under `word`
    fn is_headword(&self, word: &str) -> bool {
        self.headword() == Some(word)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetrievedContext {
    pub text: String,
    pub source_uri: Option<String>,
    pub distance: Option<f64>,
}

impl RetrievedContext {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RetrieveError {
    #[error("No corpus available: {0}")]
    NoCorpus(String),

    #[error("Retrieval backend error: {0}")]
    Backend(String),
}
