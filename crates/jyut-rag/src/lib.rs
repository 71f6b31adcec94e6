mod backoff;
mod client;
mod progress;

pub use backoff::Backoff;
pub use client::{Corpus, CorpusRetriever, RagClient, RagFile};
pub use progress::UploadProgress;

#[derive(Debug, thiserror::Error)]
pub enum RagError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("API error: HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Authentication error")]
    Authentication,

    #[error("No corpus found{}", display_name_suffix(.0))]
    NoCorpus(Option<String>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn display_name_suffix(name: &Option<String>) -> String {
    name.as_ref()
        .map(|n| format!(" with display name '{n}'"))
        .unwrap_or_default()
}

impl RagError {
    /// Rate limits and server-side failures are worth another attempt
    pub fn is_retryable(&self) -> bool {
        match self {
            RagError::RateLimited => true,
            RagError::Api { status, .. } => *status >= 500,
            RagError::Network(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_errors() {
        assert!(RagError::RateLimited.is_retryable());
        assert!(RagError::Api { status: 503, message: String::new() }.is_retryable());
        assert!(!RagError::Api { status: 400, message: String::new() }.is_retryable());
        assert!(!RagError::Authentication.is_retryable());
    }

    #[test]
    fn no_corpus_message_names_display_name() {
        assert_eq!(
            RagError::NoCorpus(Some("wordshk".into())).to_string(),
            "No corpus found with display name 'wordshk'"
        );
        assert_eq!(RagError::NoCorpus(None).to_string(), "No corpus found");
    }
}
