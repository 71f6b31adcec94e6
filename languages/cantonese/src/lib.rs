pub mod entry;
pub mod loader;
pub mod matcher;
pub mod pipeline;
pub mod prompt;
pub mod vocab;

pub use entry::WordsHkEntry;
pub use loader::{DictionarySplitter, SplitError, SplitSummary};
pub use matcher::{MatchResult, find_best_entry};
pub use pipeline::{PipelineError, SentencePair, SentencePipeline};
pub use prompt::CantonesePromptContext;
