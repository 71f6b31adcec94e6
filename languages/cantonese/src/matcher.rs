use jyut_core::dictionary::DictionaryEntry;

use crate::entry::WordsHkEntry;

/// How a retrieved entry should shape the Cantonese prompt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    /// Chosen entry text, empty when nothing was retrieved
    pub matched_text: String,
    pub is_exact_match: bool,
    pub is_formal: bool,
    /// Substitutes in priority order, synonyms first
    pub alternatives: Vec<String>,
}

impl MatchResult {
    fn from_entry(entry: WordsHkEntry, is_exact_match: bool) -> Self {
        Self {
            is_formal: entry.is_formal(),
            alternatives: entry.alternatives(),
            matched_text: entry.raw_text,
            is_exact_match,
        }
    }

    /// A fallback or formal entry can't be trusted for meaning on its own
    pub fn needs_meaning(&self) -> bool {
        !self.is_exact_match || self.is_formal
    }
}

/// Pick the entry for `queried_word` from ranked `candidates`.
///
/// The first candidate whose headword equals `queried_word` exactly wins.
/// Without one, the top-ranked candidate is used anyway as a best guess,
/// flagged `is_exact_match = false`. Never fails: no candidates yields the
/// empty [`MatchResult`].
pub fn find_best_entry<S: AsRef<str>>(candidates: &[S], queried_word: &str) -> MatchResult {
    let Some(first) = candidates.first() else {
        return MatchResult::default();
    };

    let exact = candidates
        .iter()
        .map(|candidate| WordsHkEntry::parse(candidate.as_ref()))
        .find(|entry| entry.is_headword(queried_word));

    match exact {
        Some(entry) => {
            tracing::debug!(
                "Exact entry {} for '{}'",
                entry.id().unwrap_or("?"),
                queried_word
            );
            MatchResult::from_entry(entry, true)
        }
        None => {
            tracing::debug!("No exact entry for '{}', using top result", queried_word);
            MatchResult::from_entry(WordsHkEntry::parse(first.as_ref()), false)
        }
    }
}
