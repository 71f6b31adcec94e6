use crate::matcher::MatchResult;

/// Used when a formal entry lists no substitutes of its own
const GENERIC_ALTERNATIVES: &str = "common spoken Cantonese expressions";

pub fn traditional_conversion(simplified: &str) -> String {
    format!(
        "Convert the following Simplified Chinese text to Traditional Chinese:\n\
         {simplified}\n\n\
         Output only the converted Traditional Chinese text, without any additional explanation or formatting."
    )
}

pub const MANDARIN_SYSTEM: &str = "\
You are a helpful and knowledgeable Mandarin language tutor specializing in vocabulary from the HSK exam. \
For each input word in Simplified Chinese, output one sentence in Simplified Chinese that demonstrates \
the usage of the word within a clear and meaningful context. Avoid overly simplistic sentences that \
don't showcase the word's meaning effectively.

Input: [Simplified Chinese vocabulary word]
Output: [Simplified Chinese sentence]

Do not repeat the prompt input in your response.
You must use the vocabulary word given, no replacements.";

pub fn mandarin_sentence(word: &str) -> String {
    format!("Input: {word}")
}

pub fn mandarin_meaning(word: &str) -> String {
    format!(
        "What is the core meaning of the word '{word}' in Mandarin? Give a brief 1-sentence definition."
    )
}

pub fn cantonese_sentence(word: &str) -> String {
    format!("Input: {word}\nGenerate ONLY a single Cantonese sentence.")
}

/// Everything the Cantonese system prompt is built from
#[derive(Debug, Clone, Copy)]
pub struct CantonesePromptContext<'a> {
    pub entry: &'a MatchResult,
    pub mandarin_meaning: Option<&'a str>,
}

impl<'a> CantonesePromptContext<'a> {
    pub fn new(entry: &'a MatchResult, mandarin_meaning: Option<&'a str>) -> Self {
        Self {
            entry,
            mandarin_meaning: mandarin_meaning.filter(|m| !m.is_empty()),
        }
    }

    pub fn entry_type(&self) -> &'static str {
        if self.entry.is_exact_match {
            "Exact match"
        } else {
            "No exact match"
        }
    }

    pub fn formality(&self) -> &'static str {
        if self.entry.is_formal {
            "Formal/Written"
        } else {
            "Colloquial"
        }
    }

    /// Comma-separated substitutes, or a generic instruction when there are none
    pub fn alternatives(&self) -> String {
        if self.entry.alternatives.is_empty() {
            GENERIC_ALTERNATIVES.to_string()
        } else {
            self.entry.alternatives.join(", ")
        }
    }

    pub fn system_instruction(&self) -> String {
        let meaning = self
            .mandarin_meaning
            .map(|m| format!("Mandarin Definition: {m}\n"))
            .unwrap_or_default();

        format!(
            "You are a natural Cantonese language generator specializing in authentic Hong Kong Cantonese usage. \
Your task is to generate sentences that preserve the essential meaning and typical usage context of Mandarin words.

Entry Type: {entry_type}
Entry Formality: {formality}
{meaning}
Process for Sentence Generation:
1. For formal/written entries (marked as 書面語, 大陸, or !!!formal):
- DO NOT use the formal word in your sentence
- Instead use these colloquial alternatives: {alternatives}
- Focus on natural spoken Cantonese that expresses the same meaning

2. For colloquial entries:
- Use the Words.HK entry as your guide
- Ensure the usage matches typical Hong Kong speech

Guidelines:
- Focus on how Hong Kong Cantonese speakers would express the same idea in daily life
- Keep the same level of formality and social context as the Mandarin usage
- Ensure the sentence reflects a situation where this meaning would naturally occur

Retrieved Dictionary Entry:
{entry}

IMPORTANT: Output ONLY the Cantonese sentence with NO additional text - no jyutping, no translation, no explanation.",
            entry_type = self.entry_type(),
            formality = self.formality(),
            alternatives = self.alternatives(),
            entry = self.entry.matched_text,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formal_entry() -> MatchResult {
        MatchResult {
            matched_text: "87223,責備:zaak3 bei6,\"(label:書面語)(sim:斥責)(sim:責罵)\"".to_string(),
            is_exact_match: true,
            is_formal: true,
            alternatives: vec!["斥責".to_string(), "責罵".to_string()],
        }
    }

    #[test]
    fn formal_entry_lists_alternatives_in_order() {
        let entry = formal_entry();
        let prompt = CantonesePromptContext::new(&entry, None).system_instruction();

        assert!(prompt.contains("Entry Type: Exact match"));
        assert!(prompt.contains("Entry Formality: Formal/Written"));
        assert!(prompt.contains("colloquial alternatives: 斥責, 責罵"));
        assert!(prompt.contains(&entry.matched_text));
        assert!(!prompt.contains("Mandarin Definition"));
    }

    #[test]
    fn fallback_entry_is_labelled_but_still_shown() {
        let entry = MatchResult {
            is_exact_match: false,
            alternatives: vec![],
            ..formal_entry()
        };
        let prompt =
            CantonesePromptContext::new(&entry, Some("责备是指批评指责。")).system_instruction();

        assert!(prompt.contains("Entry Type: No exact match"));
        assert!(prompt.contains("Mandarin Definition: 责备是指批评指责。"));
        assert!(prompt.contains(GENERIC_ALTERNATIVES));
        assert!(prompt.contains(&entry.matched_text));
    }

    #[test]
    fn empty_meaning_is_dropped() {
        let entry = MatchResult::default();
        let context = CantonesePromptContext::new(&entry, Some(""));
        assert!(context.mandarin_meaning.is_none());
        assert_eq!(context.formality(), "Colloquial");
    }

    #[test]
    fn user_prompts_carry_the_word() {
        assert!(traditional_conversion("应聘").contains("应聘"));
        assert_eq!(mandarin_sentence("出路"), "Input: 出路");
        assert!(mandarin_meaning("應聘").contains("'應聘'"));
        assert!(cantonese_sentence("應聘").starts_with("Input: 應聘\n"));
    }
}
