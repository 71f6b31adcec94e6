use jyut_core::preprocess::{DefaultPreprocessor, Preprocessor};
use jyut_types::VocabRecord;

use crate::pipeline::SentencePair;

/// Separates the Mandarin and Cantonese sentences inside one Anki field
pub const SENTENCE_SEPARATOR: &str = "<br><br>";

/// Anki export files start with two `#` configuration lines
const ANKI_HEADER_LINES: usize = 2;

/// `simplified \t mandarin<br><br>cantonese \n`, ready for Anki import
pub fn format_tsv_line(pair: &SentencePair) -> String {
    format!(
        "{}\t{}{}{}\n",
        pair.simplified, pair.mandarin, SENTENCE_SEPARATOR, pair.cantonese
    )
}

/// Vocabulary words, one per line; blank lines dropped
pub fn read_word_list(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| DefaultPreprocessor.process(line))
        .filter(|word| !word.is_empty())
        .collect()
}

/// Keep only the word column of each non-blank line, re-emitted as `word\t\n`
pub fn clean_input_lines(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let word = line.split('\t').next().unwrap_or_default();
            format!("{word}\t\n")
        })
        .collect()
}

/// Parse an Anki notes export back into records.
///
/// A line with a tab starts a record; lines without one continue the previous
/// record's sentences.
pub fn parse_anki_export(text: &str) -> Vec<VocabRecord> {
    let mut records = Vec::new();
    let mut current: Option<VocabRecord> = None;

    for line in text.lines().skip(ANKI_HEADER_LINES) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some((simplified, sentences)) = line.split_once('\t') {
            if let Some(record) = current.take() {
                records.push(record);
            }

            let (mandarin, cantonese) = sentences
                .split_once(SENTENCE_SEPARATOR)
                .unwrap_or((sentences, ""));
            current = Some(VocabRecord {
                simplified: simplified.to_string(),
                mandarin: mandarin.to_string(),
                cantonese: cantonese.to_string(),
            });
            continue;
        }

        let Some(record) = current.as_mut() else {
            tracing::debug!("Dropping line before first record: {}", line);
            continue;
        };

        if let Some((mandarin, cantonese)) = line.split_once(SENTENCE_SEPARATOR) {
            append_line(&mut record.mandarin, mandarin);
            append_line(&mut record.cantonese, cantonese);
        } else if !record.cantonese.is_empty() {
            append_line(&mut record.cantonese, line);
        } else {
            append_line(&mut record.mandarin, line);
        }
    }

    records.extend(current);
    records
}

fn append_line(field: &mut String, line: &str) {
    field.push('\n');
    field.push_str(line);
}
