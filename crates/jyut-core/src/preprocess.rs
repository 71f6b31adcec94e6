use unicode_normalization::UnicodeNormalization;

pub trait Preprocessor {
    /// Default vocabulary-word cleanup
    fn process(&self, text: &str) -> String {
        let text = text.trim_start_matches('\u{feff}').trim();

        if text.is_empty() {
            return String::new();
        }

        // NFC only: NFKC would fold CJK compatibility ideographs
        let text: String = text.nfc().collect();

        text.replace(['\n', '\r'], "").trim().to_string()
    }
}

pub struct DefaultPreprocessor;
impl Preprocessor for DefaultPreprocessor {}
