use std::sync::LazyLock;

use jyut_core::dictionary::DictionaryEntry;
use regex::Regex;

/// Register annotations that mark an entry as formal/written rather than spoken
pub const FORMALITY_MARKERS: [&str; 3] = ["(label:書面語)", "(label:大陸)", "!!!formal"];

static HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+),([^:]+):").expect("valid header regex"));

static SYNONYM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(sim:([^)]+)\)").expect("valid synonym regex"));

static HAN_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{Han}+").expect("valid han regex"));

/// One Words.hk entry as serialized in the corpus:
/// `<id>,<headword>:<jyutping>,"<definition with (label:..), (sim:..), <eg> sections>",...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordsHkEntry {
    pub raw_text: String,
    pub entry_id: Option<String>,
    pub headword: Option<String>,
}

impl WordsHkEntry {
    /// Trim the block once and pull out the `<id>,<headword>:` prefix if present
    pub fn parse(raw: &str) -> Self {
        let raw_text = raw.trim().to_string();

        let (entry_id, headword) = match HEADER.captures(&raw_text) {
            Some(caps) => (Some(caps[1].to_string()), Some(caps[2].to_string())),
            None => (None, None),
        };

        Self {
            raw_text,
            entry_id,
            headword,
        }
    }

    pub fn is_formal(&self) -> bool {
        FORMALITY_MARKERS
            .iter()
            .any(|marker| self.raw_text.contains(marker))
    }

    /// `(sim:...)` synonyms in order of appearance
    pub fn synonyms(&self) -> Vec<String> {
        SYNONYM
            .captures_iter(&self.raw_text)
            .map(|caps| caps[1].to_string())
            .collect()
    }

    /// Han-character runs from the `yue:` lines of `<eg>` example sections
    pub fn example_sentence_words(&self) -> Vec<String> {
        let mut in_example = false;
        let mut words = Vec::new();

        for line in self.raw_text.lines() {
            let line = line.trim();

            if line.starts_with("<eg>") {
                in_example = true;
                continue;
            }
            if line.starts_with("<explanation>") || line.starts_with("----") {
                in_example = false;
                continue;
            }

            if in_example {
                if let Some(sentence) = line.strip_prefix("yue:") {
                    words.extend(HAN_RUN.find_iter(sentence).map(|m| m.as_str().to_string()));
                }
            }
        }

        words
    }

    /// Colloquial substitutes: synonyms first, then example-sentence words
    pub fn alternatives(&self) -> Vec<String> {
        let mut alternatives = self.synonyms();
        alternatives.extend(self.example_sentence_words());
        alternatives
    }
}

impl DictionaryEntry for WordsHkEntry {
    fn id(&self) -> Option<&str> {
        self.entry_id.as_deref()
    }

    fn headword(&self) -> Option<&str> {
        self.headword.as_deref()
    }

    fn raw_text(&self) -> &str {
        &self.raw_text
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    pub const CEOT_LOU: &str = r#"67817,出路:ceot1 lou6,"(pos:名詞)
<explanation>
yue:解決辦法（量詞：個／條）
eng:solution
<eg>
yue:而家市道唔好，我哋要為產品尋求新嘅出路。 (ji4 gaa1 si5 dou6 m4 hou2, ngo5 dei6 jiu3 wai6 caan2 ban2 cam4 kau4 san1 ge3 ceot1 lou6.)
eng:Now since the market is unfavourable, we must find new outlets for our products.",,OK,未公開"#;

    pub const ZING_PING: &str = r#"88550,徵聘:zing1 ping3,"(pos:動詞)(label:書面語)
<explanation>
yue:公開登廣告或者私底下請人做一份工
eng:to give public notice of vacancies to be filled; to invite applications for jobs
<eg>
yue:徵聘啓事
eng:job advertisement",,未經覆核，可能有錯漏 UNREVIEWED ENTRY - MAY CONTAIN ERRORS OR OMISSIONS,未公開"#;

    pub const ZAAK_BEI: &str = r#"87223,責備:zaak3 bei6,"(pos:動詞)(label:書面語)(sim:斥責)(sim:責罵)
<explanation>
yue:做錯嘢俾人鬧
eng:to rebuke; to reprimand; to scold
<eg>
zho:做錯事被老師責備。 (zou6 co3 si6 bei6 lou5 si1 zaak3 bei6.)
yue:做錯嘢畀老師鬧。 (zou6 co3 je5 bei2 lou5 si1 naau6.)
eng:The teacher rebuked me for doing something wrong.",,未經覆核，可能有錯漏 UNREVIEWED ENTRY - MAY CONTAIN ERRORS OR OMISSIONS,未公開"#;
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn parses_id_and_headword() {
        let entry = WordsHkEntry::parse(CEOT_LOU);
        assert_eq!(entry.id(), Some("67817"));
        assert_eq!(entry.headword(), Some("出路"));
    }

    #[test]
    fn text_without_header_has_no_headword() {
        let entry = WordsHkEntry::parse("  出路:ceot1 lou6,\"...\"  ");
        assert_eq!(entry.headword(), None);
        assert_eq!(entry.id(), None);
        assert_eq!(entry.raw_text(), "出路:ceot1 lou6,\"...\"");
        assert!(!entry.is_headword("出路"));
    }

    #[test]
    fn formality_markers() {
        assert!(!WordsHkEntry::parse(CEOT_LOU).is_formal());
        assert!(WordsHkEntry::parse(ZING_PING).is_formal());
        assert!(WordsHkEntry::parse("1,x:y,\"(label:大陸)\"").is_formal());
        assert!(WordsHkEntry::parse("1,x:y,\"!!!formal\"").is_formal());
        assert!(!WordsHkEntry::parse("1,x:y,\"(label:潮語)\"").is_formal());
    }

    #[test]
    fn synonyms_in_order() {
        let entry = WordsHkEntry::parse(ZAAK_BEI);
        assert_eq!(entry.synonyms(), vec!["斥責", "責罵"]);
    }

    #[test]
    fn example_words_skip_explanations_and_mandarin_lines() {
        let entry = WordsHkEntry::parse(ZAAK_BEI);
        assert_eq!(entry.example_sentence_words(), vec!["做錯嘢畀老師鬧"]);
    }

    #[test]
    fn example_words_split_on_punctuation() {
        let entry = WordsHkEntry::parse(CEOT_LOU);
        assert_eq!(
            entry.example_sentence_words(),
            vec!["而家市道唔好", "我哋要為產品尋求新嘅出路"]
        );
    }

    #[test]
    fn alternatives_put_synonyms_first() {
        let entry = WordsHkEntry::parse(ZAAK_BEI);
        assert_eq!(entry.alternatives(), vec!["斥責", "責罵", "做錯嘢畀老師鬧"]);
    }

    #[test]
    fn colloquial_entries_offer_example_words_too() {
        let entry = WordsHkEntry::parse(CEOT_LOU);
        assert!(!entry.is_formal());
        assert_eq!(
            entry.alternatives(),
            vec!["而家市道唔好", "我哋要為產品尋求新嘅出路"]
        );
    }
}
