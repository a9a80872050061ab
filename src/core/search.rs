//! Search engine for emoji lookup - dictionary-backed keyword search.
//!
//! The engine owns one [`LanguageIndex`] per loaded language. It is built
//! empty, filled by [`EmojiSearchEngine::initialize`], and queried per
//! keystroke. Queries never fail: unknown languages and bad input produce an
//! empty result.
//!
//! The `*_json` methods are the serialized boundary used by embedders that
//! exchange strings rather than Rust types:
//!
//! ```text
//! initialize('{"english": {"love": ["❤️", "😍"]}}')
//! search_json("lov", "english")          -> [["love",["❤️","😍"]]]
//! search_multiple_json("lov", '["english"]')
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::dictionary;
use super::index::LanguageIndex;
use super::language::Language;
use crate::error::{LookupError, LookupResult};

/// A keyword hit and all glyphs listed under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, Vec<String>)", into = "(String, Vec<String>)")]
pub struct KeywordMatch {
    pub keyword: String,
    pub emojis: Vec<String>,
}

impl From<(String, Vec<String>)> for KeywordMatch {
    fn from((keyword, emojis): (String, Vec<String>)) -> Self {
        Self { keyword, emojis }
    }
}

impl From<KeywordMatch> for (String, Vec<String>) {
    fn from(m: KeywordMatch) -> Self {
        (m.keyword, m.emojis)
    }
}

/// Decode the serialized output of [`EmojiSearchEngine::search_json`].
pub fn decode_matches(json: &str) -> LookupResult<Vec<KeywordMatch>> {
    serde_json::from_str(json)
        .map_err(|e| LookupError::Query(format!("undecodable engine output: {}", e)))
}

fn encode_matches(matches: &[KeywordMatch]) -> String {
    serde_json::to_string(matches).unwrap_or_else(|_| "[]".to_string())
}

/// The engine behind every emoji query.
#[derive(Debug, Default)]
pub struct EmojiSearchEngine {
    indexes: Vec<LanguageIndex>,
}

impl EmojiSearchEngine {
    /// Create an engine with no languages loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every loaded language with the dictionaries in `payload`.
    ///
    /// The payload is fully validated before anything is swapped in; on
    /// error the previously loaded languages stay untouched.
    pub fn initialize(&mut self, payload: &str) -> LookupResult<()> {
        let indexes = dictionary::load_payload(payload)?;
        let keywords: usize = indexes.iter().map(LanguageIndex::len).sum();
        info!(
            languages = indexes.len(),
            keywords, "emoji search engine initialized"
        );
        self.indexes = indexes;
        Ok(())
    }

    /// Languages currently loaded, in payload order.
    pub fn languages(&self) -> Vec<Language> {
        self.indexes.iter().map(LanguageIndex::language).collect()
    }

    pub fn index(&self, language: Language) -> Option<&LanguageIndex> {
        self.indexes.iter().find(|i| i.language() == language)
    }

    /// Search one language. Returns nothing if the language is not loaded.
    pub fn search(&self, query: &str, language: Language) -> Vec<KeywordMatch> {
        let Some(index) = self.index(language) else {
            debug!(%language, "search in unloaded language");
            return Vec::new();
        };

        index
            .find(query)
            .into_iter()
            .map(|entry| KeywordMatch {
                keyword: entry.keyword.clone(),
                emojis: entry.emojis.clone(),
            })
            .collect()
    }

    /// Search each language in turn and concatenate the results in request
    /// order. Duplicates across languages are kept.
    pub fn search_multiple(&self, query: &str, languages: &[Language]) -> Vec<KeywordMatch> {
        languages
            .iter()
            .flat_map(|language| self.search(query, *language))
            .collect()
    }

    /// Serialized single-language search. Unknown identifiers yield `[]`.
    pub fn search_json(&self, query: &str, language_id: &str) -> String {
        match language_id.parse::<Language>() {
            Ok(language) => encode_matches(&self.search(query, language)),
            Err(e) => {
                debug!("search failed closed: {}", e);
                "[]".to_string()
            }
        }
    }

    /// Serialized multi-language search. `language_ids` is a JSON list of
    /// identifiers; unknown entries are skipped, a malformed list yields `[]`.
    pub fn search_multiple_json(&self, query: &str, language_ids: &str) -> String {
        let ids: Vec<String> = match serde_json::from_str(language_ids) {
            Ok(ids) => ids,
            Err(e) => {
                debug!("malformed language list {:?}: {}", language_ids, e);
                return "[]".to_string();
            }
        };

        let languages: Vec<Language> = ids.iter().filter_map(|id| id.parse().ok()).collect();
        encode_matches(&self.search_multiple(query, &languages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "english": {"love": ["❤️", "😍"], "cat": "🐱", "heart": "❤️"},
        "russian": {"любовь": ["❤️"], "кот": "🐱"},
        "spanish": {"amor": "❤️", "gato": "🐱"}
    }"#;

    fn engine() -> EmojiSearchEngine {
        let mut engine = EmojiSearchEngine::new();
        engine.initialize(PAYLOAD).unwrap();
        engine
    }

    #[test]
    fn test_love_scenario() {
        let engine = engine();
        let results = engine.search("love", Language::English);
        assert_eq!(
            results,
            vec![KeywordMatch {
                keyword: "love".into(),
                emojis: vec!["❤️".into(), "😍".into()],
            }]
        );
    }

    #[test]
    fn test_empty_query() {
        let engine = engine();
        for language in Language::ALL {
            assert!(engine.search("", language).is_empty());
        }
    }

    #[test]
    fn test_unloaded_language_is_empty() {
        let mut engine = EmojiSearchEngine::new();
        engine.initialize(r#"{"english": {"cat": "🐱"}}"#).unwrap();
        assert!(engine.search("cat", Language::Russian).is_empty());
        assert_eq!(engine.search_json("cat", "klingon"), "[]");
    }

    #[test]
    fn test_search_multiple_concatenates_in_request_order() {
        let engine = engine();
        let results = engine.search_multiple("a", &[Language::Spanish, Language::English]);
        let keywords: Vec<&str> = results.iter().map(|m| m.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["amor", "gato", "cat", "heart"]);
    }

    #[test]
    fn test_initialize_replaces_state() {
        let mut engine = engine();
        engine.initialize(r#"{"spanish": {"perro": "🐶"}}"#).unwrap();
        assert_eq!(engine.languages(), vec![Language::Spanish]);
        assert!(engine.search("love", Language::English).is_empty());
    }

    #[test]
    fn test_initialize_failure_keeps_previous_state() {
        let mut engine = engine();
        let err = engine
            .initialize(r#"{"english": {"cat": 5}}"#)
            .unwrap_err();
        assert!(matches!(err, LookupError::Format(_)));
        assert_eq!(engine.search("cat", Language::English).len(), 1);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let mut a = EmojiSearchEngine::new();
        a.initialize(PAYLOAD).unwrap();
        let first = a.search_multiple("o", &Language::ALL);
        a.initialize(PAYLOAD).unwrap();
        assert_eq!(a.search_multiple("o", &Language::ALL), first);
    }

    #[test]
    fn test_json_boundary() {
        let engine = engine();
        let json = engine.search_json("lov", "english");
        assert_eq!(json, r#"[["love",["❤️","😍"]]]"#);
        let decoded = decode_matches(&json).unwrap();
        assert_eq!(decoded[0].keyword, "love");

        let multi = engine.search_multiple_json("кот", r#"["russian", "klingon"]"#);
        assert_eq!(multi, r#"[["кот",["🐱"]]]"#);
        assert_eq!(engine.search_multiple_json("кот", "not json"), "[]");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_matches(r#"{"love": 1}"#),
            Err(LookupError::Query(_))
        ));
    }
}
