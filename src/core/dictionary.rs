//! Keyword dictionaries: validation of raw keyword → emoji data and the
//! dictionaries bundled with the crate.
//!
//! A raw dictionary is a JSON object whose values are either a single glyph,
//! a whitespace-separated run of glyphs, or a list of glyphs:
//!
//! ```json
//! { "love": ["❤️", "😍"], "cat": "🐱", "party": "🎉 🥳" }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::index::LanguageIndex;
use super::language::Language;
use crate::error::{LookupError, LookupResult};

/// Dictionaries compiled into the binary.
const BUNDLED: &[(Language, &str)] = &[
    (Language::English, include_str!("../data/english.json")),
    (Language::Russian, include_str!("../data/russian.json")),
    (Language::Spanish, include_str!("../data/spanish.json")),
];

/// One keyword and the glyphs it maps to. Never has an empty glyph list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub keyword: String,
    pub emojis: Vec<String>,
}

impl KeywordEntry {
    fn from_raw(keyword: &str, value: &Value) -> LookupResult<Self> {
        if keyword.trim().is_empty() {
            return Err(LookupError::Format("empty keyword".to_string()));
        }

        let emojis: Vec<String> = match value {
            Value::String(s) => s.split_whitespace().map(str::to_string).collect(),
            Value::Array(items) => {
                let mut emojis = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        // "😀 😃" inside a list is two glyphs, same as the string form
                        Value::String(s) if !s.trim().is_empty() => {
                            emojis.extend(s.split_whitespace().map(str::to_string))
                        }
                        other => {
                            return Err(LookupError::Format(format!(
                                "keyword '{}' has a non-glyph list element: {}",
                                keyword, other
                            )))
                        }
                    }
                }
                emojis
            }
            other => {
                return Err(LookupError::Format(format!(
                    "keyword '{}' maps to {}, expected a string or a list of strings",
                    keyword,
                    value_kind(other)
                )))
            }
        };

        if emojis.is_empty() {
            return Err(LookupError::Format(format!(
                "keyword '{}' has no emoji",
                keyword
            )));
        }

        Ok(Self {
            keyword: keyword.to_string(),
            emojis,
        })
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Validate one language's raw dictionary and build its index.
///
/// Keywords keep their original case and insertion order. Several keywords
/// may point at the same glyph; nothing is collapsed here.
pub fn load(language: Language, raw: &Value) -> LookupResult<LanguageIndex> {
    let map = raw.as_object().ok_or_else(|| {
        LookupError::Format(format!(
            "{} dictionary is {}, expected an object",
            language,
            value_kind(raw)
        ))
    })?;

    let entries = map
        .iter()
        .map(|(keyword, value)| KeywordEntry::from_raw(keyword, value))
        .collect::<LookupResult<Vec<_>>>()?;

    debug!(%language, keywords = entries.len(), "loaded dictionary");
    Ok(LanguageIndex::build(language, entries))
}

/// Parse a serialized `languageId -> dictionary` payload.
///
/// Unknown language identifiers are skipped. Any malformed dictionary fails
/// the whole payload.
pub fn load_payload(payload: &str) -> LookupResult<Vec<LanguageIndex>> {
    let value: Value = serde_json::from_str(payload)
        .map_err(|e| LookupError::Format(format!("payload is not valid JSON: {}", e)))?;

    let languages = value.as_object().ok_or_else(|| {
        LookupError::Format(format!(
            "payload is {}, expected an object keyed by language",
            value_kind(&value)
        ))
    })?;

    let mut indexes = Vec::with_capacity(languages.len());
    for (id, raw) in languages {
        match id.parse::<Language>() {
            Ok(language) => indexes.push(load(language, raw)?),
            Err(_) => warn!(language = %id, "skipping dictionary for unsupported language"),
        }
    }
    Ok(indexes)
}

/// Build an initialization payload from the bundled dictionaries.
pub fn bundled_payload(languages: &[Language]) -> LookupResult<String> {
    let mut payload = Map::new();
    for language in languages {
        let Some((_, raw)) = BUNDLED.iter().find(|(l, _)| l == language) else {
            continue;
        };
        let dictionary: Value = serde_json::from_str(raw)
            .map_err(|e| LookupError::Format(format!("bundled {} dictionary: {}", language, e)))?;
        payload.insert(language.id().to_string(), dictionary);
    }
    Ok(Value::Object(payload).to_string())
}
