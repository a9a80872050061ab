//! Supported dictionary languages and script-based language selection.
//!
//! The selector looks at the characters of a query and narrows the user's
//! chosen languages to the ones whose dictionaries could plausibly match:
//!
//! ```text
//! any Cyrillic char          -> russian only
//! any Spanish diacritic      -> spanish only
//! otherwise (Latin default)  -> everything except russian
//! nothing left               -> the full chosen set, unfiltered
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LookupError;

/// Characters that only show up in Spanish text among the bundled languages.
const SPANISH_MARKERS: &[char] = &['ñ', 'á', 'é', 'í', 'ó', 'ú', 'ü', '¿', '¡'];

/// A dictionary language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Russian,
    Spanish,
}

impl Language {
    /// Every supported language, in declaration order.
    pub const ALL: [Language; 3] = [Language::English, Language::Russian, Language::Spanish];

    /// The identifier used in payloads and settings.
    pub fn id(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Russian => "russian",
            Language::Spanish => "spanish",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Language {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "english" => Ok(Language::English),
            "russian" => Ok(Language::Russian),
            "spanish" => Ok(Language::Spanish),
            other => Err(LookupError::Query(format!("unknown language '{}'", other))),
        }
    }
}

/// Whether `c` lies in the basic Cyrillic block.
pub fn is_cyrillic(c: char) -> bool {
    ('\u{0400}'..='\u{04FF}').contains(&c)
}

/// Whether `c` is a Latin letter with a diacritic (Latin-1 Supplement or
/// Latin Extended-A), excluding the multiplication and division signs.
pub fn is_accented_latin(c: char) -> bool {
    matches!(c, '\u{00C0}'..='\u{00FF}' | '\u{0100}'..='\u{017F}') && c != '×' && c != '÷'
}

/// Letters that may start an emoji query: ASCII, Cyrillic or accented Latin.
pub fn is_query_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || is_cyrillic(c) || is_accented_latin(c)
}

fn has_spanish_marker(query: &str) -> bool {
    query
        .chars()
        .flat_map(char::to_lowercase)
        .any(|c| SPANISH_MARKERS.contains(&c))
}

/// Narrow `chosen` to the languages worth searching for `query`.
///
/// Never returns an empty list while `chosen` is non-empty.
pub fn select_languages(chosen: &[Language], query: &str) -> Vec<Language> {
    let narrowed: Vec<Language> = if query.chars().any(is_cyrillic) {
        chosen
            .iter()
            .copied()
            .filter(|l| *l == Language::Russian)
            .collect()
    } else if has_spanish_marker(query) {
        chosen
            .iter()
            .copied()
            .filter(|l| *l == Language::Spanish)
            .collect()
    } else {
        chosen
            .iter()
            .copied()
            .filter(|l| *l != Language::Russian)
            .collect()
    };

    if narrowed.is_empty() {
        chosen.to_vec()
    } else {
        narrowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language() {
        assert_eq!("english".parse::<Language>().unwrap(), Language::English);
        assert_eq!(" Russian ".parse::<Language>().unwrap(), Language::Russian);
        assert!("klingon".parse::<Language>().is_err());
    }

    #[test]
    fn test_cyrillic_selects_russian_only() {
        let chosen = [Language::English, Language::Russian];
        assert_eq!(select_languages(&chosen, "любовь"), vec![Language::Russian]);
    }

    #[test]
    fn test_spanish_marker_selects_spanish() {
        let chosen = [Language::English, Language::Spanish];
        assert_eq!(select_languages(&chosen, "corazón"), vec![Language::Spanish]);
        assert_eq!(select_languages(&chosen, "NIÑO"), vec![Language::Spanish]);
    }

    #[test]
    fn test_latin_excludes_russian() {
        let chosen = [Language::English, Language::Russian, Language::Spanish];
        assert_eq!(
            select_languages(&chosen, "love"),
            vec![Language::English, Language::Spanish]
        );
    }

    #[test]
    fn test_fallback_to_full_chosen_set() {
        // Latin query with only russian chosen would search nothing
        assert_eq!(
            select_languages(&[Language::Russian], "love"),
            vec![Language::Russian]
        );
        // Cyrillic query without russian chosen
        assert_eq!(
            select_languages(&[Language::English, Language::Spanish], "кот"),
            vec![Language::English, Language::Spanish]
        );
    }

    #[test]
    fn test_query_letters() {
        assert!(is_query_letter('a'));
        assert!(is_query_letter('Ж'));
        assert!(is_query_letter('é'));
        assert!(!is_query_letter('×'));
        assert!(!is_query_letter('1'));
        assert!(!is_query_letter('_'));
    }
}
