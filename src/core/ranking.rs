//! Merging and ranking of keyword matches into the final suggestion list.
//!
//! 1. flatten engine matches into `(emoji, keyword)` pairs, first keyword wins
//! 2. overlay custom mappings whose keyword contains the query
//! 3. stable sort by popularity, most used first

use std::collections::HashMap;
use tracing::warn;

use super::search::{decode_matches, KeywordMatch};
use crate::config::CustomMappings;
use crate::services::popularity::PopularityTable;

/// One entry of the suggestion list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub emoji: String,
    pub keyword: String,
}

impl Suggestion {
    /// Display string: `"😀"` or `"😀 (grinning)"`.
    pub fn render(&self, show_keywords: bool) -> String {
        if show_keywords {
            format!("{} ({})", self.emoji, self.keyword)
        } else {
            self.emoji.clone()
        }
    }
}

/// Recover the emoji from a string produced by [`Suggestion::render`].
pub fn emoji_from_display(display: &str, show_keywords: bool) -> &str {
    if show_keywords {
        display.split_once(' ').map_or(display, |(emoji, _)| emoji)
    } else {
        display
    }
}

/// Insertion-ordered emoji -> keyword map.
#[derive(Default)]
struct SuggestionMap {
    items: Vec<Suggestion>,
    positions: HashMap<String, usize>,
}

impl SuggestionMap {
    fn insert_first(&mut self, emoji: &str, keyword: &str) {
        if self.positions.contains_key(emoji) {
            return;
        }
        self.positions.insert(emoji.to_string(), self.items.len());
        self.items.push(Suggestion {
            emoji: emoji.to_string(),
            keyword: keyword.to_string(),
        });
    }

    fn overwrite(&mut self, emoji: &str, keyword: &str) {
        match self.positions.get(emoji) {
            Some(&pos) => self.items[pos].keyword = keyword.to_string(),
            None => self.insert_first(emoji, keyword),
        }
    }
}

/// Deduplicate engine matches by emoji and overlay custom mappings.
///
/// The first keyword seen for an emoji is kept. A matching custom mapping
/// replaces the keyword of an emoji already present (keeping its position)
/// or appends the emoji.
pub fn merge(matches: &[KeywordMatch], query: &str, custom: &CustomMappings) -> Vec<Suggestion> {
    let query = query.to_lowercase();

    let mut map = SuggestionMap::default();
    for m in matches {
        for emoji in &m.emojis {
            map.insert_first(emoji, &m.keyword);
        }
    }

    for (keyword, emoji) in custom {
        if keyword.to_lowercase().contains(&query) {
            map.overwrite(emoji, keyword);
        }
    }

    map.items
}

/// Order by popularity, highest first. Ties keep their merge order.
pub fn rank(mut suggestions: Vec<Suggestion>, popularity: &PopularityTable) -> Vec<Suggestion> {
    // sort_by_key is stable
    suggestions.sort_by_key(|s| std::cmp::Reverse(popularity.count(&s.emoji)));
    suggestions
}

/// Merge and rank in one step.
pub fn merge_and_rank(
    matches: &[KeywordMatch],
    query: &str,
    custom: &CustomMappings,
    popularity: &PopularityTable,
) -> Vec<Suggestion> {
    rank(merge(matches, query, custom), popularity)
}

/// Merge and rank serialized engine output. Undecodable output yields an
/// empty list.
pub fn merge_engine_output(
    engine_json: &str,
    query: &str,
    custom: &CustomMappings,
    popularity: &PopularityTable,
) -> Vec<Suggestion> {
    match decode_matches(engine_json) {
        Ok(matches) => merge_and_rank(&matches, query, custom, popularity),
        Err(e) => {
            warn!("dropping suggestions: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn km(keyword: &str, emojis: &[&str]) -> KeywordMatch {
        KeywordMatch {
            keyword: keyword.to_string(),
            emojis: emojis.iter().map(|e| e.to_string()).collect(),
        }
    }

    fn emojis(list: &[Suggestion]) -> Vec<&str> {
        list.iter().map(|s| s.emoji.as_str()).collect()
    }

    #[test]
    fn test_first_keyword_wins() {
        let matches = vec![km("love", &["❤️", "😍"]), km("lovely", &["😍", "🥰"])];
        let merged = merge(&matches, "lov", &CustomMappings::new());
        assert_eq!(emojis(&merged), vec!["❤️", "😍", "🥰"]);
        assert_eq!(merged[1].keyword, "love");
    }

    #[test]
    fn test_custom_mapping_added() {
        let mut custom = CustomMappings::new();
        custom.insert("mycompany".into(), "🏢".into());
        let merged = merge(&[], "my", &custom);
        assert_eq!(
            merged,
            vec![Suggestion {
                emoji: "🏢".into(),
                keyword: "mycompany".into()
            }]
        );
    }

    #[test]
    fn test_custom_mapping_overrides_keyword_in_place() {
        let mut custom = CustomMappings::new();
        custom.insert("lovebug".into(), "😍".into());
        custom.insert("unrelated".into(), "🐛".into());
        let matches = vec![km("love", &["❤️", "😍"])];
        let merged = merge(&matches, "LOVE", &custom);
        assert_eq!(emojis(&merged), vec!["❤️", "😍"]);
        assert_eq!(merged[1].keyword, "lovebug");
    }

    #[test]
    fn test_empty_query_overlays_every_custom_mapping() {
        let mut custom = CustomMappings::new();
        custom.insert("mycompany".into(), "🏢".into());
        custom.insert("coffee".into(), "☕".into());
        // the engine returns no matches for an empty query
        let merged = merge(&[], "", &custom);
        assert_eq!(emojis(&merged), vec!["☕", "🏢"]);
    }

    #[test]
    fn test_popularity_order_is_stable() {
        let mut popularity = PopularityTable::new();
        popularity.set("😂", 2);
        popularity.set("😀", 5);
        let matches = vec![km("a", &["🙂", "😂", "🙃", "😀", "😐"])];
        let ranked = merge_and_rank(&matches, "a", &CustomMappings::new(), &popularity);
        assert_eq!(emojis(&ranked), vec!["😀", "😂", "🙂", "🙃", "😐"]);
    }

    #[test]
    fn test_pipeline_is_deterministic() {
        let popularity = PopularityTable::new();
        let matches = vec![km("cat", &["🐱", "🐈"]), km("catch", &["🧤"])];
        let first = merge_and_rank(&matches, "cat", &CustomMappings::new(), &popularity);
        for _ in 0..5 {
            assert_eq!(
                merge_and_rank(&matches, "cat", &CustomMappings::new(), &popularity),
                first
            );
        }
    }

    #[test]
    fn test_render_roundtrip() {
        let s = Suggestion {
            emoji: "👨‍👩‍👧".into(),
            keyword: "family of three".into(),
        };
        assert_eq!(s.render(false), "👨‍👩‍👧");
        assert_eq!(s.render(true), "👨‍👩‍👧 (family of three)");
        assert_eq!(emoji_from_display(&s.render(true), true), "👨‍👩‍👧");
        assert_eq!(emoji_from_display(&s.render(false), false), "👨‍👩‍👧");
    }

    #[test]
    fn test_bad_engine_output_is_empty() {
        let popularity = PopularityTable::new();
        let custom = CustomMappings::new();
        assert!(merge_engine_output("{not json", "a", &custom, &popularity).is_empty());
        let ok = merge_engine_output(r#"[["cat",["🐱"]]]"#, "ca", &custom, &popularity);
        assert_eq!(emojis(&ok), vec!["🐱"]);
    }
}
