//! The per-keystroke suggestion pipeline.
//!
//! [`EmojiSuggester`] owns the search engine, the current settings and the
//! store they persist to. Frontends call [`EmojiSuggester::suggest_at`] on
//! every keystroke, [`EmojiSuggester::accept`] when the user picks an entry,
//! and [`EmojiSuggester::apply`] for settings edits.
//!
//! If the engine cannot be initialized the suggester is disabled for the
//! rest of its lifetime: suggestions are empty and the failure is reported
//! once through [`EmojiSuggester::take_notification`].

use tracing::{debug, error};

use crate::config::{Settings, SettingsCommand, SettingsStore};
use crate::core::dictionary::bundled_payload;
use crate::core::language::select_languages;
use crate::core::ranking::{emoji_from_display, merge_and_rank, Suggestion};
use crate::core::search::EmojiSearchEngine;
use crate::error::{LookupError, LookupResult};
use crate::services::random::random_emoji;
use crate::services::trigger::{self, TriggerSpan};

pub struct EmojiSuggester<S: SettingsStore> {
    engine: EmojiSearchEngine,
    settings: Settings,
    store: S,
    /// Payload used instead of the bundled dictionaries.
    dictionaries: Option<String>,
    disabled: bool,
    notification: Option<LookupError>,
}

impl<S: SettingsStore> EmojiSuggester<S> {
    /// Load settings from `store` and index the bundled dictionaries for the
    /// chosen languages.
    pub fn new(store: S) -> Self {
        Self::build(store, None)
    }

    /// Like [`EmojiSuggester::new`], but index `payload` (a serialized
    /// `languageId -> dictionary` map) instead of the bundled data.
    pub fn with_dictionaries(store: S, payload: impl Into<String>) -> Self {
        Self::build(store, Some(payload.into()))
    }

    fn build(store: S, dictionaries: Option<String>) -> Self {
        let settings = store.load();
        let mut suggester = Self {
            engine: EmojiSearchEngine::new(),
            settings,
            store,
            dictionaries,
            disabled: false,
            notification: None,
        };
        suggester.reindex();
        suggester
    }

    fn reindex(&mut self) {
        if self.disabled {
            return;
        }

        let payload = match &self.dictionaries {
            Some(payload) => Ok(payload.clone()),
            None => bundled_payload(&self.settings.chosen_languages),
        };

        if let Err(e) = payload.and_then(|p| self.engine.initialize(&p)) {
            error!("Emoji suggestions disabled: {}", e);
            self.disabled = true;
            self.notification = Some(LookupError::Resource(e.to_string()));
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn engine(&self) -> &EmojiSearchEngine {
        &self.engine
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_enabled(&self) -> bool {
        !self.disabled
    }

    /// The initialization failure, handed out only once.
    pub fn take_notification(&mut self) -> Option<LookupError> {
        self.notification.take()
    }

    /// Ranked suggestions for `query`.
    pub fn suggestions(&self, query: &str) -> Vec<Suggestion> {
        if self.disabled {
            return Vec::new();
        }

        let languages = select_languages(&self.settings.chosen_languages, query);
        let matches = self.engine.search_multiple(query, &languages);
        let mut ranked = merge_and_rank(
            &matches,
            query,
            &self.settings.custom_emoji_mappings,
            &self.settings.emoji_popularity,
        );
        ranked.truncate(self.settings.max_suggestions);
        debug!(query, ?languages, results = ranked.len(), "suggest");
        ranked
    }

    /// Suggestions rendered for display.
    pub fn suggest(&self, query: &str) -> Vec<String> {
        self.suggestions(query)
            .iter()
            .map(|s| s.render(self.settings.show_keywords))
            .collect()
    }

    /// Detect a trigger ending at `cursor` in `line` and suggest for it.
    pub fn suggest_at(&self, line: &str, cursor: usize) -> Option<(TriggerSpan, Vec<String>)> {
        let span = trigger::detect(line, cursor, self.settings.trigger_char)?;
        let suggestions = self.suggest(&span.query);
        Some((span, suggestions))
    }

    /// Accept a rendered suggestion: count one use of its emoji, persist,
    /// and return the emoji to insert.
    pub fn accept(&mut self, display: &str) -> LookupResult<String> {
        let emoji = emoji_from_display(display.trim(), self.settings.show_keywords).to_string();
        if emoji.is_empty() {
            return Err(LookupError::Query("empty suggestion".into()));
        }

        let count = self.settings.emoji_popularity.record(&emoji);
        debug!(%emoji, count, "accepted suggestion");
        if let Err(e) = self.store.save(&self.settings) {
            error!("Failed to save popularity: {}", e);
        }
        Ok(emoji)
    }

    /// Apply a settings edit, persist it, and reindex if the chosen
    /// languages changed.
    pub fn apply(&mut self, command: &SettingsCommand) -> LookupResult<()> {
        let reindex = command.apply(&mut self.settings)?;
        let saved = self.store.save(&self.settings);
        if reindex {
            self.reindex();
        }
        saved
    }

    /// Insert a random emoji; does not touch the dictionaries.
    pub fn random(&self) -> &'static str {
        random_emoji()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemorySettingsStore;
    use crate::core::language::Language;

    const PAYLOAD: &str = r#"{
        "english": {"love": ["❤️", "😍"], "grinning": "😀", "joy": "😂", "laugh": ["😂", "😀"], "любовь": "🇬🇧"},
        "russian": {"любовь": "❤️"}
    }"#;

    fn suggester(settings: Settings) -> EmojiSuggester<MemorySettingsStore> {
        EmojiSuggester::with_dictionaries(MemorySettingsStore::new(settings), PAYLOAD)
    }

    #[test]
    fn test_love_scenario() {
        let s = suggester(Settings::default());
        assert_eq!(s.suggest("love"), vec!["❤️ (love)", "😍 (love)"]);
    }

    #[test]
    fn test_custom_mapping_scenario() {
        let mut settings = Settings::default();
        settings
            .custom_emoji_mappings
            .insert("mycompany".into(), "🏢".into());
        let s = suggester(settings);
        assert_eq!(s.suggest("my"), vec!["🏢 (mycompany)"]);
    }

    #[test]
    fn test_cyrillic_searches_russian_only() {
        let mut settings = Settings::default();
        settings.chosen_languages = vec![Language::English, Language::Russian];
        let s = suggester(settings);
        assert_eq!(s.suggest("любовь"), vec!["❤️ (любовь)"]);
    }

    #[test]
    fn test_popularity_scenario() {
        let mut settings = Settings::default();
        settings.emoji_popularity.set("😀", 5);
        settings.emoji_popularity.set("😂", 2);
        settings.show_keywords = false;
        let s = suggester(settings);
        assert_eq!(s.suggest("laugh"), vec!["😀", "😂"]);
        assert_eq!(s.suggest("g"), vec!["😀", "😂"]);
    }

    #[test]
    fn test_results_unique() {
        let s = suggester(Settings::default());
        let results = s.suggestions("o");
        let mut emojis: Vec<&str> = results.iter().map(|r| r.emoji.as_str()).collect();
        let total = emojis.len();
        emojis.sort();
        emojis.dedup();
        assert_eq!(emojis.len(), total);
    }

    #[test]
    fn test_accept_counts_once_and_persists() {
        let mut s = suggester(Settings::default());
        assert_eq!(s.accept("😂 (joy)").unwrap(), "😂");
        assert_eq!(s.settings().emoji_popularity.count("😂"), 1);
        assert_eq!(s.store().saves, 1);
        assert_eq!(s.store().settings.emoji_popularity.count("😂"), 1);

        // the accepted emoji now outranks its tie
        assert_eq!(s.suggest("laugh"), vec!["😂 (laugh)", "😀 (laugh)"]);
    }

    #[test]
    fn test_accept_credits_each_split_glyph() {
        let mut s = EmojiSuggester::with_dictionaries(
            MemorySettingsStore::default(),
            r#"{"english": {"smile": ["😀 😃"]}}"#,
        );
        let items = s.suggest("smile");
        assert_eq!(items, vec!["😀 (smile)", "😃 (smile)"]);

        let accepted = s.accept(&items[1]).unwrap();
        assert_eq!(accepted, "😃");
        assert_eq!(s.settings().emoji_popularity.count("😃"), 1);
        assert_eq!(s.suggest("smile")[0], "😃 (smile)");
    }

    #[test]
    fn test_suggest_at() {
        let s = suggester(Settings::default());
        let (span, items) = s.suggest_at("so much :lov", 12).unwrap();
        assert_eq!(span.start, 8);
        assert_eq!(span.query, "lov");
        assert_eq!(items, vec!["❤️ (love)", "😍 (love)"]);
        assert!(s.suggest_at("so much lov", 11).is_none());
    }

    #[test]
    fn test_max_suggestions() {
        let mut settings = Settings::default();
        settings.max_suggestions = 1;
        let s = suggester(settings);
        assert_eq!(s.suggest("love").len(), 1);
    }

    #[test]
    fn test_apply_persists_and_reindexes() {
        let mut s = EmojiSuggester::new(MemorySettingsStore::default());
        assert_eq!(s.engine().languages(), vec![Language::English]);

        s.apply(&SettingsCommand::AddLanguage(Language::Russian))
            .unwrap();
        assert_eq!(
            s.engine().languages(),
            vec![Language::English, Language::Russian]
        );
        assert_eq!(s.store().saves, 1);
        assert!(!s.suggest("кот").is_empty());
    }

    #[test]
    fn test_invalid_command_is_not_persisted() {
        let mut s = suggester(Settings::default());
        let err = s.apply(&SettingsCommand::DeleteMapping {
            keyword: "nope".into(),
        });
        assert!(matches!(err, Err(LookupError::Config(_))));
        assert_eq!(s.store().saves, 0);
    }

    #[test]
    fn test_initialization_failure_disables_once() {
        let mut s = EmojiSuggester::with_dictionaries(
            MemorySettingsStore::default(),
            r#"{"english": {"love": 1}}"#,
        );
        assert!(!s.is_enabled());
        assert!(s.suggest("love").is_empty());
        assert!(matches!(
            s.take_notification(),
            Some(LookupError::Resource(_))
        ));
        assert!(s.take_notification().is_none());

        // no automatic retry on later settings changes
        s.apply(&SettingsCommand::AddLanguage(Language::Spanish))
            .unwrap();
        assert!(!s.is_enabled());
        assert!(s.take_notification().is_none());
    }

    #[test]
    fn test_random_is_dictionary_independent() {
        let s = EmojiSuggester::with_dictionaries(MemorySettingsStore::default(), "{}");
        assert!(!s.random().is_empty());
    }
}
