//! User settings: defaults, merge-on-load, persistence and edit commands.
//!
//! Settings live in a TOML file under the user's config directory. Loading
//! never fails: missing or mistyped fields take defaults one by one, unknown
//! fields are ignored, and a file that is not TOML at all is backed up and
//! replaced by defaults.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::core::language::Language;
use crate::error::{LookupError, LookupResult};
use crate::services::popularity::PopularityTable;

/// User-defined keyword -> emoji pairs, one emoji per keyword.
pub type CustomMappings = BTreeMap<String, String>;

pub const DEFAULT_TRIGGER: char = ':';
const DEFAULT_MAX_SUGGESTIONS: usize = 20;
const MAX_SUGGESTIONS_LIMIT: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredSettings")]
pub struct Settings {
    pub chosen_languages: Vec<Language>,
    pub trigger_char: char,
    pub show_keywords: bool,
    pub max_suggestions: usize,
    // Tables last so TOML output stays valid.
    pub custom_emoji_mappings: CustomMappings,
    pub emoji_popularity: PopularityTable,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            chosen_languages: vec![Language::English],
            trigger_char: DEFAULT_TRIGGER,
            show_keywords: true,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            custom_emoji_mappings: CustomMappings::new(),
            emoji_popularity: PopularityTable::new(),
        }
    }
}

/// On-disk shape, every field optional. `language` is the pre-multilingual
/// single-language field.
#[derive(Debug, Default, Deserialize)]
#[serde(from = "toml::Table")]
struct StoredSettings {
    chosen_languages: Option<Vec<String>>,
    language: Option<String>,
    trigger_char: Option<String>,
    show_keywords: Option<bool>,
    max_suggestions: Option<usize>,
    custom_emoji_mappings: Option<CustomMappings>,
    emoji_popularity: Option<PopularityTable>,
}

/// Remove `key` and convert it; a value of the wrong type is dropped alone.
fn take_field<T: DeserializeOwned>(table: &mut toml::Table, key: &str) -> Option<T> {
    let value = table.remove(key)?;
    match value.try_into::<T>() {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(field = key, "ignoring invalid setting: {}", e);
            None
        }
    }
}

/// Keep the entries of a table whose value converts; drop the rest.
fn take_entries<T>(
    table: &mut toml::Table,
    key: &str,
    convert: impl Fn(&toml::Value) -> Option<T>,
) -> Option<Vec<(String, T)>> {
    let entries: toml::Table = take_field(table, key)?;
    Some(
        entries
            .into_iter()
            .filter_map(|(k, v)| match convert(&v) {
                Some(converted) => Some((k, converted)),
                None => {
                    warn!(field = key, entry = %k, "ignoring invalid setting entry");
                    None
                }
            })
            .collect(),
    )
}

impl From<toml::Table> for StoredSettings {
    fn from(mut table: toml::Table) -> Self {
        let chosen_languages = take_field::<Vec<toml::Value>>(&mut table, "chosenLanguages")
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| id.as_str().map(str::to_string))
                    .collect()
            });

        let custom_emoji_mappings = take_entries(&mut table, "customEmojiMappings", |v| {
            v.as_str().map(str::to_string)
        })
        .map(|entries| entries.into_iter().collect());

        let emoji_popularity = take_entries(&mut table, "emojiPopularity", |v| {
            v.as_integer().and_then(|n| u64::try_from(n).ok())
        })
        .map(|entries| {
            let mut popularity = PopularityTable::new();
            for (emoji, count) in entries {
                popularity.set(&emoji, count);
            }
            popularity
        });

        Self {
            chosen_languages,
            language: take_field(&mut table, "language"),
            trigger_char: take_field(&mut table, "triggerChar"),
            show_keywords: take_field(&mut table, "showKeywords"),
            max_suggestions: take_field(&mut table, "maxSuggestions"),
            custom_emoji_mappings,
            emoji_popularity,
        }
    }
}

fn parse_languages(ids: &[String]) -> Vec<Language> {
    ids.iter()
        .filter_map(|id| match id.parse::<Language>() {
            Ok(language) => Some(language),
            Err(_) => {
                warn!(language = %id, "ignoring unsupported language in settings");
                None
            }
        })
        .collect()
}

impl From<StoredSettings> for Settings {
    fn from(stored: StoredSettings) -> Self {
        let defaults = Settings::default();

        let mut chosen = stored.chosen_languages.as_deref().map(parse_languages);
        let legacy = stored
            .language
            .as_deref()
            .and_then(|id| id.parse::<Language>().ok());
        if let Some(legacy) = legacy {
            match chosen.as_mut() {
                Some(list) if !list.contains(&legacy) => list.push(legacy),
                Some(_) => {}
                None => chosen = Some(vec![legacy]),
            }
            info!(language = %legacy, "migrated legacy language setting");
        }

        let trigger_char = stored.trigger_char.and_then(|s| {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => {
                    warn!(trigger = %s, "trigger must be a single character");
                    None
                }
            }
        });

        let mut settings = Settings {
            chosen_languages: chosen.unwrap_or(defaults.chosen_languages),
            trigger_char: trigger_char.unwrap_or(defaults.trigger_char),
            show_keywords: stored.show_keywords.unwrap_or(defaults.show_keywords),
            max_suggestions: stored.max_suggestions.unwrap_or(defaults.max_suggestions),
            custom_emoji_mappings: stored.custom_emoji_mappings.unwrap_or_default(),
            emoji_popularity: stored.emoji_popularity.unwrap_or_default(),
        };
        settings.validate();
        settings
    }
}

impl Settings {
    /// Get the settings file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .map(|h| h.join(".config"))
                    .unwrap_or_else(|| PathBuf::from("/tmp"))
            })
            .join("emoji-lookup")
            .join("settings.toml")
    }

    /// Parse settings. Fields with the wrong type fall back to their
    /// defaults; only a file that is not TOML at all is an error.
    pub fn try_from_toml(content: &str) -> LookupResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Parse settings, falling back to defaults on malformed input.
    pub fn from_toml(content: &str) -> Self {
        Self::try_from_toml(content).unwrap_or_else(|e| {
            warn!("Failed to parse settings, using defaults: {}", e);
            Self::default()
        })
    }

    /// Load settings from `path`, or return defaults if not found.
    ///
    /// A file that cannot be parsed is copied to `<path>.bak` before the
    /// defaults are returned, so the next save does not lose its contents.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), "Failed to read settings: {}", e);
                return Self::default();
            }
        };
        match Self::try_from_toml(&content) {
            Ok(settings) => settings,
            Err(e) => {
                let backup = path.with_extension("toml.bak");
                warn!(
                    path = %path.display(),
                    backup = %backup.display(),
                    "Failed to parse settings, using defaults: {}",
                    e
                );
                if let Err(e) = fs::copy(path, &backup) {
                    warn!("Failed to back up unreadable settings: {}", e);
                }
                Self::default()
            }
        }
    }

    /// Save settings to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> LookupResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Restore invariants after loading or editing.
    fn validate(&mut self) {
        let mut seen = Vec::with_capacity(self.chosen_languages.len());
        self.chosen_languages.retain(|l| {
            if seen.contains(l) {
                false
            } else {
                seen.push(*l);
                true
            }
        });
        if self.chosen_languages.is_empty() {
            self.chosen_languages.push(Language::English);
        }

        if self.trigger_char.is_whitespace() {
            self.trigger_char = DEFAULT_TRIGGER;
        }

        self.max_suggestions = self.max_suggestions.clamp(1, MAX_SUGGESTIONS_LIMIT);
    }
}

/// An edit to the settings, as issued by a settings panel or the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsCommand {
    AddMapping { keyword: String, emoji: String },
    DeleteMapping { keyword: String },
    ResetPopularity,
    ResetMappings,
    AddLanguage(Language),
    RemoveLanguage(Language),
    SetTriggerChar(char),
    SetShowKeywords(bool),
}

impl SettingsCommand {
    /// Apply the command. Returns `true` when the chosen languages changed
    /// and the search engine must be reinitialized.
    pub fn apply(&self, settings: &mut Settings) -> LookupResult<bool> {
        match self {
            SettingsCommand::AddMapping { keyword, emoji } => {
                let keyword = keyword.trim();
                let emoji = emoji.trim();
                if keyword.is_empty() {
                    return Err(LookupError::Config("mapping keyword is empty".into()));
                }
                if emoji.is_empty() || emoji.chars().any(char::is_whitespace) {
                    return Err(LookupError::Config(format!(
                        "'{}' is not a single emoji",
                        emoji
                    )));
                }
                settings
                    .custom_emoji_mappings
                    .insert(keyword.to_string(), emoji.to_string());
                Ok(false)
            }
            SettingsCommand::DeleteMapping { keyword } => {
                settings
                    .custom_emoji_mappings
                    .remove(keyword.trim())
                    .ok_or_else(|| {
                        LookupError::Config(format!("no custom mapping for '{}'", keyword))
                    })?;
                Ok(false)
            }
            SettingsCommand::ResetPopularity => {
                settings.emoji_popularity.reset();
                Ok(false)
            }
            SettingsCommand::ResetMappings => {
                settings.custom_emoji_mappings.clear();
                Ok(false)
            }
            SettingsCommand::AddLanguage(language) => {
                if settings.chosen_languages.contains(language) {
                    return Ok(false);
                }
                settings.chosen_languages.push(*language);
                Ok(true)
            }
            SettingsCommand::RemoveLanguage(language) => {
                let before = settings.chosen_languages.clone();
                settings.chosen_languages.retain(|l| l != language);
                settings.validate();
                Ok(settings.chosen_languages != before)
            }
            SettingsCommand::SetTriggerChar(c) => {
                if c.is_whitespace() {
                    return Err(LookupError::Config(
                        "trigger cannot be whitespace".into(),
                    ));
                }
                settings.trigger_char = *c;
                Ok(false)
            }
            SettingsCommand::SetShowKeywords(show) => {
                settings.show_keywords = *show;
                Ok(false)
            }
        }
    }
}

/// Where settings are persisted.
pub trait SettingsStore {
    fn load(&self) -> Settings;
    fn save(&mut self, settings: &Settings) -> LookupResult<()>;
}

/// TOML file on disk.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileSettingsStore {
    fn default() -> Self {
        Self::new(Settings::default_path())
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Settings {
        Settings::load_from(&self.path)
    }

    fn save(&mut self, settings: &Settings) -> LookupResult<()> {
        settings.save_to(&self.path)
    }
}

/// In-memory store; keeps the last saved value and counts saves.
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    pub settings: Settings,
    pub saves: usize,
}

impl MemorySettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self { settings, saves: 0 }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Settings {
        self.settings.clone()
    }

    fn save(&mut self, settings: &Settings) -> LookupResult<()> {
        self.settings = settings.clone();
        self.saves += 1;
        Ok(())
    }
}
