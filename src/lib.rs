//! Emoji lookup - incremental multilingual keyword-to-emoji search.
//!
//! As the user types a short query, the engine returns a ranked list of
//! emojis from per-language keyword dictionaries, merged with user-defined
//! mappings and ordered by personal usage.
//!
//! # Architecture
//!
//! The library is organized into these main modules:
//!
//! - [`core`] - Dictionaries, substring index, search engine and ranking
//! - [`services`] - Popularity counts, trigger detection, random insertion
//! - [`config`] - Settings loading, migration, persistence and edit commands
//! - [`suggester`] - The full per-keystroke pipeline behind a frontend
//! - [`error`] - The `LookupError` taxonomy shared by all of the above
//!
//! # Example
//!
//! ```ignore
//! use emoji_lookup::{EmojiSuggester, FileSettingsStore};
//!
//! let mut suggester = EmojiSuggester::new(FileSettingsStore::default());
//! if let Some((span, items)) = suggester.suggest_at("so much :lov", 12) {
//!     let emoji = suggester.accept(&items[0])?;
//!     // replace span.start..span.end with `emoji`
//! }
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod services;
pub mod suggester;

pub use config::{
    FileSettingsStore, MemorySettingsStore, Settings, SettingsCommand, SettingsStore,
};
pub use crate::core::search::{EmojiSearchEngine, KeywordMatch};
pub use crate::core::Language;
pub use error::{LookupError, LookupResult};
pub use suggester::EmojiSuggester;
