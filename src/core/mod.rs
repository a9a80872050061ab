//! Core engine module - dictionary loading, indexing, search and ranking.
//!
//! This module contains everything that runs on a keystroke and depends on
//! no settings storage or frontend:
//! - Language identifiers and script-based language selection
//! - Dictionary validation and the bundled dictionaries
//! - Per-language substring index
//! - Search engine and its serialized boundary
//! - Merging, deduplication and popularity ranking

pub mod dictionary;
pub mod index;
pub mod language;
pub mod ranking;
pub mod search;

pub use dictionary::KeywordEntry;
pub use index::LanguageIndex;
pub use language::{select_languages, Language};
pub use ranking::Suggestion;
pub use search::{EmojiSearchEngine, KeywordMatch};
