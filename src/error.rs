//! Error types for emoji lookup
//!
//! Provides standardized error handling across the engine, the settings
//! layer and the command-line front end.

use thiserror::Error;

/// Errors that can occur while loading, querying or configuring the engine
///
/// ```
/// use emoji_lookup::core::search::EmojiSearchEngine;
/// use emoji_lookup::error::LookupError;
///
/// let mut engine = EmojiSearchEngine::new();
/// let err = engine.initialize(r#"{"english": {"love": 1}}"#).unwrap_err();
/// assert!(matches!(err, LookupError::Format(_)));
/// ```
#[derive(Debug, Error)]
pub enum LookupError {
    /// Malformed dictionary payload
    #[error("Dictionary format error: {0}")]
    Format(String),

    /// Search failure (unknown language, undecodable engine output)
    #[error("Query error: {0}")]
    Query(String),

    /// The engine could not be initialized at all
    #[error("Engine unavailable: {0}")]
    Resource(String),

    /// Invalid settings or settings command
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("Settings parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("Settings serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Result type alias for lookup operations
pub type LookupResult<T> = Result<T, LookupError>;
