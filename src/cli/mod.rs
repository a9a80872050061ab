//! Command-line front end.
//!
//! Runs the same pipeline an editor integration would, against the settings
//! file on disk: search, suggest, accept, and settings edits.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{FileSettingsStore, SettingsCommand};
use crate::core::Language;
use crate::suggester::EmojiSuggester;

#[derive(Parser)]
#[command(name = "emoji-lookup")]
#[command(about = "Keyword to emoji lookup", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Dictionary payload (JSON, languageId -> keyword -> emoji) to use
    /// instead of the bundled dictionaries
    #[arg(long, global = true, value_name = "FILE")]
    pub dictionary: Option<PathBuf>,

    /// Settings file (default: the user config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub settings: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Raw engine search, printed as JSON
    Search {
        query: String,

        /// Language to search (repeatable, default: chosen languages)
        #[arg(long = "lang", value_name = "LANGUAGE")]
        languages: Vec<Language>,
    },

    /// Ranked suggestions for a query
    Suggest { query: String },

    /// Detect a trigger in a line of text and suggest for it
    Line {
        text: String,

        /// Cursor position in characters (default: end of line)
        #[arg(long)]
        cursor: Option<usize>,
    },

    /// Accept a suggestion and record its use
    Accept { display: String },

    /// Manage custom keyword mappings
    Map {
        #[command(subcommand)]
        action: MapCommands,
    },

    /// Manage chosen languages
    Lang {
        #[command(subcommand)]
        action: LangCommands,
    },

    /// Forget all usage counts
    ResetPopularity,

    /// Print a random emoji
    Random,

    /// Print the effective settings
    Settings,
}

#[derive(Subcommand)]
pub enum MapCommands {
    /// Add or replace a mapping
    Add { keyword: String, emoji: String },
    /// Delete a mapping
    Delete { keyword: String },
    /// Delete every mapping
    Reset,
}

#[derive(Subcommand)]
pub enum LangCommands {
    Add { language: Language },
    Remove { language: Language },
}

/// Parse arguments and run the selected command.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let store = cli
        .settings
        .map(FileSettingsStore::new)
        .unwrap_or_default();
    let mut suggester = match &cli.dictionary {
        Some(path) => EmojiSuggester::with_dictionaries(store, fs::read_to_string(path)?),
        None => EmojiSuggester::new(store),
    };
    if let Some(err) = suggester.take_notification() {
        anyhow::bail!(err);
    }

    let command = match cli.command {
        Commands::Search { query, languages } => {
            let languages = if languages.is_empty() {
                suggester.settings().chosen_languages.clone()
            } else {
                languages
            };
            let matches = suggester.engine().search_multiple(&query, &languages);
            println!("{}", serde_json::to_string_pretty(&matches)?);
            return Ok(());
        }
        Commands::Suggest { query } => {
            for item in suggester.suggest(&query) {
                println!("{}", item);
            }
            return Ok(());
        }
        Commands::Line { text, cursor } => {
            let cursor = cursor.unwrap_or_else(|| text.chars().count());
            match suggester.suggest_at(&text, cursor) {
                Some((span, items)) => {
                    println!("{}..{} {:?}", span.start, span.end, span.query);
                    for item in items {
                        println!("{}", item);
                    }
                }
                None => println!("no trigger"),
            }
            return Ok(());
        }
        Commands::Accept { display } => {
            println!("{}", suggester.accept(&display)?);
            return Ok(());
        }
        Commands::Random => {
            println!("{}", suggester.random());
            return Ok(());
        }
        Commands::Settings => {
            println!("{}", toml::to_string_pretty(suggester.settings())?);
            return Ok(());
        }
        Commands::Map { action } => match action {
            MapCommands::Add { keyword, emoji } => SettingsCommand::AddMapping { keyword, emoji },
            MapCommands::Delete { keyword } => SettingsCommand::DeleteMapping { keyword },
            MapCommands::Reset => SettingsCommand::ResetMappings,
        },
        Commands::Lang { action } => match action {
            LangCommands::Add { language } => SettingsCommand::AddLanguage(language),
            LangCommands::Remove { language } => SettingsCommand::RemoveLanguage(language),
        },
        Commands::ResetPopularity => SettingsCommand::ResetPopularity,
    };

    suggester.apply(&command)?;
    println!("Settings updated");
    Ok(())
}
