//! Random emoji insertion, independent of any dictionary.

use rand::seq::SliceRandom;

/// Glyphs the random insertion command picks from.
pub const FALLBACK_EMOJIS: &[&str] = &[
    "😀", "😂", "🥰", "😎", "🤔", "👍", "🎉", "🔥", "✨", "🚀", "🌈", "🍀",
];

/// Pick one glyph uniformly at random.
pub fn random_emoji() -> &'static str {
    FALLBACK_EMOJIS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("😀")
}
