//! Detection of an in-progress emoji query in a line of text.
//!
//! A query starts at the trigger character (`:` by default), is followed by
//! at least one letter, contains no whitespace, and always ends at the cursor:
//!
//! ```text
//! "I :hea|"   -> span 2..6, query "hea"
//! "I : hea|"  -> no trigger (whitespace)
//! "at 10:3|"  -> no trigger (digit after trigger)
//! ```

use crate::core::language::is_query_letter;

/// Location of an active query. Positions are character offsets into the
/// line; `start` is the trigger character itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerSpan {
    pub start: usize,
    pub end: usize,
    pub query: String,
}

/// Find the active query ending at `cursor` (a character offset).
pub fn detect(line: &str, cursor: usize, trigger: char) -> Option<TriggerSpan> {
    let before: Vec<char> = line.chars().take(cursor).collect();
    if before.len() < cursor {
        return None;
    }

    let start = before.iter().rposition(|c| *c == trigger)?;
    let query: String = before[start + 1..].iter().collect();

    let first = query.chars().next()?;
    if !is_query_letter(first) || query.chars().any(char::is_whitespace) {
        return None;
    }

    Some(TriggerSpan {
        start,
        end: cursor,
        query,
    })
}
