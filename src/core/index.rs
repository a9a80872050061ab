//! Per-language substring index over dictionary keywords.
//!
//! Matching is case-insensitive contiguous containment. Queries of three or
//! more characters are first narrowed with a character-trigram posting list
//! and then verified with a plain substring test; shorter queries scan the
//! lowered keywords directly.

use std::collections::HashMap;

use super::dictionary::KeywordEntry;
use super::language::Language;

type Trigram = [char; 3];

/// How a keyword matched a query. Declaration order is result order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum MatchTier {
    Exact,
    Prefix,
    Infix,
}

/// Read-only index of one language's dictionary.
#[derive(Debug, Clone)]
pub struct LanguageIndex {
    language: Language,
    entries: Vec<KeywordEntry>,
    /// Lowercase form of each entry's keyword, same positions as `entries`.
    lowered: Vec<String>,
    /// Trigram -> ascending entry positions containing it.
    trigrams: HashMap<Trigram, Vec<u32>>,
}

fn trigrams(chars: &[char]) -> impl Iterator<Item = Trigram> + '_ {
    chars.windows(3).map(|w| [w[0], w[1], w[2]])
}

fn intersect_sorted(a: &[u32], b: &[u32]) -> Vec<u32> {
    let (mut i, mut j) = (0, 0);
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

impl LanguageIndex {
    /// Build the index. Entry order is kept as given.
    pub fn build(language: Language, entries: Vec<KeywordEntry>) -> Self {
        let lowered: Vec<String> = entries.iter().map(|e| e.keyword.to_lowercase()).collect();

        let mut postings: HashMap<Trigram, Vec<u32>> = HashMap::new();
        for (pos, keyword) in lowered.iter().enumerate() {
            let pos = pos as u32;
            let chars: Vec<char> = keyword.chars().collect();
            for tri in trigrams(&chars) {
                let list = postings.entry(tri).or_default();
                // Positions arrive in ascending order, so only the tail can repeat.
                if list.last() != Some(&pos) {
                    list.push(pos);
                }
            }
        }

        Self {
            language,
            entries,
            lowered,
            trigrams: postings,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn entries(&self) -> &[KeywordEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Positions that may contain `query` (already lowercased).
    fn candidates(&self, query: &[char]) -> Vec<u32> {
        if query.len() < 3 {
            return (0..self.entries.len() as u32).collect();
        }

        let mut lists: Vec<&Vec<u32>> = Vec::new();
        for tri in trigrams(query) {
            match self.trigrams.get(&tri) {
                Some(list) => lists.push(list),
                None => return Vec::new(),
            }
        }
        lists.sort_by_key(|l| l.len());

        let mut iter = lists.into_iter();
        let Some(first) = iter.next() else {
            return Vec::new();
        };
        let mut acc = first.clone();
        for list in iter {
            if acc.is_empty() {
                break;
            }
            acc = intersect_sorted(&acc, list);
        }
        acc
    }

    /// Every entry whose keyword contains `query`, ignoring case.
    ///
    /// Exact keyword matches come first, then prefix matches, then infix
    /// matches; dictionary order is kept inside each group. An empty query
    /// matches nothing.
    pub fn find(&self, query: &str) -> Vec<&KeywordEntry> {
        let query = query.to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        let query_chars: Vec<char> = query.chars().collect();

        let mut hits: Vec<(MatchTier, u32)> = self
            .candidates(&query_chars)
            .into_iter()
            .filter_map(|pos| {
                let keyword = &self.lowered[pos as usize];
                let tier = if *keyword == query {
                    MatchTier::Exact
                } else if keyword.starts_with(&query) {
                    MatchTier::Prefix
                } else if keyword.contains(&query) {
                    MatchTier::Infix
                } else {
                    return None;
                };
                Some((tier, pos))
            })
            .collect();

        hits.sort();
        hits.into_iter()
            .map(|(_, pos)| &self.entries[pos as usize])
            .collect()
    }
}
