//! Client-side fuzzy title search.
//!
//! A title matches when some substring of it is within a small edit
//! distance of the query, relative to the query length. Where the match
//! occurs in the title does not matter. Matches are ranked by that
//! normalised distance first, then by a skim/fzf-like relevance score so
//! that tighter, earlier hits win ties.

use std::cmp::Ordering;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// Largest normalised distance (errors / query length) still counted as a
/// match. 0.0 is an exact substring hit, 1.0 matches anything.
pub const FUZZY_THRESHOLD: f64 = 0.35;

/// A search hit: index into the searched slice plus its scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit {
    pub index: usize,
    /// Normalised distance in `0.0..=1.0`; lower is better.
    pub score: f64,
    /// Skim relevance; higher is better. Zero when skim finds no
    /// subsequence match (typo hits).
    pub relevance: i64,
}

/// Fuzzy matcher with a fixed threshold.
pub struct TitleMatcher {
    threshold: f64,
    skim: SkimMatcherV2,
}

impl Default for TitleMatcher {
    fn default() -> Self {
        Self::with_threshold(FUZZY_THRESHOLD)
    }
}

impl TitleMatcher {
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            skim: SkimMatcherV2::default().ignore_case(),
        }
    }

    /// Normalised distance of `query` against `title`, or `None` if it is
    /// above the threshold. An empty query never matches.
    pub fn score(&self, title: &str, query: &str) -> Option<f64> {
        let query: Vec<char> = query.trim().to_lowercase().chars().collect();
        if query.is_empty() {
            return None;
        }
        let title: Vec<char> = title.to_lowercase().chars().collect();
        let errors = substring_distance(&query, &title);
        let score = errors as f64 / query.len() as f64;
        (score <= self.threshold).then_some(score)
    }

    /// Match every title against `query` and return the hits in relevance
    /// order. Ties keep the input order.
    pub fn rank<'a, I>(&self, titles: I, query: &str) -> Vec<SearchHit>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let query = query.trim();
        let mut hits: Vec<SearchHit> = titles
            .into_iter()
            .enumerate()
            .filter_map(|(index, title)| {
                let score = self.score(title, query)?;
                let relevance = self.skim.fuzzy_match(title, query).unwrap_or(0);
                Some(SearchHit {
                    index,
                    score,
                    relevance,
                })
            })
            .collect();

        hits.sort_by(|a, b| {
            a.score
                .partial_cmp(&b.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.relevance.cmp(&a.relevance))
                .then_with(|| a.index.cmp(&b.index))
        });
        hits
    }
}

/// Minimum edit distance between `pattern` and any substring of `text`.
///
/// Standard Levenshtein DP with a free start position in `text` (first row
/// all zeros) and a free end position (minimum over the last row).
fn substring_distance(pattern: &[char], text: &[char]) -> usize {
    if pattern.is_empty() {
        return 0;
    }
    // column[i] = distance of pattern[..i] ending at the current text position
    let mut column: Vec<usize> = (0..=pattern.len()).collect();
    let mut best = column[pattern.len()];

    for &t in text {
        let mut diagonal = column[0];
        column[0] = 0;
        for (i, &p) in pattern.iter().enumerate() {
            let substitution = diagonal + usize::from(p != t);
            let insertion = column[i + 1] + 1;
            let deletion = column[i] + 1;
            diagonal = column[i + 1];
            column[i + 1] = substitution.min(insertion).min(deletion);
        }
        best = best.min(column[pattern.len()]);
    }
    best
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
