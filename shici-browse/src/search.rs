//! Keyword search, live filtering and dynasty filtering over loaded poems
//!
//! Scoring: +3 when the title contains the keyword, +2 when the author does,
//! +1 per non-overlapping occurrence in the joined paragraphs. Matching is
//! literal and case-insensitive. Zero-score poems are dropped and ties keep
//! library order.

use crate::models::Poem;
use shici_common::config::UntaggedPolicy;
use thiserror::Error;

/// Results shown by the single-page search variant
pub const TOP_RESULTS: usize = 10;

/// Characters of the first paragraph shown on a result card
pub const PREVIEW_CHARS: usize = 30;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SearchError {
    /// Rejected before searching; the message is the user-facing prompt
    #[error("请输入搜索关键词！")]
    EmptyKeyword,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredPoem<'a> {
    pub poem: &'a Poem,
    pub score: usize,
}

/// Score one poem against an already lowercased keyword
pub fn score_poem(poem: &Poem, keyword_lower: &str) -> usize {
    if keyword_lower.is_empty() {
        return 0;
    }

    let mut score = 0;
    if poem.title.to_lowercase().contains(keyword_lower) {
        score += 3;
    }
    if poem.author.to_lowercase().contains(keyword_lower) {
        score += 2;
    }
    score += poem.content().to_lowercase().matches(keyword_lower).count();
    score
}

/// Ranked matches for `keyword`, best first
pub fn search<'a>(poems: &'a [Poem], keyword: &str) -> Result<Vec<ScoredPoem<'a>>, SearchError> {
    let keyword = keyword.trim().to_lowercase();
    if keyword.is_empty() {
        return Err(SearchError::EmptyKeyword);
    }

    let mut results: Vec<ScoredPoem<'a>> = poems
        .iter()
        .map(|poem| ScoredPoem {
            poem,
            score: score_poem(poem, &keyword),
        })
        .filter(|scored| scored.score > 0)
        .collect();

    // sort_by is stable: equal scores stay in library order
    results.sort_by(|a, b| b.score.cmp(&a.score));
    Ok(results)
}

/// Filter-as-you-type: title, author or tags contain the keyword
///
/// An empty keyword shows everything.
pub fn live_filter<'a>(poems: &'a [Poem], keyword: &str) -> Vec<&'a Poem> {
    let keyword = keyword.trim().to_lowercase();
    if keyword.is_empty() {
        return poems.iter().collect();
    }

    poems
        .iter()
        .filter(|poem| {
            poem.title.to_lowercase().contains(&keyword)
                || poem.author.to_lowercase().contains(&keyword)
                || poem.tags.join(" ").to_lowercase().contains(&keyword)
        })
        .collect()
}

/// Poems whose author starts with `[tag]`
///
/// An empty or absent tag means no filtering. Authors without any bracketed
/// prefix are handled by `untagged`.
pub fn filter_by_dynasty<'a>(
    poems: &'a [Poem],
    tag: Option<&str>,
    untagged: UntaggedPolicy,
) -> Vec<&'a Poem> {
    let tag = tag.map(str::trim).unwrap_or_default();
    if tag.is_empty() {
        return poems.iter().collect();
    }

    let prefix = format!("[{}]", tag);
    poems
        .iter()
        .filter(|poem| {
            if poem.author.starts_with(&prefix) {
                return true;
            }
            untagged == UntaggedPolicy::Include && poem.dynasty().is_none()
        })
        .collect()
}

/// Distinct dynasty tags in first-seen order
pub fn dynasties(poems: &[Poem]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in poems.iter().filter_map(|p| p.dynasty()) {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Result card excerpt: start of the first paragraph
pub fn preview(poem: &Poem) -> String {
    match poem.paragraphs.first() {
        Some(first) => first.chars().take(PREVIEW_CHARS).collect(),
        None => "...".to_string(),
    }
}

/// First `lines` paragraphs, used by the carousel
pub fn excerpt(poem: &Poem, lines: usize) -> Vec<String> {
    poem.paragraphs.iter().take(lines).cloned().collect()
}
