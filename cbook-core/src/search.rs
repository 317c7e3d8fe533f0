//! Full-text search over chapter titles, descriptions and prose

use crate::cache::ModuleCache;
use crate::error::LoadError;
use crate::loader::fetch_cached;
use crate::registry::ContentRegistry;
use crate::types::{ChapterContent, ChapterId};
use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;
use std::sync::{Arc, OnceLock};

const TITLE_WEIGHT: usize = 10;
const DESCRIPTION_WEIGHT: usize = 5;
const SNIPPET_RADIUS: usize = 40;

fn word_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\w+").expect("word pattern is valid"))
}

/// Lowercased search terms in `query`
pub fn tokenize(query: &str) -> Vec<String> {
    word_pattern()
        .find_iter(query)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// One ranked search result
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchHit {
    pub section: String,
    pub chapter: String,
    pub title: String,
    pub score: usize,
    pub snippet: Option<String>,
}

struct IndexedChapter {
    id: ChapterId,
    title: String,
    title_lower: String,
    description_lower: String,
    fragments: Vec<String>,
    fragments_lower: Vec<String>,
}

impl IndexedChapter {
    fn new(id: ChapterId, content: &ChapterContent) -> Self {
        let fragments: Vec<String> = content
            .blocks
            .iter()
            .flat_map(|b| b.text_fragments())
            .map(str::to_string)
            .collect();
        Self {
            title: content.title.clone(),
            title_lower: content.title.to_lowercase(),
            description_lower: content.description.to_lowercase(),
            fragments_lower: fragments.iter().map(|f| f.to_lowercase()).collect(),
            fragments,
            id,
        }
    }

    /// Score for `terms`, or `None` unless every term matches somewhere
    fn score(&self, terms: &[String]) -> Option<usize> {
        let mut total = 0;
        for term in terms {
            let mut score = 0;
            if self.title_lower.contains(term.as_str()) {
                score += TITLE_WEIGHT;
            }
            if self.description_lower.contains(term.as_str()) {
                score += DESCRIPTION_WEIGHT;
            }
            score += self
                .fragments_lower
                .iter()
                .map(|f| f.matches(term.as_str()).count())
                .sum::<usize>();
            if score == 0 {
                return None;
            }
            total += score;
        }
        Some(total)
    }

    /// Text around the first body occurrence of `term`
    fn snippet(&self, term: &str) -> Option<String> {
        let (fragment, lower) = self
            .fragments
            .iter()
            .zip(&self.fragments_lower)
            .find(|(_, lower)| lower.contains(term))?;

        // Lowercasing can change byte lengths outside ASCII; fall back to the
        // whole fragment when offsets do not line up.
        if fragment.len() != lower.len() {
            return Some(collapse_whitespace(fragment));
        }

        let at = lower.find(term)?;
        let start = floor_char_boundary(fragment, at.saturating_sub(SNIPPET_RADIUS));
        let end = ceil_char_boundary(fragment, at + term.len() + SNIPPET_RADIUS);

        let mut snippet = String::new();
        if start > 0 {
            snippet.push_str("...");
        }
        snippet.push_str(&collapse_whitespace(&fragment[start..end]));
        if end < fragment.len() {
            snippet.push_str("...");
        }
        Some(snippet)
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn floor_char_boundary(s: &str, mut i: usize) -> usize {
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_char_boundary(s: &str, i: usize) -> usize {
    let mut i = i.min(s.len());
    while !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

/// In-memory index over a set of chapters, kept in book order
pub struct SearchIndex {
    chapters: Vec<IndexedChapter>,
}

impl SearchIndex {
    /// Index chapters that are already loaded
    pub fn from_chapters<'a>(
        chapters: impl IntoIterator<Item = (ChapterId, &'a ChapterContent)>,
    ) -> Self {
        Self {
            chapters: chapters
                .into_iter()
                .map(|(id, content)| IndexedChapter::new(id, content))
                .collect(),
        }
    }

    /// Load every registered chapter through the cache and index it
    pub async fn build(registry: &ContentRegistry, cache: &ModuleCache) -> Result<Self, LoadError> {
        let mut loaded: Vec<(ChapterId, Arc<ChapterContent>)> = Vec::new();
        for id in registry.chapter_ids() {
            let content = fetch_cached(registry, cache, &id, &id.cache_key()).await?;
            loaded.push((id, content));
        }
        tracing::debug!(chapters = loaded.len(), "built search index");
        Ok(Self::from_chapters(
            loaded.iter().map(|(id, content)| (id.clone(), &**content)),
        ))
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Chapters matching every term of `query`, best first.
    ///
    /// Ties keep book order. An empty query matches nothing.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        let terms = tokenize(query);
        if terms.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(usize, usize)> = self
            .chapters
            .par_iter()
            .enumerate()
            .filter_map(|(i, chapter)| chapter.score(&terms).map(|score| (i, score)))
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        scored
            .into_iter()
            .map(|(i, score)| {
                let chapter = &self.chapters[i];
                SearchHit {
                    section: chapter.id.section().to_string(),
                    chapter: chapter.id.chapter().to_string(),
                    title: chapter.title.clone(),
                    score,
                    snippet: terms.iter().find_map(|t| chapter.snippet(t)),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContentBlock;

    fn index() -> SearchIndex {
        let pointers = ChapterContent::new("pointers-intro", "Introduction to Pointers")
            .with_description("Addresses and dereferencing")
            .with_blocks(vec![ContentBlock::prose(
                "A pointer holds an address. Taking the address of a variable uses &.",
            )]);
        let arrays = ChapterContent::new("arrays", "Arrays")
            .with_description("Contiguous storage")
            .with_blocks(vec![
                ContentBlock::prose("An array decays to a pointer to its first element."),
                ContentBlock::code("int pointer_like[3];"),
            ]);
        SearchIndex::from_chapters(vec![
            (ChapterId::new("language", "pointers-intro"), &pointers),
            (ChapterId::new("language", "arrays"), &arrays),
        ])
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("  Pointer, ARITHMETIC! "), vec!["pointer", "arithmetic"]);
        assert!(tokenize("?!").is_empty());
    }

    #[test]
    fn test_ranking() {
        let hits = index().search("pointer");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].chapter, "pointers-intro");
        assert_eq!(hits[0].score, 10 + 1);
        // Code is not indexed, only the prose mention counts
        assert_eq!(hits[1].score, 1);
    }

    #[test]
    fn test_all_terms_required() {
        let idx = index();
        assert_eq!(idx.search("pointer element").len(), 1);
        assert!(idx.search("pointer recursion").is_empty());
        assert!(idx.search("").is_empty());
    }

    #[test]
    fn test_snippet() {
        let hits = index().search("decays");
        let snippet = hits[0].snippet.as_deref().unwrap();
        assert!(snippet.contains("decays to a pointer"));
    }

    #[test]
    fn test_snippet_is_trimmed() {
        let long = format!("{} needle {}", "a ".repeat(100), "b ".repeat(100));
        let chapter = ChapterContent::new("x", "X").with_blocks(vec![ContentBlock::prose(long)]);
        let idx = SearchIndex::from_chapters(vec![(ChapterId::new("projects", "x"), &chapter)]);
        let snippet = idx.search("needle")[0].snippet.clone().unwrap();
        assert!(snippet.starts_with("..."));
        assert!(snippet.ends_with("..."));
        assert!(snippet.len() < 100);
    }

    #[tokio::test]
    async fn test_build_from_builtin() {
        let registry = ContentRegistry::builtin();
        let cache = ModuleCache::new();
        let idx = SearchIndex::build(&registry, &cache).await.unwrap();

        assert_eq!(idx.len(), registry.len());
        assert_eq!(cache.len().await, registry.len());

        let hits = idx.search("fork");
        assert_eq!(hits[0].chapter, "shell");
    }
}
