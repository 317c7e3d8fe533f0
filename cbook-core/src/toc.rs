//! Table of contents extraction and active-heading tracking
//!
//! Headings come from the markdown in prose blocks. Anchors are GitHub-style
//! slugs, made unique within a chapter by appending `-1`, `-2`, ...

use crate::types::{ChapterContent, ContentBlock, TocEntry};
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use std::collections::HashMap;

/// A heading found in a chapter, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub title: String,
    pub anchor: String,
    pub level: u32,
}

/// Generate a GitHub-style slug from heading text
pub fn slugify(text: &str) -> String {
    text.chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() {
                Some(c.to_ascii_lowercase())
            } else if c.is_whitespace() || c == '-' || c == '_' {
                Some('-')
            } else {
                None
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

fn heading_level(level: HeadingLevel) -> u32 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Collect every heading in the chapter's prose blocks
pub fn extract_headings(chapter: &ChapterContent) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for block in &chapter.blocks {
        let ContentBlock::Prose { text } = block else {
            continue;
        };

        // (level, explicit id, accumulated text) of the heading being read
        let mut current: Option<(u32, Option<String>, String)> = None;

        for event in Parser::new_ext(text, Options::ENABLE_HEADING_ATTRIBUTES) {
            match event {
                Event::Start(Tag::Heading { level, id, .. }) => {
                    current = Some((heading_level(level), id.map(|id| id.to_string()), String::new()));
                }
                Event::Text(t) | Event::Code(t) => {
                    if let Some((_, _, title)) = current.as_mut() {
                        title.push_str(&t);
                    }
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some((level, id, title)) = current.take() {
                        let title = title.trim().to_string();
                        let base = id.unwrap_or_else(|| slugify(&title));
                        let count = seen.entry(base.clone()).or_insert(0);
                        let anchor = if *count == 0 {
                            base
                        } else {
                            format!("{}-{}", base, count)
                        };
                        *count += 1;
                        headings.push(Heading {
                            title,
                            anchor,
                            level,
                        });
                    }
                }
                _ => {}
            }
        }
    }

    headings
}

/// Build a nested table of contents from the chapter's headings
pub fn build_toc(chapter: &ChapterContent) -> Vec<TocEntry> {
    let mut outline = Vec::new();
    for heading in extract_headings(chapter) {
        TocEntry::nest(
            &mut outline,
            TocEntry::new(heading.title, heading.anchor, heading.level),
        );
    }
    outline
}

/// Render a TOC as an indented plain-text outline
pub fn render_outline(entries: &[TocEntry]) -> String {
    TocEntry::walk(entries)
        .into_iter()
        .map(|(depth, entry)| format!("{}{} (#{})", "  ".repeat(depth), entry.title, entry.href))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Tracks which heading is in view as the reader scrolls
#[derive(Debug, Clone)]
pub struct HeadingTracker {
    /// (anchor, vertical offset) sorted by offset
    headings: Vec<(String, f64)>,
    /// Distance below the viewport top at which a heading counts as reached
    margin: f64,
}

impl HeadingTracker {
    pub fn new(headings: impl IntoIterator<Item = (String, f64)>, margin: f64) -> Self {
        let mut headings: Vec<_> = headings.into_iter().collect();
        headings.sort_by(|a, b| a.1.total_cmp(&b.1));
        Self { headings, margin }
    }

    /// Anchor of the last heading at or above `scroll_top + margin`
    pub fn active(&self, scroll_top: f64) -> Option<&str> {
        let line = scroll_top + self.margin;
        let reached = self.headings.partition_point(|(_, offset)| *offset <= line);
        reached
            .checked_sub(1)
            .map(|i| self.headings[i].0.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.headings.is_empty()
    }
}
