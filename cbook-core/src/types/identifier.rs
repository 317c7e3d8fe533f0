//! Section and chapter identifiers

use crate::error::LoadError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of top-level sections of the book
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    Language,
    Projects,
    Practices,
    Environment,
}

impl SectionId {
    /// All sections, in table-of-contents order
    pub const ALL: [SectionId; 4] = [
        SectionId::Language,
        SectionId::Projects,
        SectionId::Practices,
        SectionId::Environment,
    ];

    /// Public identifier used in routes and cache keys
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionId::Language => "language",
            SectionId::Projects => "projects",
            SectionId::Practices => "practices",
            SectionId::Environment => "environment",
        }
    }

    /// Internal grouping key locating the section's content on disk
    pub fn group_key(&self) -> &'static str {
        match self {
            SectionId::Language => "core-language",
            SectionId::Projects => "projects",
            SectionId::Practices => "best-practices",
            SectionId::Environment => "dev-environment",
        }
    }

    /// Reverse lookup from a grouping key
    pub fn from_group_key(group_key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.group_key() == group_key)
    }

    /// Display title for navigation
    pub fn title(&self) -> &'static str {
        match self {
            SectionId::Language => "The C Language",
            SectionId::Projects => "Projects",
            SectionId::Practices => "Best Practices",
            SectionId::Environment => "Development Environment",
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionId {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| LoadError::SectionNotFound(s.to_string()))
    }
}

/// Identifier pair for one chapter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChapterId {
    section: String,
    chapter: String,
}

impl ChapterId {
    pub fn new(section: impl Into<String>, chapter: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            chapter: chapter.into(),
        }
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn chapter(&self) -> &str {
        &self.chapter
    }

    /// Cache key in the form `{section}/{chapter}`
    pub fn cache_key(&self) -> String {
        format!("{}/{}", self.section, self.chapter)
    }
}

impl fmt::Display for ChapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.section, self.chapter)
    }
}
