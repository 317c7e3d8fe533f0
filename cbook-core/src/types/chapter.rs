//! The loaded document for one chapter

use super::ContentBlock;
use serde::{Deserialize, Serialize};

/// A single chapter's content module.
///
/// The loader treats this as an opaque payload; only the reader features
/// (TOC, search, playback) look inside `blocks`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChapterContent {
    /// Chapter slug, unique within its section
    pub id: String,

    /// Chapter title
    pub title: String,

    /// One-line summary
    #[serde(default)]
    pub description: String,

    /// The content blocks, in reading order
    #[serde(default)]
    pub blocks: Vec<ContentBlock>,
}

impl ChapterContent {
    /// Create a new, empty chapter
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            blocks: Vec::new(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Replace the content blocks
    pub fn with_blocks(mut self, blocks: Vec<ContentBlock>) -> Self {
        self.blocks = blocks;
        self
    }

    /// Parse a chapter from its JSON representation
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapter_from_json() {
        let json = r#"{
            "id": "loops",
            "title": "Loops",
            "blocks": [{"type": "prose", "value": {"text": "for, while, do"}}]
        }"#;
        let chapter = ChapterContent::from_json(json).unwrap();
        assert_eq!(chapter.id, "loops");
        assert_eq!(chapter.description, "");
        assert_eq!(chapter.blocks.len(), 1);
    }
}
