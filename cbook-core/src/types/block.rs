//! Content blocks that make up a chapter

use serde::{Deserialize, Serialize};

/// Block-level content element
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Markdown prose
    Prose { text: String },

    /// C source listing, optionally with playback steps
    Code {
        code: String,
        #[serde(default)]
        lang: Option<String>,
        #[serde(default)]
        caption: Option<String>,
        #[serde(default)]
        steps: Vec<CodeStep>,
    },

    /// Program output shown after a listing
    Output { text: String },

    /// Callout box
    Note {
        #[serde(default)]
        kind: NoteKind,
        text: String,
    },

    /// Reference to a diagram component rendered by the host
    Diagram {
        name: String,
        #[serde(default)]
        caption: Option<String>,
    },

    /// Multiple choice question
    Quiz {
        question: String,
        options: Vec<String>,
        answer: usize,
        #[serde(default)]
        explanation: Option<String>,
    },

    /// Hands-on exercise
    Exercise {
        prompt: String,
        #[serde(default)]
        hint: Option<String>,
        #[serde(default)]
        solution: Option<String>,
    },

    /// Before/after comparison of two listings
    CodeDiff {
        before: String,
        after: String,
        #[serde(default)]
        lang: Option<String>,
        #[serde(default)]
        caption: Option<String>,
    },
}

/// Flavor of a note callout
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    #[default]
    Info,
    Tip,
    Warning,
}

/// One step of a code playback: the lines to highlight and what to say about them
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CodeStep {
    /// 1-based line numbers highlighted during this step
    pub lines: Vec<u32>,

    /// Explanation shown alongside the highlighted lines
    pub explanation: String,
}

impl CodeStep {
    pub fn new(lines: Vec<u32>, explanation: impl Into<String>) -> Self {
        Self {
            lines,
            explanation: explanation.into(),
        }
    }
}

impl ContentBlock {
    /// Create a prose block
    pub fn prose(text: impl Into<String>) -> Self {
        ContentBlock::Prose { text: text.into() }
    }

    /// Create a plain C code block
    pub fn code(code: impl Into<String>) -> Self {
        ContentBlock::Code {
            code: code.into(),
            lang: Some("c".to_string()),
            caption: None,
            steps: Vec::new(),
        }
    }

    /// Create a note block
    pub fn note(kind: NoteKind, text: impl Into<String>) -> Self {
        ContentBlock::Note {
            kind,
            text: text.into(),
        }
    }

    /// Short name of the block kind, as it appears in the JSON tag
    pub fn kind(&self) -> &'static str {
        match self {
            ContentBlock::Prose { .. } => "prose",
            ContentBlock::Code { .. } => "code",
            ContentBlock::Output { .. } => "output",
            ContentBlock::Note { .. } => "note",
            ContentBlock::Diagram { .. } => "diagram",
            ContentBlock::Quiz { .. } => "quiz",
            ContentBlock::Exercise { .. } => "exercise",
            ContentBlock::CodeDiff { .. } => "code_diff",
        }
    }

    /// Human-readable text carried by the block, used for search.
    ///
    /// Source code is deliberately excluded; captions are not.
    pub fn text_fragments(&self) -> Vec<&str> {
        match self {
            ContentBlock::Prose { text } | ContentBlock::Note { text, .. } => {
                vec![text.as_str()]
            }
            ContentBlock::Output { .. } => Vec::new(),
            ContentBlock::Code { caption, steps, .. } => caption
                .iter()
                .map(String::as_str)
                .chain(steps.iter().map(|s| s.explanation.as_str()))
                .collect(),
            ContentBlock::Diagram { caption, .. } | ContentBlock::CodeDiff { caption, .. } => {
                caption.iter().map(String::as_str).collect()
            }
            ContentBlock::Quiz {
                question,
                options,
                explanation,
                ..
            } => std::iter::once(question.as_str())
                .chain(options.iter().map(String::as_str))
                .chain(explanation.iter().map(String::as_str))
                .collect(),
            ContentBlock::Exercise { prompt, hint, .. } => std::iter::once(prompt.as_str())
                .chain(hint.iter().map(String::as_str))
                .collect(),
        }
    }

    /// Playback steps, if this is a stepped code listing
    pub fn steps(&self) -> &[CodeStep] {
        match self {
            ContentBlock::Code { steps, .. } => steps,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_json_shape() {
        let block = ContentBlock::prose("Hello");
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["type"], "prose");
        assert_eq!(json["value"]["text"], "Hello");
    }

    #[test]
    fn test_code_diff_tag() {
        let json = r#"{"type":"code_diff","value":{"before":"a","after":"b"}}"#;
        let block: ContentBlock = serde_json::from_str(json).unwrap();
        assert_eq!(block.kind(), "code_diff");
    }

    #[test]
    fn test_text_fragments_skip_code() {
        let block = ContentBlock::Code {
            code: "int main(void) { return 0; }".into(),
            lang: Some("c".into()),
            caption: Some("Smallest program".into()),
            steps: vec![CodeStep::new(vec![1], "Entry point")],
        };
        assert_eq!(block.text_fragments(), vec!["Smallest program", "Entry point"]);
        assert_eq!(block.steps().len(), 1);
    }

    #[test]
    fn test_quiz_fragments() {
        let block = ContentBlock::Quiz {
            question: "Size of char?".into(),
            options: vec!["1".into(), "2".into()],
            answer: 0,
            explanation: None,
        };
        assert_eq!(block.text_fragments(), vec!["Size of char?", "1", "2"]);
    }
}
