//! Chapter outline built from prose headings

use serde::{Deserialize, Serialize};

/// One heading in a chapter outline, with the headings nested under it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TocEntry {
    pub title: String,

    /// In-page anchor, without the leading `#`
    pub href: String,

    /// Markdown heading level, 1 through 6
    pub level: u32,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TocEntry>,
}

impl TocEntry {
    pub fn new(title: impl Into<String>, href: impl Into<String>, level: u32) -> Self {
        Self {
            title: title.into(),
            href: href.into(),
            level,
            children: Vec::new(),
        }
    }

    /// Append `entry` to an outline in document order.
    ///
    /// It lands under the deepest trailing entry with a shallower level, so a
    /// skipped level (`##` then `####`) still nests one step down.
    pub fn nest(outline: &mut Vec<TocEntry>, entry: TocEntry) {
        match outline.last_mut() {
            Some(last) if last.level < entry.level => Self::nest(&mut last.children, entry),
            _ => outline.push(entry),
        }
    }

    /// Number of entries in this subtree, including self
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(TocEntry::count).sum::<usize>()
    }

    /// Depth-first walk yielding each entry with its nesting depth
    pub fn walk<'a>(outline: &'a [TocEntry]) -> Vec<(usize, &'a TocEntry)> {
        fn visit<'a>(entries: &'a [TocEntry], depth: usize, out: &mut Vec<(usize, &'a TocEntry)>) {
            for entry in entries {
                out.push((depth, entry));
                visit(&entry.children, depth + 1, out);
            }
        }

        let mut out = Vec::new();
        visit(outline, 0, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skipped_level_nests_once() {
        let mut outline = Vec::new();
        TocEntry::nest(&mut outline, TocEntry::new("Loops", "loops", 2));
        TocEntry::nest(&mut outline, TocEntry::new("Off by one", "off-by-one", 4));
        TocEntry::nest(&mut outline, TocEntry::new("Recursion", "recursion", 2));

        assert_eq!(outline.len(), 2);
        assert_eq!(outline[0].children[0].href, "off-by-one");
        let depths: Vec<_> = TocEntry::walk(&outline)
            .into_iter()
            .map(|(depth, e)| (depth, e.href.as_str()))
            .collect();
        assert_eq!(depths, vec![(0, "loops"), (1, "off-by-one"), (0, "recursion")]);
    }

    #[test]
    fn test_leaf_children_omitted_from_json() {
        let json = serde_json::to_value(TocEntry::new("NULL", "null", 3)).unwrap();
        assert!(json.get("children").is_none());
        let back: TocEntry = serde_json::from_value(json).unwrap();
        assert!(back.children.is_empty());
    }
}
