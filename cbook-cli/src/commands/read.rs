//! Read command implementation

use crate::app::App;
use anyhow::Result;
use cbook_core::preferences::Preferences;
use cbook_core::progress::ProgressStore;
use cbook_core::{ChapterContent, ChapterId, ContentBlock, NoteKind};

/// Print a chapter and record that it was read
pub async fn read(app: &App, section: &str, chapter: &str, json: bool) -> Result<()> {
    let content = app.load(section, chapter).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&*content)?);
    } else {
        let prefs = Preferences::load(app.data.as_ref()).await;
        print!("{}", render(&content, prefs.show_line_numbers));
    }

    let mut progress = ProgressStore::load(app.data.clone()).await;
    if let Err(e) = progress.mark_read(&ChapterId::new(section, chapter)).await {
        tracing::warn!("Failed to save reading progress: {}", e);
    }

    Ok(())
}

/// Plain-text rendering of a chapter
fn render(content: &ChapterContent, line_numbers: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {}\n", content.title));
    if !content.description.is_empty() {
        out.push_str(&format!("{}\n", content.description));
    }

    for block in &content.blocks {
        out.push('\n');
        match block {
            ContentBlock::Prose { text } => {
                out.push_str(text);
                out.push('\n');
            }
            ContentBlock::Code { code, caption, .. } => {
                if let Some(caption) = caption {
                    out.push_str(&format!("{}:\n", caption));
                }
                out.push_str(&listing(code, line_numbers));
            }
            ContentBlock::Output { text } => {
                for line in text.lines() {
                    out.push_str(&format!("  > {}\n", line));
                }
            }
            ContentBlock::Note { kind, text } => {
                let label = match kind {
                    NoteKind::Info => "NOTE",
                    NoteKind::Tip => "TIP",
                    NoteKind::Warning => "WARNING",
                };
                out.push_str(&format!("[{}] {}\n", label, text));
            }
            ContentBlock::Diagram { name, caption } => {
                out.push_str(&format!("[diagram: {}]", name));
                if let Some(caption) = caption {
                    out.push_str(&format!(" {}", caption));
                }
                out.push('\n');
            }
            ContentBlock::Quiz {
                question, options, ..
            } => {
                out.push_str(&format!("Quiz: {}\n", question));
                for (i, option) in options.iter().enumerate() {
                    out.push_str(&format!("  {}) {}\n", i + 1, option));
                }
            }
            ContentBlock::Exercise { prompt, hint, .. } => {
                out.push_str(&format!("Exercise: {}\n", prompt));
                if let Some(hint) = hint {
                    out.push_str(&format!("  Hint: {}\n", hint));
                }
            }
            ContentBlock::CodeDiff {
                before,
                after,
                caption,
                ..
            } => {
                if let Some(caption) = caption {
                    out.push_str(&format!("{}:\n", caption));
                }
                out.push_str("Before:\n");
                out.push_str(&listing(before, line_numbers));
                out.push_str("After:\n");
                out.push_str(&listing(after, line_numbers));
            }
        }
    }

    out
}

fn listing(code: &str, line_numbers: bool) -> String {
    code.lines()
        .enumerate()
        .map(|(i, line)| {
            if line_numbers {
                format!("  {:>3} | {}\n", i + 1, line)
            } else {
                format!("    {}\n", line)
            }
        })
        .collect()
}
