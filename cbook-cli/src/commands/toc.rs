//! Toc command implementation

use crate::app::App;
use anyhow::Result;
use cbook_core::toc::{build_toc, render_outline};

/// Print a chapter's table of contents
pub async fn toc(app: &App, section: &str, chapter: &str, json: bool) -> Result<()> {
    let content = app.load(section, chapter).await?;
    let entries = build_toc(&content);

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else if entries.is_empty() {
        println!("{} has no headings", content.title);
    } else {
        println!("{}", render_outline(&entries));
    }

    Ok(())
}
