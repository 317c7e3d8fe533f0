//! Search command implementation

use crate::app::App;
use anyhow::{Context, Result};
use cbook_core::search::SearchIndex;

/// Search every chapter for `query`
pub async fn search(app: &App, query: &str, json: bool) -> Result<()> {
    let index = SearchIndex::build(&app.registry, &app.cache)
        .await
        .context("Failed to build search index")?;
    let hits = index.search(query);

    if json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }

    if hits.is_empty() {
        println!("No results for '{}'", query);
        return Ok(());
    }

    for hit in &hits {
        println!("{}/{}  {} (score {})", hit.section, hit.chapter, hit.title, hit.score);
        if let Some(snippet) = &hit.snippet {
            println!("    {}", snippet);
        }
    }

    Ok(())
}
