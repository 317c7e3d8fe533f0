//! Progress and complete command implementations

use crate::app::App;
use anyhow::{Context, Result};
use cbook_core::progress::ProgressStore;
use cbook_core::ChapterId;

/// Show completion per section
pub async fn progress(app: &App) -> Result<()> {
    let store = ProgressStore::load(app.data.clone()).await;

    for section in app.registry.sections() {
        let chapters = app.registry.chapters(section);
        let (completed, total) = store.section_completion(section, &chapters);
        println!("{:<24} {}/{}", section.title(), completed, total);
    }

    if let Some(last) = store.last_read() {
        println!("Last read: {}", last);
    }

    Ok(())
}

/// Mark a chapter as completed
pub async fn complete(app: &App, section: &str, chapter: &str) -> Result<()> {
    // Resolve first so typos are reported instead of recorded
    let content = app.load(section, chapter).await?;

    let mut store = ProgressStore::load(app.data.clone()).await;
    store
        .mark_completed(&ChapterId::new(section, chapter))
        .await
        .context("Failed to save reading progress")?;

    println!("Completed: {}", content.title);
    Ok(())
}
