//! Sections command implementation

use crate::app::App;
use anyhow::Result;
use serde::Serialize;

#[derive(Serialize)]
struct SectionInfo {
    id: &'static str,
    title: &'static str,
    chapters: Vec<String>,
}

/// List sections and their chapters
pub async fn sections(app: &App, json: bool) -> Result<()> {
    let sections: Vec<SectionInfo> = app
        .registry
        .sections()
        .into_iter()
        .map(|section| SectionInfo {
            id: section.as_str(),
            title: section.title(),
            chapters: app
                .registry
                .chapters(section)
                .into_iter()
                .map(str::to_string)
                .collect(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&sections)?);
    } else {
        for section in &sections {
            println!("{} ({})", section.title, section.id);
            for chapter in &section.chapters {
                println!("  {}", chapter);
            }
        }
    }

    Ok(())
}
