//! Theme command implementation

use crate::app::App;
use anyhow::{Context, Result};
use cbook_core::preferences::{Preferences, Theme};

/// Show the current display preferences, or update them
pub async fn theme(
    app: &App,
    value: Option<&str>,
    font_scale: Option<f32>,
    line_numbers: Option<bool>,
) -> Result<()> {
    let mut prefs = Preferences::load(app.data.as_ref()).await;

    if value.is_none() && font_scale.is_none() && line_numbers.is_none() {
        println!("Theme: {}", prefs.theme);
        println!("Font scale: {:.2}", prefs.font_scale);
        println!(
            "Line numbers: {}",
            if prefs.show_line_numbers { "on" } else { "off" }
        );
        return Ok(());
    }

    if let Some(value) = value {
        prefs.theme = value.parse::<Theme>()?;
        println!("Theme set to {}", prefs.theme);
    }
    if let Some(scale) = font_scale {
        prefs.set_font_scale(scale);
        println!("Font scale set to {:.2}", prefs.font_scale);
    }
    if let Some(on) = line_numbers {
        prefs.show_line_numbers = on;
        println!("Line numbers {}", if on { "on" } else { "off" });
    }

    prefs
        .save(app.data.as_ref())
        .await
        .context("Failed to save preferences")?;

    Ok(())
}
