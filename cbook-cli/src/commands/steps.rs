//! Steps command implementation

use crate::app::App;
use anyhow::Result;
use cbook_core::animation::{AnimationStepper, Playback};
use cbook_core::CodeStep;
use std::time::Duration;

fn describe(position: usize, steps: &[CodeStep]) -> String {
    let step = &steps[position];
    let lines: Vec<String> = step.lines.iter().map(u32::to_string).collect();
    format!(
        "Step {}/{} (lines {}): {}",
        position + 1,
        steps.len(),
        lines.join(", "),
        step.explanation
    )
}

/// Walk through every stepped listing of a chapter
pub async fn steps(app: &App, section: &str, chapter: &str, delay_ms: u64) -> Result<()> {
    let content = app.load(section, chapter).await?;
    let listings: Vec<&[CodeStep]> = content
        .blocks
        .iter()
        .map(|block| block.steps())
        .filter(|steps| !steps.is_empty())
        .collect();

    if listings.is_empty() {
        println!("{} has no stepped listings", content.title);
        return Ok(());
    }

    for (i, steps) in listings.into_iter().enumerate() {
        println!("Listing {}", i + 1);

        if delay_ms == 0 || steps.len() == 1 {
            let mut stepper = AnimationStepper::new(steps.len());
            loop {
                if let Some(position) = stepper.current() {
                    println!("  {}", describe(position, steps));
                }
                if !stepper.next() {
                    break;
                }
            }
            continue;
        }

        let playback = Playback::new(AnimationStepper::new(steps.len()));
        let mut rx = playback.subscribe();
        println!("  {}", describe(0, steps));

        let play = playback.play(Duration::from_millis(delay_ms));
        let print = async {
            while rx.changed().await.is_ok() {
                let stepper = *rx.borrow_and_update();
                if let Some(position) = stepper.current() {
                    println!("  {}", describe(position, steps));
                }
                if stepper.is_last() {
                    break;
                }
            }
        };
        tokio::join!(play, print);
    }

    Ok(())
}
