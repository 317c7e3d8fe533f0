//! cbook - terminal reader for the C book

mod app;
mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cbook")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Read chapters from this directory instead of the bundled content
    #[arg(long, global = true)]
    content_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List sections and their chapters
    Sections {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Read a chapter
    Read {
        /// Section id (language, projects, practices, environment)
        section: String,

        /// Chapter id within the section
        chapter: String,

        /// Output the chapter document as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a chapter's table of contents
    Toc {
        section: String,
        chapter: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search all chapters
    Search {
        /// Search terms
        query: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show reading progress per section
    Progress,

    /// Mark a chapter as completed
    Complete { section: String, chapter: String },

    /// Show or set display preferences
    Theme {
        /// New theme (light, dark, system)
        value: Option<String>,

        /// Text size multiplier, clamped to 0.75..=2.0
        #[arg(long)]
        font_scale: Option<f32>,

        /// Number the lines of code listings
        #[arg(long)]
        line_numbers: Option<bool>,
    },

    /// Walk through the stepped code listings of a chapter
    Steps {
        section: String,
        chapter: String,

        /// Delay between steps in milliseconds (0 prints all steps at once)
        #[arg(long, default_value = "0")]
        delay_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "cbook_cli=debug,cbook_core=debug"
    } else {
        "cbook_cli=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let app = app::App::new(cli.content_dir.as_deref()).await?;

    match cli.command {
        Commands::Sections { json } => commands::sections(&app, json).await,

        Commands::Read {
            section,
            chapter,
            json,
        } => commands::read(&app, &section, &chapter, json).await,

        Commands::Toc {
            section,
            chapter,
            json,
        } => commands::toc(&app, &section, &chapter, json).await,

        Commands::Search { query, json } => commands::search(&app, &query, json).await,

        Commands::Progress => commands::progress(&app).await,

        Commands::Complete { section, chapter } => {
            commands::complete(&app, &section, &chapter).await
        }

        Commands::Theme {
            value,
            font_scale,
            line_numbers,
        } => commands::theme(&app, value.as_deref(), font_scale, line_numbers).await,

        Commands::Steps {
            section,
            chapter,
            delay_ms,
        } => commands::steps(&app, &section, &chapter, delay_ms).await,
    }
}
