//! # Quill - A Small Tabbed Text Editor
//!
//! Opens each file given on the command line in its own tab, or a blank
//! document when none are given.
//!
//! ```bash
//! # Run the editor
//! cargo run
//!
//! # Run with files
//! cargo run -- notes.txt src/main.rs
//! ```

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quill_core::{Editor, OpenRequests};

/// Quill - a small tabbed text editor for the terminal
#[derive(Parser, Debug)]
#[command(name = "quill")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Files to open, one tab each
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    // The UI owns stdout, so logs go to a file in the temp directory.
    let appender = tracing_appender::rolling::never(std::env::temp_dir(), "quill.log");
    let (writer, _guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false)
                .with_level(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    tracing::info!("Starting Quill v{}", env!("CARGO_PKG_VERSION"));

    // Queue every argument before the frontend starts; the startup pass
    // opens them in order and falls back to a blank document.
    let editor = Editor::new();
    let requests = OpenRequests::new();
    for path in args.files {
        requests.push(path);
    }

    quill_tui::run(editor, requests)?;

    Ok(())
}
