//! Catalog download example
//!
//! This example demonstrates the core functionality of sticker-dl:
//! - Choosing a source
//! - Listing its categories
//! - Selecting categories by title
//! - Following progress through events
//! - Reporting the success/failure tally
//!
//! ```bash
//! # List Teams categories
//! cargo run --example download_catalog -- teams
//!
//! # Download two Flipgrid categories
//! RUST_LOG=sticker_dl=debug cargo run --example download_catalog -- flipgrid Emojis People
//!
//! # Use a JSON config file
//! cargo run --example download_catalog -- --config sticker-dl.json teams Smilies
//! ```

use std::path::PathBuf;

use sticker_dl::{Config, Event, SelectByTitle, SourceKind, StickerDownloader};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sticker_dl=info")),
        )
        .init();

    let mut args = std::env::args().skip(1).peekable();

    let config = if args.peek().map(String::as_str) == Some("--config") {
        args.next();
        let path = PathBuf::from(args.next().ok_or("--config needs a path")?);
        Config::from_json_file(&path)?
    } else {
        Config::default()
    };

    let kind: SourceKind = args
        .next()
        .ok_or("usage: download_catalog [--config FILE] <flipgrid|teams> [CATEGORY...]")?
        .parse()?;
    let titles: Vec<String> = args.collect();

    let downloader = StickerDownloader::new(config, kind)?;

    if titles.is_empty() {
        for category in downloader.get_categories().await? {
            println!(
                "{:>6}  {} ({} items)",
                category.id.as_str(),
                category.title,
                category.declared_count
            );
        }
        return Ok(());
    }

    let mut events = downloader.subscribe();
    let progress = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                Event::CategoryStarted { category, tasks } => {
                    println!("⬇ {category}: {tasks} assets");
                }
                Event::CategoryFinished {
                    category,
                    saved,
                    failed,
                } => {
                    println!("✓ {category}: {saved} saved, {failed} failed");
                }
                Event::CategoryFailed { category, error } => {
                    println!("✗ {category}: {error}");
                }
                _ => {}
            }
        }
    });

    let summary = downloader.run(&SelectByTitle::new(&titles)).await?;
    drop(downloader);
    progress.await.ok();

    println!(
        "\n{} assets saved, {} failed",
        summary.success_count(),
        summary.failure_count()
    );
    for failure in &summary.failures {
        println!("  {} ({})", failure.url, failure.cause);
    }
    for failure in &summary.failed_categories {
        println!("  category {}: {}", failure.category, failure.reason);
    }

    Ok(())
}
