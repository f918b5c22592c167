//! Main entry point for the followcheck CLI application.
//!
//! Opens an export archive from the local filesystem or an HTTP URL,
//! locates the relationship entries and prints the comparison.

use anyhow::Result;
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use followcheck::{
    Analysis, Archive, Cli, Config, HttpRangeReader, LocalFileReader, LocatorPatterns, ReadAt, ZipArchive,
    analyze, locate,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(cli.log_level()).into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Configuration problems are fatal before any archive I/O happens
    let config = match &cli.config {
        Some(location) => Config::load(location).await?,
        None => Config::builtin()?,
    };
    let patterns = LocatorPatterns::from_config(&config)?;

    if cli.is_http_url() {
        let reader = Arc::new(HttpRangeReader::new(cli.file.clone()).await?);
        process_archive(reader.clone(), &patterns, &cli).await?;
        tracing::info!(bytes = reader.transferred_bytes(), "Remote archive transfer complete");
    } else {
        let reader = Arc::new(LocalFileReader::new(Path::new(&cli.file))?);
        process_archive(reader, &patterns, &cli).await?;
    }

    Ok(())
}

/// Run the listing or the full comparison against one archive.
async fn process_archive<R: ReadAt + 'static>(
    reader: Arc<R>,
    patterns: &LocatorPatterns,
    cli: &Cli,
) -> Result<()> {
    let archive = ZipArchive::open(reader).await?;

    if cli.list {
        let candidates = locate(archive.entry_paths(), patterns);
        print_section("Following entries", &candidates.following);
        print_section("Followers entries", &candidates.followers);
        return Ok(());
    }

    let analysis = analyze(&archive, patterns).await;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&analysis.partitions)?);
    } else {
        print_analysis(&analysis, cli.is_quiet());
    }

    Ok(())
}

fn print_analysis(analysis: &Analysis, quiet: bool) {
    let partitions = &analysis.partitions;
    print_section("Not following you back", &partitions.only_following);
    print_section("Mutual", &partitions.mutual);
    print_section("You don't follow back", &partitions.only_followers);

    if quiet {
        return;
    }
    if analysis.is_degraded() {
        eprintln!("Some entries were skipped:");
        for failure in analysis.following.failures().chain(analysis.followers.failures()) {
            eprintln!("  {}", failure);
        }
    }

    let skipped = analysis
        .following
        .failures()
        .chain(analysis.followers.failures())
        .count();
    eprintln!(
        "\n{} following, {} followers ({} entries parsed, {} skipped)",
        analysis.following.usernames().len(),
        analysis.followers.usernames().len(),
        analysis.following.outcomes().len() + analysis.followers.outcomes().len() - skipped,
        skipped
    );
}

fn print_section(title: &str, values: &[String]) {
    println!("{} ({}):", title, values.len());
    for value in values {
        println!("  {}", value);
    }
    println!();
}
