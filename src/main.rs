// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (tracing, filtered by RUST_LOG)
// 2. Parse command-line arguments and build the validated configuration
// 3. Run the crawl, timed by the profiler
// 4. Print or save the result and the profile data
// 5. Exit with proper code (0 = success, 2 = error)
// =============================================================================

mod cli;
mod clock;
mod config;
mod crawl;
mod error;
mod parser;
mod profiler;
mod result;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, CrawlArgs};
use clock::{Clock, SystemClock};
use crawl::{Coordinator, Crawl, CrawlOptions};
use parser::{HttpPageParser, PageParser};
use profiler::Profiler;

#[tokio::main]
async fn main() {
    init_logging();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so stdout only ever carries results.
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,word_crawler=info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl(args) => handle_crawl(args).await,
    }
}

async fn handle_crawl(args: CrawlArgs) -> Result<i32> {
    let config = args
        .to_config()
        .and_then(|config| config.validate())
        .context("invalid configuration")?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let profiler = Profiler::new(clock.clone());

    let http = HttpPageParser::new(config.ignored_words.clone())
        .context("could not create HTTP client")?;
    let parser: Arc<dyn PageParser> = Arc::new(profiler.wrap(http));
    let coordinator = profiler.wrap(Coordinator::new(CrawlOptions::from(&config), parser, clock));

    let result = coordinator.crawl(&config.start_pages).await?;

    match &config.result_path {
        Some(path) => {
            result
                .write_json_file(path, config.popular_word_count)
                .with_context(|| format!("could not write result to {}", path.display()))?;
            println!("📄 Result written to {}", path.display());
        }
        None if args.json => {
            result.write_json(&mut std::io::stdout().lock(), config.popular_word_count)?;
        }
        None => print_table(&result, config.popular_word_count),
    }

    if config.profile_output_path.is_some() || args.profile {
        profiler
            .write_data(config.profile_output_path.as_deref())
            .context("could not write profile data")?;
    }

    Ok(0)
}

// Prints the most popular words as a human-readable table
fn print_table(result: &result::CrawlResult, limit: usize) {
    println!("{:<40} {:>10}", "WORD", "COUNT");
    println!("{}", "=".repeat(51));

    for (word, count) in result.popular_words(limit) {
        // Truncate very long words so the table stays aligned
        let word_display = if word.chars().count() > 37 {
            format!("{}...", word.chars().take(37).collect::<String>())
        } else {
            word.to_string()
        };
        println!("{:<40} {:>10}", word_display, count);
    }

    println!();
    println!("📊 Summary:");
    println!("   🌐 URLs visited: {}", result.urls_visited);
    println!("   🔤 Distinct words: {}", result.word_counts.len());
}
