// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Every crawl setting can come from a JSON config file (--config) and/or from
// flags. Flags win over the file; seed URLs and patterns given as flags are
// added to the ones in the file.
//
// Example:
//   word-crawler crawl https://example.com --max-depth 2 --timeout-secs 10 \
//       --ignore-url '.*\.pdf' --popular-word-count 20
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::CrawlerConfig;
use crate::error::ConfigError;

#[derive(Parser, Debug)]
#[command(
    name = "word-crawler",
    version = "0.1.0",
    about = "Crawl websites concurrently and count the words on every page",
    long_about = "word-crawler follows links from one or more seed URLs, up to a maximum depth \
                  and a time limit, visiting each page once and reporting the most popular words."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl from seed URLs and count words
    ///
    /// Example: word-crawler crawl https://example.com --max-depth 2
    Crawl(CrawlArgs),
}

#[derive(Args, Debug, Default)]
pub struct CrawlArgs {
    /// Seed URLs to start crawling from (added to the config file's startPages)
    pub seeds: Vec<String>,

    /// JSON configuration file (camelCase keys: startPages, maxDepth, timeoutSeconds, ...)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Maximum number of link hops from a seed (0 visits nothing) [default: 1]
    #[arg(long, allow_negative_numbers = true)]
    pub max_depth: Option<i64>,

    /// Stop starting new page visits after this many seconds [default: 30]
    #[arg(long, allow_negative_numbers = true)]
    pub timeout_secs: Option<i64>,

    /// Regex for URLs to skip (full match, repeatable)
    #[arg(long = "ignore-url")]
    pub ignored_urls: Vec<String>,

    /// Regex for words not to count (full match, repeatable)
    #[arg(long = "ignore-word")]
    pub ignored_words: Vec<String>,

    /// Maximum number of pages fetched at the same time
    #[arg(long)]
    pub parallelism: Option<usize>,

    /// How many of the most popular words to report (0 = all)
    #[arg(long)]
    pub popular_word_count: Option<usize>,

    /// Write the JSON result to this file instead of stdout
    #[arg(long)]
    pub result_path: Option<PathBuf>,

    /// Append timing data to this file
    #[arg(long = "profile-path")]
    pub profile_output_path: Option<PathBuf>,

    /// Print timing data even without --profile-path
    #[arg(long)]
    pub profile: bool,

    /// Print the result as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl CrawlArgs {
    /// Loads the config file (if any) and applies the flags on top of it.
    pub fn to_config(&self) -> Result<CrawlerConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => CrawlerConfig::from_path(path)?,
            None => CrawlerConfig::default(),
        };

        config.start_pages.extend(self.seeds.iter().cloned());
        config.ignored_urls.extend(self.ignored_urls.iter().cloned());
        config.ignored_words.extend(self.ignored_words.iter().cloned());

        if let Some(depth) = self.max_depth {
            config.max_depth = depth;
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout_seconds = secs;
        }
        if self.parallelism.is_some() {
            config.parallelism = self.parallelism;
        }
        if let Some(count) = self.popular_word_count {
            config.popular_word_count = count;
        }
        if self.result_path.is_some() {
            config.result_path = self.result_path.clone();
        }
        if self.profile_output_path.is_some() {
            config.profile_output_path = self.profile_output_path.clone();
        }

        Ok(config)
    }
}
