// src/result.rs
// =============================================================================
// CrawlResult: what a crawl run produces, and how we present it.
//
// Popular-word ordering:
// 1. higher count first
// 2. on a tie, longer word first
// 3. still tied, alphabetical
//
// JSON output looks like:
//   {
//     "wordCounts": { "crawler": 12, "rust": 12, "fast": 3 },
//     "urlsVisited": 7
//   }
// =============================================================================

use serde::Serialize;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlResult {
    /// Total occurrences of each word over all visited pages.
    pub word_counts: HashMap<String, usize>,
    /// How many distinct URLs were claimed during the run.
    pub urls_visited: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResultDocument {
    word_counts: Map<String, Value>,
    urls_visited: usize,
}

impl CrawlResult {
    pub fn new(word_counts: HashMap<String, usize>, urls_visited: usize) -> Self {
        Self {
            word_counts,
            urls_visited,
        }
    }

    /// Returns the `limit` most popular words in ranked order.
    /// A limit of 0 returns every word.
    pub fn popular_words(&self, limit: usize) -> Vec<(&str, usize)> {
        let mut words: Vec<(&str, usize)> = self
            .word_counts
            .iter()
            .map(|(word, count)| (word.as_str(), *count))
            .collect();
        words.sort_by(|a, b| compare_popularity(*a, *b));

        if limit > 0 {
            words.truncate(limit);
        }
        words
    }

    /// Builds the JSON document with words in ranked order.
    pub fn to_json(&self, limit: usize) -> serde_json::Result<Value> {
        let word_counts = self
            .popular_words(limit)
            .into_iter()
            .map(|(word, count)| (word.to_string(), Value::from(count)))
            .collect();

        let document = ResultDocument {
            word_counts,
            urls_visited: self.urls_visited,
        };
        serde_json::to_value(document)
    }

    pub fn write_json<W: Write>(&self, out: &mut W, limit: usize) -> std::io::Result<()> {
        // serde_json::Error converts into io::Error, so `?` covers both
        let json = self.to_json(limit)?;
        serde_json::to_writer_pretty(&mut *out, &json)?;
        writeln!(out)
    }

    pub fn write_json_file(&self, path: &Path, limit: usize) -> std::io::Result<()> {
        let mut file = std::fs::File::create(path)?;
        self.write_json(&mut file, limit)
    }
}

fn compare_popularity(a: (&str, usize), b: (&str, usize)) -> Ordering {
    b.1.cmp(&a.1)
        .then_with(|| b.0.len().cmp(&a.0.len()))
        .then_with(|| a.0.cmp(b.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CrawlResult {
        CrawlResult::new(
            HashMap::from([
                ("rust".to_string(), 5),
                ("crawler".to_string(), 5),
                ("fast".to_string(), 5),
                ("safe".to_string(), 2),
                ("concurrency".to_string(), 1),
            ]),
            3,
        )
    }

    #[test]
    fn test_popular_words_ordering() {
        let result = sample();
        let words = result.popular_words(0);
        assert_eq!(
            words,
            vec![
                ("crawler", 5),
                ("fast", 5),
                ("rust", 5),
                ("safe", 2),
                ("concurrency", 1),
            ]
        );
    }

    #[test]
    fn test_popular_words_limit() {
        let result = sample();
        let words = result.popular_words(2);
        assert_eq!(words, vec![("crawler", 5), ("fast", 5)]);
    }

    #[test]
    fn test_json_keeps_ranked_order() {
        let json = sample().to_json(3).unwrap();
        assert_eq!(json["urlsVisited"], 3);

        let keys: Vec<&String> = json["wordCounts"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["crawler", "fast", "rust"]);
    }

    #[test]
    fn test_write_json_is_pretty_and_parses_back() {
        let mut out = Vec::new();
        sample().write_json(&mut out, 0).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\n  \"wordCounts\""));
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["wordCounts"]["safe"], 2);
    }

    #[test]
    fn test_empty_result() {
        let result = CrawlResult::default();
        assert!(result.popular_words(10).is_empty());
        assert_eq!(result.to_json(0).unwrap()["urlsVisited"], 0);
    }
}
