// src/parser/html.rs
// =============================================================================
// This module turns one HTML page into a PageContent:
// - the outbound links (absolute URLs, fragments removed)
// - how many times each word appears in the visible text
//
// We use the `scraper` crate to parse the HTML and select elements, and the
// `url` crate to resolve relative links against the page URL.
//
// Word rules:
// - the text is split on whitespace
// - non-word characters are removed ("Rust's" -> "rusts", "co-op" -> "coop")
// - everything is lowercased
// - empty words and words that fully match an ignored-word pattern are dropped
//
// Rust concepts used:
// - LazyLock: a static that is built the first time it is used
// - Option and `?`: resolve_link bails out early with None
// - let-else: skip a loop iteration when a pattern does not match
// - Iterator chains: filter_map, flat_map and collect instead of manual loops
// =============================================================================

use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::sync::LazyLock;
use url::Url;

use super::PageContent;

// Both selectors are constants and known to be valid, so parsing them can
// only fail on a programmer error.
static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid selector"));
static BODY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("valid selector"));

// Elements whose text is never shown to a reader.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Extracts links and word counts from an HTML document.
pub fn parse_page(html: &str, page_url: &Url, ignored_words: &[Regex]) -> PageContent {
    let document = Html::parse_document(html);

    PageContent {
        links: extract_links(&document, page_url),
        word_counts: count_words(&visible_text(&document), ignored_words),
    }
}

fn extract_links(document: &Html, base: &Url) -> Vec<String> {
    document
        .select(&LINK_SELECTOR)
        // attr() returns Option<&str>; filter_map keeps only the Some values
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(base, href))
        .collect()
}

// Resolves a link (possibly relative) to an absolute, crawlable URL
//
// Examples (base = "https://example.com/page"):
//   "/docs"            -> Some("https://example.com/docs")
//   "other#section"    -> Some("https://example.com/other")
//   "#section"         -> None (same page)
//   "mailto:a@b.c"     -> None (not crawlable)
fn resolve_link(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
    {
        return None;
    }

    // join() handles "../x", "/x", "x" and absolute URLs alike
    let mut url = base.join(href).ok()?;
    if !matches!(url.scheme(), "http" | "https" | "file") {
        return None;
    }
    url.set_fragment(None);
    Some(url.to_string())
}

// Collects the text a reader would see: the <body> if there is one,
// otherwise the whole document, minus scripts and styles.
fn visible_text(document: &Html) -> String {
    let root = document
        .select(&BODY_SELECTOR)
        .next()
        .unwrap_or_else(|| document.root_element());

    let mut text = String::new();
    // descendants() walks the tree depth-first, in document order
    for node in root.descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(|parent| parent.value().as_element())
            .is_some_and(|element| HIDDEN_ELEMENTS.contains(&element.name()));
        if !hidden {
            text.push_str(fragment);
            text.push(' ');
        }
    }
    text
}

/// Counts words in plain text, skipping any word that fully matches one of
/// the `ignored_words` patterns.
pub fn count_words(text: &str, ignored_words: &[Regex]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();

    for raw in text.split_whitespace() {
        let word: String = raw
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_')
            .flat_map(char::to_lowercase)
            .collect();

        if word.is_empty() || ignored_words.iter().any(|p| p.is_match(&word)) {
            continue;
        }
        *counts.entry(word).or_insert(0) += 1;
    }

    counts
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why flat_map(char::to_lowercase) and not map?
//    - Some characters lowercase to MORE than one char (e.g. 'İ')
//    - to_lowercase() returns an iterator, and flat_map flattens it
//
// 2. Why are the selectors statics?
//    - Selector::parse is not free, and parse_page runs once per page
//    - A LazyLock static is parsed once and then shared by every task
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::compile_full_match;

    fn base() -> Url {
        Url::parse("https://example.com/page/").unwrap()
    }

    #[test]
    fn test_resolve_relative_link() {
        let base = Url::parse("https://example.com/page").unwrap();
        assert_eq!(
            resolve_link(&base, "/docs"),
            Some("https://example.com/docs".to_string())
        );
    }

    #[test]
    fn test_resolve_strips_fragment() {
        assert_eq!(
            resolve_link(&base(), "other#top"),
            Some("https://example.com/page/other".to_string())
        );
    }

    #[test]
    fn test_skip_anchor_and_special_schemes() {
        assert_eq!(resolve_link(&base(), "#section"), None);
        assert_eq!(resolve_link(&base(), "mailto:test@example.com"), None);
        assert_eq!(resolve_link(&base(), "javascript:void(0)"), None);
        assert_eq!(resolve_link(&base(), "ftp://example.com/file"), None);
    }

    #[test]
    fn test_parse_page_links_and_words() {
        let html = r#"
            <html>
              <head><title>Ignored title</title></head>
              <body>
                <p>Hello hello, World!</p>
                <a href="https://rust-lang.org">Rust</a>
                <a href="../about">About</a>
                <script>var hidden = 1;</script>
              </body>
            </html>
        "#;
        let page = parse_page(html, &base(), &[]);

        assert_eq!(
            page.links,
            vec!["https://rust-lang.org/", "https://example.com/about"]
        );
        assert_eq!(page.word_counts.get("hello"), Some(&2));
        assert_eq!(page.word_counts.get("world"), Some(&1));
        assert_eq!(page.word_counts.get("rust"), Some(&1));
        assert_eq!(page.word_counts.get("about"), Some(&1));
        assert!(!page.word_counts.contains_key("hidden"));
        assert!(!page.word_counts.contains_key("title"));
    }

    #[test]
    fn test_count_words_strips_punctuation_and_lowercases() {
        let counts = count_words("Rust's  CO-OP -- rust's", &[]);
        assert_eq!(counts.get("rusts"), Some(&2));
        assert_eq!(counts.get("coop"), Some(&1));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_count_words_skips_ignored_words() {
        let short = compile_full_match("^.{1,3}$").unwrap();
        let the = compile_full_match("the").unwrap();
        let counts = count_words("the cat sat on the concurrency mat", &[short, the]);

        assert_eq!(counts.len(), 1);
        assert_eq!(counts.get("concurrency"), Some(&1));
    }
}
