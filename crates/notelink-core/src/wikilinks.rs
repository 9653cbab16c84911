//! Wiki-style `[[Note Title]]` reference extraction.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Double open bracket, a run without `]`, double close bracket.
static WIKI_LINK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[([^\]]+)\]\]").expect("wiki-link pattern is valid"));

/// Extract referenced note titles from note content.
///
/// Returns titles in order of first occurrence, without duplicates.
///
/// # Rules
///
/// 1. A reference is `[[` followed by one or more characters other than `]`, then `]]`
/// 2. Matches are non-overlapping, scanned left to right
/// 3. Surrounding whitespace inside the brackets is trimmed
/// 4. References that are empty after trimming are dropped
/// 5. Duplicates are removed case-sensitively (`[[Rust]]` and `[[rust]]` are distinct)
///
/// # Examples
///
/// ```
/// use notelink_core::extract_wiki_links;
///
/// let titles = extract_wiki_links("[[B]] and [[A]] and [[B]]");
/// assert_eq!(titles, vec!["B", "A"]);
/// ```
pub fn extract_wiki_links(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut titles = Vec::new();

    for cap in WIKI_LINK_PATTERN.captures_iter(content) {
        let Some(inner) = cap.get(1) else {
            continue;
        };
        let title = inner.as_str().trim();
        if title.is_empty() {
            continue;
        }
        if seen.insert(title) {
            titles.push(title.to_string());
        }
    }

    titles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_link() {
        assert_eq!(
            extract_wiki_links("See [[My Note]] for details"),
            vec!["My Note"]
        );
    }

    #[test]
    fn test_preserves_first_occurrence_order() {
        assert_eq!(
            extract_wiki_links("[[B]] and [[A]] and [[B]]"),
            vec!["B", "A"]
        );
    }

    #[test]
    fn test_empty_and_linkless_content() {
        assert!(extract_wiki_links("").is_empty());
        assert!(extract_wiki_links("no links here").is_empty());
    }

    #[test]
    fn test_whitespace_only_is_discarded() {
        assert!(extract_wiki_links("[[ ]]").is_empty());
        assert!(extract_wiki_links("[[\t\n]]").is_empty());
    }

    #[test]
    fn test_empty_brackets_do_not_match() {
        assert!(extract_wiki_links("Empty [[]] should be filtered").is_empty());
    }

    #[test]
    fn test_trims_inner_whitespace() {
        assert_eq!(
            extract_wiki_links("[[  Padded Title  ]]"),
            vec!["Padded Title"]
        );
    }

    #[test]
    fn test_trimmed_duplicates_collapse() {
        assert_eq!(extract_wiki_links("[[A]] [[ A ]]"), vec!["A"]);
    }

    #[test]
    fn test_case_sensitive_dedup() {
        assert_eq!(
            extract_wiki_links("[[Rust]] [[rust]] [[Rust]]"),
            vec!["Rust", "rust"]
        );
    }

    #[test]
    fn test_single_brackets_are_ignored() {
        assert_eq!(
            extract_wiki_links("array[0] and [link](url) and [[Real]]"),
            vec!["Real"]
        );
    }

    #[test]
    fn test_unclosed_reference_is_ignored() {
        assert!(extract_wiki_links("[[never closed").is_empty());
        assert!(extract_wiki_links("[[half closed]").is_empty());
    }

    #[test]
    fn test_nested_brackets() {
        assert_eq!(extract_wiki_links("[[outer [[inner]]"), vec!["outer [[inner"]);
        assert_eq!(extract_wiki_links("[[[x]]]"), vec!["[x"]);
    }

    #[test]
    fn test_adjacent_links() {
        assert_eq!(extract_wiki_links("[[A]][[B]]"), vec!["A", "B"]);
    }

    #[test]
    fn test_multiline_content() {
        let content = "# Heading\n\nFirst [[Alpha]].\n\n- item [[Beta]]\n- item [[Alpha]]\n";
        assert_eq!(extract_wiki_links(content), vec!["Alpha", "Beta"]);
    }

    #[test]
    fn test_unicode_titles() {
        assert_eq!(
            extract_wiki_links("[[Café]] and [[日本語]]"),
            vec!["Café", "日本語"]
        );
    }
}
