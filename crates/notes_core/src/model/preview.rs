//! Plain-text preview derivation for note list rows.
//!
//! Rules:
//! - Markdown images are dropped, links keep their label.
//! - Markdown symbols are removed and whitespace is collapsed.
//! - The first 100 characters are kept; empty results yield `None`.

use once_cell::sync::Lazy;
use regex::Regex;

const PREVIEW_MAX_CHARS: usize = 100;

static MARKDOWN_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*]\(([^)]+)\)").expect("valid image regex"));
static MARKDOWN_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid link regex"));
static MARKDOWN_SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\*_`#>~\[\]\(\)!]+"#).expect("valid markdown symbol regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Derives a short plain-text excerpt from note content.
pub fn derive_preview(content: &str) -> Option<String> {
    let without_images = MARKDOWN_IMAGE_RE.replace_all(content, " ");
    let without_links = MARKDOWN_LINK_RE.replace_all(&without_images, "$1");
    let without_symbols = MARKDOWN_SYMBOL_RE.replace_all(&without_links, " ");
    let normalized = WHITESPACE_RE.replace_all(&without_symbols, " ");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(PREVIEW_MAX_CHARS).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::derive_preview;

    #[test]
    fn preview_strips_markup_and_keeps_link_labels() {
        let markdown = "# Plan\n\n**ship** the [release](https://example.com) ![x](a.png)";
        let preview = derive_preview(markdown).expect("preview should exist");
        assert_eq!(preview, "Plan ship the release");
    }

    #[test]
    fn preview_is_none_for_blank_or_symbol_only_content() {
        assert_eq!(derive_preview(""), None);
        assert_eq!(derive_preview("  ** ## \n"), None);
    }

    #[test]
    fn preview_is_capped_at_one_hundred_chars() {
        let preview = derive_preview(&"a".repeat(250)).expect("preview should exist");
        assert_eq!(preview.chars().count(), 100);
    }
}
