//! Post-conversion cleanup pipeline for rendered descriptions.
//!
//! Each cleanup pass is a function `&str -> String` applied in sequence.
//! Descriptions are snippets, not pages: no heading normalization, and the
//! result carries no leading or trailing blank lines.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// Run the full cleanup pipeline on raw Markdown text.
pub(crate) fn run_pipeline(md: &str, base_url: Option<&Url>) -> String {
    let mut result = md.to_string();

    result = clean_blank_lines(&result);
    result = fix_code_block_languages(&result);
    result = strip_leftover_html(&result);
    result = resolve_links(&result, base_url);
    result = normalize_whitespace(&result);
    result = trim_blank_edges(&result);

    result
}

// ---------------------------------------------------------------------------
// Pass 1: Collapse excessive blank lines
// ---------------------------------------------------------------------------

/// Collapse runs of blank lines into a single blank line.
fn clean_blank_lines(md: &str) -> String {
    static MULTI_BLANK_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

    MULTI_BLANK_RE.replace_all(md, "\n\n").to_string()
}

// ---------------------------------------------------------------------------
// Pass 2: Fix code block language hints
// ---------------------------------------------------------------------------

/// Strip class-style prefixes (`language-ini`, `lang-sh`) from fence hints.
fn fix_code_block_languages(md: &str) -> String {
    static LANG_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?m)^```(?:language-|lang-|highlight-)(\w+)").expect("valid regex")
    });

    LANG_PREFIX_RE.replace_all(md, "```$1").to_string()
}

// ---------------------------------------------------------------------------
// Pass 3: Strip leftover HTML tags
// ---------------------------------------------------------------------------

/// Remove container tags that survived the conversion, keeping their text.
/// Fenced code is left alone.
fn strip_leftover_html(md: &str) -> String {
    static HTML_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"</?(?:div|span|section|details|summary|figure|figcaption)(?:\s[^>]*)?>")
            .expect("valid regex")
    });

    let mut in_code_block = false;
    md.lines()
        .map(|line| {
            if line.trim_start().starts_with("```") {
                in_code_block = !in_code_block;
                return line.to_string();
            }
            if in_code_block {
                return line.to_string();
            }
            HTML_TAG_RE.replace_all(line, "").to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Pass 4: Resolve relative links
// ---------------------------------------------------------------------------

/// Resolve relative URLs in Markdown links against a base URL.
fn resolve_links(md: &str, base_url: Option<&Url>) -> String {
    let Some(base) = base_url else {
        return md.to_string();
    };

    static LINK_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\(([^)\s]+)\)").expect("valid regex"));

    LINK_RE
        .replace_all(md, |caps: &regex::Captures| {
            let text = &caps[1];
            let href = &caps[2];

            if href.starts_with("http://")
                || href.starts_with("https://")
                || href.starts_with('#')
                || href.starts_with("mailto:")
            {
                return caps[0].to_string();
            }

            match base.join(href) {
                Ok(resolved) => format!("[{text}]({resolved})"),
                Err(_) => caps[0].to_string(),
            }
        })
        .to_string()
}

// ---------------------------------------------------------------------------
// Pass 5: Normalize whitespace
// ---------------------------------------------------------------------------

/// Strip trailing whitespace from every line.
fn normalize_whitespace(md: &str) -> String {
    md.lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Pass 6: Trim blank edges
// ---------------------------------------------------------------------------

fn trim_blank_edges(md: &str) -> String {
    md.trim_matches('\n').to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_blank_lines_collapses_excess() {
        let input = "Line 1\n\n\n\n\nLine 2";
        assert_eq!(clean_blank_lines(input), "Line 1\n\nLine 2");
    }

    #[test]
    fn clean_blank_lines_keeps_double() {
        let input = "Line 1\n\nLine 2";
        assert_eq!(clean_blank_lines(input), input);
    }

    #[test]
    fn fix_code_block_languages_strips_prefix() {
        let input = "```language-ini\nmonitor = ,preferred,auto,1\n```";
        assert!(fix_code_block_languages(input).starts_with("```ini\n"));
    }

    #[test]
    fn strip_leftover_html_removes_container_tags() {
        let input = "<div class=\"callout\">Careful here</div>\n\nMore text";
        let result = strip_leftover_html(input);
        assert!(result.contains("Careful here"));
        assert!(!result.contains("<div"));
    }

    #[test]
    fn strip_leftover_html_preserves_code_blocks() {
        let input = "Text\n\n```html\n<div>Preserved</div>\n```";
        assert!(strip_leftover_html(input).contains("<div>Preserved</div>"));
    }

    #[test]
    fn resolve_links_parent_relative() {
        let base = Url::parse("https://wiki.hyprland.org/Configuring/Variables/").unwrap();
        let input = "see [dispatchers](../Dispatchers)";
        assert_eq!(
            resolve_links(input, Some(&base)),
            "see [dispatchers](https://wiki.hyprland.org/Configuring/Dispatchers)"
        );
    }

    #[test]
    fn resolve_links_absolute_and_anchor_untouched() {
        let base = Url::parse("https://docs.example.com/page/").unwrap();
        let input = "[a](https://other.com/x) [b](#section)";
        assert_eq!(resolve_links(input, Some(&base)), input);
    }

    #[test]
    fn resolve_links_without_base_is_noop() {
        let input = "[a](../b)";
        assert_eq!(resolve_links(input, None), input);
    }

    #[test]
    fn full_pipeline_trims_edges() {
        let input = "\n\nFirst   \n\n\n\nSecond\n\n";
        assert_eq!(run_pipeline(input, None), "First\n\nSecond");
    }
}
