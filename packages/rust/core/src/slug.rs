//! Anchor slugs derived from heading text.

use std::sync::LazyLock;

use regex::Regex;

/// Front matter rendered as a heading (`weight: 3` / `title: Foo`) produces
/// slugs like `weight-3-title-foo`; the anchor is the part after it.
static WEIGHT_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^weight-\d+-(?:title-)?").expect("weight prefix regex"));

/// Derive the anchor slug of a heading from its visible text.
///
/// Lowercases and trims the text, collapses every run of non-alphanumeric
/// characters into one `-` (none at either end), then drops a leading
/// `weight-<n>-title-` prefix.
pub fn derive_slug(text: &str) -> String {
    let lowered = text.trim().to_lowercase();

    let mut slug = String::with_capacity(lowered.len());
    let mut pending_dash = false;
    for c in lowered.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    WEIGHT_PREFIX_RE.replace(&slug, "").into_owned()
}
