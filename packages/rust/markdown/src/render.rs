//! Captured HTML → Markdown rich text.
//!
//! Uses `htmd` for the conversion, after rewriting tables into Markdown
//! ourselves, then runs the cleanup pipeline.

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};
use url::Url;

use docschema_shared::{DocSchemaError, Result};

use crate::cleanup;

/// Options for rendering a captured range.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Base URL that relative links are resolved against.
    pub link_base_url: Option<Url>,
}

impl RenderOptions {
    /// Options resolving relative links against `base`.
    pub fn with_link_base(base: &str) -> Result<Self> {
        let url = Url::parse(base)
            .map_err(|e| DocSchemaError::config(format!("invalid link base {base:?}: {e}")))?;
        Ok(Self {
            link_base_url: Some(url),
        })
    }
}

/// Convert an HTML fragment to cleaned-up Markdown.
#[instrument(skip_all, fields(len = html.len()))]
pub fn html_to_markdown(html: &str, opts: &RenderOptions) -> Result<String> {
    if html.trim().is_empty() {
        return Ok(String::new());
    }

    let (content_html, tables) = preprocess_tables(html);

    let converter = htmd::HtmlToMarkdown::builder()
        .skip_tags(vec!["script", "style", "nav", "iframe", "noscript", "svg"])
        .build();

    let raw_markdown = converter
        .convert(&content_html)
        .map_err(|e| DocSchemaError::Conversion(format!("htmd conversion failed: {e}")))?;
    let raw_markdown = restore_tables(raw_markdown, &tables);

    let cleaned = cleanup::run_pipeline(&raw_markdown, opts.link_base_url.as_ref());
    debug!(
        raw_len = raw_markdown.len(),
        final_len = cleaned.len(),
        tables = tables.len(),
        "description rendered"
    );

    Ok(cleaned)
}

// ---------------------------------------------------------------------------
// Table pre-processing
// ---------------------------------------------------------------------------

/// Swap every `<table>` for a placeholder paragraph and return the Markdown
/// tables in placeholder order. `htmd` 0.1 has no table support, and Markdown
/// spliced into the HTML would have its line breaks collapsed.
fn preprocess_tables(html: &str) -> (String, Vec<String>) {
    let doc = Html::parse_fragment(html);
    let table_sel = Selector::parse("table").expect("table selector");

    // Re-serialized so that each table's `html()` is an exact substring.
    let mut result = doc.root_element().inner_html();
    let mut tables = Vec::new();
    for table in doc.select(&table_sel) {
        let placeholder = format!("<p>{}</p>", table_placeholder(tables.len()));
        result = result.replacen(&table.html(), &placeholder, 1);
        tables.push(html_table_to_markdown(&table));
    }
    (result, tables)
}

/// Put the Markdown tables back where `htmd` left their placeholders.
fn restore_tables(markdown: String, tables: &[String]) -> String {
    tables
        .iter()
        .enumerate()
        .fold(markdown, |md, (i, table)| {
            md.replacen(&table_placeholder(i), table.trim(), 1)
        })
}

fn table_placeholder(index: usize) -> String {
    format!("DOCSCHEMATABLE{index}END")
}

/// Convert a single HTML table element to a markdown table string.
fn html_table_to_markdown(table: &ElementRef<'_>) -> String {
    let tr_sel = Selector::parse("tr").expect("tr selector");
    let cell_sel = Selector::parse("th, td").expect("cell selector");

    let mut rows: Vec<Vec<String>> = table
        .select(&tr_sel)
        .map(|tr| {
            tr.select(&cell_sel)
                .map(|cell| {
                    cell.text()
                        .collect::<String>()
                        .trim()
                        .replace('|', "\\|")
                })
                .collect::<Vec<_>>()
        })
        .filter(|row| !row.is_empty())
        .collect();

    let col_count = rows.iter().map(Vec::len).max().unwrap_or(0);
    if col_count == 0 {
        return String::new();
    }

    for row in &mut rows {
        row.resize(col_count, String::new());
    }

    let mut md = String::from("\n\n");
    for (i, row) in rows.iter().enumerate() {
        md.push_str("| ");
        md.push_str(&row.join(" | "));
        md.push_str(" |\n");
        if i == 0 {
            md.push_str("| ");
            md.push_str(&vec!["---"; col_count].join(" | "));
            md.push_str(" |\n");
        }
    }
    md.push('\n');
    md
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
