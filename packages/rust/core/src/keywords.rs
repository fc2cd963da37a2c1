//! Keyword descriptions from documentation headings.
//!
//! A keyword names a document and a heading anchor. The heading is found by
//! its `id` attribute or by the slug of its text; everything after it up to
//! the next heading of the same or a higher rank is rendered to Markdown and
//! becomes the keyword's description.

use std::collections::HashMap;

use tracing::{debug, info, instrument, warn};

use docschema_markdown::{DocumentTree, Node, NodeId, NodeKind, RenderOptions};
use docschema_shared::{DocSchemaError, Keyword, Result};

use crate::slug::derive_slug;
use crate::sources::DocumentSource;

/// A keyword whose description could not be resolved.
#[derive(Debug)]
pub struct KeywordDiagnostic {
    pub keyword: String,
    pub error: DocSchemaError,
}

/// Settings for [`describe_keywords`].
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    pub render: RenderOptions,
    /// Also report dropped siblings at warn level.
    pub verbose: bool,
}

/// First heading, in document order, anchored at `slug`.
///
/// A heading matches when its `id` equals `slug` or, failing that, when the
/// slug derived from its text does.
pub fn find_heading(tree: &DocumentTree, slug: &str) -> Option<NodeId> {
    tree.headings().find(|&id| match tree.kind(id) {
        Some(NodeKind::Heading { id: anchor, text, .. }) => {
            anchor.as_deref() == Some(slug) || derive_slug(text) == slug
        }
        _ => false,
    })
}

/// Concatenated markup of the siblings following `heading`, up to (not
/// including) the next heading whose level is at most the starting one.
///
/// Siblings that cannot be serialized are left out; the capture goes on.
pub fn capture_range(tree: &DocumentTree, heading: NodeId, verbose: bool) -> Result<String> {
    let start_level = tree
        .node(heading)
        .and_then(Node::heading_level)
        .ok_or_else(|| {
            DocSchemaError::structure(format!(
                "range capture must start at a heading (node {heading} in {})",
                tree.name()
            ))
        })?;

    let mut html = String::new();
    let mut cursor = heading;
    while let Some(next) = tree.next_sibling(cursor) {
        let ends_range = tree
            .node(next)
            .and_then(Node::heading_level)
            .is_some_and(|level| level <= start_level);
        if ends_range {
            break;
        }

        match tree.serialize(next) {
            Ok(markup) => html.push_str(markup),
            Err(error) => {
                debug!(node = next, %error, "dropping sibling from capture");
                if verbose {
                    warn!(node = next, %error, "dropping sibling from capture");
                }
            }
        }
        cursor = next;
    }

    Ok(html)
}

/// Fill in the description of every keyword that has none.
///
/// Documents are normalized once and shared between keywords. Failures only
/// affect the keyword at hand and are returned as diagnostics.
#[instrument(skip_all, fields(source = source.name(), keywords = keywords.len()))]
pub fn describe_keywords(
    keywords: &mut [Keyword],
    source: &dyn DocumentSource,
    opts: &ExtractOptions,
) -> Vec<KeywordDiagnostic> {
    let mut trees: HashMap<String, Result<DocumentTree>> = HashMap::new();
    let mut diagnostics = Vec::new();
    let mut described = 0usize;

    for keyword in keywords.iter_mut() {
        if !keyword.description().is_empty() {
            continue;
        }

        let file = keyword.documentation_file().to_string();
        let tree = trees
            .entry(file.clone())
            .or_insert_with(|| load_tree(source, &file));

        let outcome = match tree {
            Ok(tree) => describe_one(keyword, tree, opts),
            Err(error) => Err(reload_error(&file, error)),
        };

        match outcome {
            Ok(description) => {
                if keyword.fill_description(description) {
                    described += 1;
                }
            }
            Err(error) => {
                warn!(keyword = %keyword.name, %error, "keyword left without description");
                diagnostics.push(KeywordDiagnostic {
                    keyword: keyword.name.clone(),
                    error,
                });
            }
        }
    }

    info!(described, failed = diagnostics.len(), "keyword descriptions resolved");
    diagnostics
}

fn load_tree(source: &dyn DocumentSource, name: &str) -> Result<DocumentTree> {
    let document = source.load(name)?;
    docschema_markdown::normalize(&document.name, &document.text)
        .map_err(|e| DocSchemaError::load(name, e.to_string()))
}

/// A fresh copy of a cached load failure for the next keyword that needs the
/// same document.
fn reload_error(file: &str, error: &DocSchemaError) -> DocSchemaError {
    match error {
        DocSchemaError::Load { name, message } => {
            DocSchemaError::load(name.clone(), message.clone())
        }
        other => DocSchemaError::load(file, other.to_string()),
    }
}

fn describe_one(keyword: &Keyword, tree: &DocumentTree, opts: &ExtractOptions) -> Result<String> {
    let slug = keyword.documentation_heading_slug();
    let heading = find_heading(tree, slug).ok_or_else(|| DocSchemaError::LookupMiss {
        slug: slug.to_string(),
        document: tree.name().to_string(),
    })?;

    let html = capture_range(tree, heading, opts.verbose)?;
    debug!(keyword = %keyword.name, heading, captured = html.len(), "range captured");
    docschema_markdown::html_to_markdown(&html, &opts.render)
}
