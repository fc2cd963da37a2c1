//! Document normalization into an index-addressed node arena.
//!
//! Markdown is rendered to HTML with `pulldown-cmark` (GFM tables, heading
//! attributes), parsed with `scraper`, and flattened into a [`DocumentTree`].
//! Nodes are addressed by [`NodeId`]; parent, child and sibling lookups are
//! plain index arithmetic, so the extractors never hold references into a
//! live DOM.

use std::sync::LazyLock;

use pulldown_cmark::{Options, Parser};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument, warn};

use docschema_shared::{DocSchemaError, Result};

/// Index of a node inside its [`DocumentTree`].
pub type NodeId = usize;

// ---------------------------------------------------------------------------
// Node types
// ---------------------------------------------------------------------------

/// What a node is, as far as the extractors care.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// `<h1>`..`<h6>`.
    Heading {
        level: u8,
        /// Explicit anchor (`id` attribute), if any.
        id: Option<String>,
        /// Visible text, trimmed.
        text: String,
    },
    /// `<table>`, with its cell text already extracted.
    Table(TableNode),
    /// Non-blank text sitting directly between elements.
    Text(String),
    /// Any other element. Its children are part of the tree.
    Other { tag: String },
}

/// Cell text of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableNode {
    /// Trimmed text of the `th` cells in the first row.
    pub header: Vec<String>,
    /// Trimmed text of the `td` cells of every row after the first.
    pub rows: Vec<Vec<String>>,
}

/// One entry in the arena.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    parent: Option<NodeId>,
    /// Position within the parent's child list.
    position: usize,
    children: Vec<NodeId>,
    /// Serialized outer markup, when the normalizer could produce it.
    markup: Option<String>,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Heading level, if this node is a heading.
    pub fn heading_level(&self) -> Option<u8> {
        match self.kind {
            NodeKind::Heading { level, .. } => Some(level),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// DocumentTree
// ---------------------------------------------------------------------------

/// An immutable-after-construction arena of document nodes.
///
/// Node ids are handed out in insertion order; normalizers insert in
/// document (pre-)order, so id order is document order.
#[derive(Debug, Clone)]
pub struct DocumentTree {
    name: String,
    nodes: Vec<Node>,
}

impl DocumentTree {
    /// An empty tree holding only the synthetic root node.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: vec![Node {
                kind: NodeKind::Other {
                    tag: "#document".into(),
                },
                parent: None,
                position: 0,
                children: Vec::new(),
                markup: None,
            }],
        }
    }

    /// Source name of the document this tree was built from.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> NodeId {
        0
    }

    /// Number of nodes, root excluded.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a node as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// If `parent` is not an id previously returned by this tree.
    pub fn push(&mut self, parent: NodeId, kind: NodeKind, markup: Option<String>) -> NodeId {
        let id = self.nodes.len();
        let position = self.nodes[parent].children.len();
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            position,
            children: Vec::new(),
            markup,
        });
        self.nodes[parent].children.push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.nodes.get(id).map(|n| &n.kind)
    }

    /// The sibling immediately before `id`, if any.
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let node = self.nodes.get(id)?;
        let parent = &self.nodes[node.parent?];
        node.position
            .checked_sub(1)
            .and_then(|pos| parent.children.get(pos).copied())
    }

    /// The sibling immediately after `id`, if any.
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let node = self.nodes.get(id)?;
        let parent = &self.nodes[node.parent?];
        parent.children.get(node.position + 1).copied()
    }

    /// All nodes in document order, root excluded.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().skip(1)
    }

    /// Every table, in document order.
    pub fn tables(&self) -> impl Iterator<Item = (NodeId, &TableNode)> {
        self.iter().filter_map(|(id, node)| match &node.kind {
            NodeKind::Table(table) => Some((id, table)),
            _ => None,
        })
    }

    /// Every heading (levels 1–6), in document order.
    pub fn headings(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.iter()
            .filter(|(_, node)| matches!(node.kind, NodeKind::Heading { .. }))
            .map(|(id, _)| id)
    }

    /// Outer markup of a node.
    pub fn serialize(&self, id: NodeId) -> Result<&str> {
        let node = self
            .nodes
            .get(id)
            .ok_or_else(|| DocSchemaError::Serialization(format!("no node {id} in {}", self.name)))?;
        node.markup.as_deref().ok_or_else(|| {
            DocSchemaError::Serialization(format!(
                "node {id} ({}) in {} has no markup",
                describe(&node.kind),
                self.name
            ))
        })
    }
}

fn describe(kind: &NodeKind) -> &str {
    match kind {
        NodeKind::Heading { text, .. } => text,
        NodeKind::Table(_) => "table",
        NodeKind::Text(_) => "text",
        NodeKind::Other { tag } => tag,
    }
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

static HEADING_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^h[1-6]$").expect("heading tag regex"));

/// Normalize a markdown document into a node tree.
#[instrument(skip(source), fields(len = source.len()))]
pub fn normalize(name: &str, source: &str) -> Result<DocumentTree> {
    let html = markdown_to_html(source);
    from_html(name, &html)
}

/// Render markdown to HTML with the GitHub-flavoured extensions the
/// documentation relies on.
pub fn markdown_to_html(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

    let parser = Parser::new_ext(source, options);
    let mut html = String::with_capacity(source.len() * 3 / 2);
    pulldown_cmark::html::push_html(&mut html, parser);
    html
}

/// Build a node tree from HTML. The `<body>` children become the
/// top-level nodes.
pub fn from_html(name: &str, html: &str) -> Result<DocumentTree> {
    let doc = Html::parse_document(html);
    let mut tree = DocumentTree::new(name);
    let root = tree.root();

    let body_sel = Selector::parse("body").expect("body selector");
    let body = doc
        .select(&body_sel)
        .next()
        .unwrap_or_else(|| doc.root_element());
    append_children(&mut tree, root, body)?;

    if tree.is_empty() {
        warn!(document = name, "document has no content");
    }
    debug!(document = name, nodes = tree.len(), "document normalized");
    Ok(tree)
}

fn append_children(tree: &mut DocumentTree, parent: NodeId, element: ElementRef<'_>) -> Result<()> {
    for child in element.children() {
        match child.value() {
            scraper::Node::Element(_) => {
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                let kind = classify(child_el)?;
                // Headings and tables are leaves: their content is already
                // captured in the node kind.
                let descend = matches!(kind, NodeKind::Other { .. });
                let id = tree.push(parent, kind, Some(child_el.html()));
                if descend {
                    append_children(tree, id, child_el)?;
                }
            }
            scraper::Node::Text(text) => {
                let content: &str = text;
                if content.trim().is_empty() {
                    continue;
                }
                tree.push(
                    parent,
                    NodeKind::Text(content.to_string()),
                    Some(escape_text(content)),
                );
            }
            _ => {}
        }
    }
    Ok(())
}

fn classify(element: ElementRef<'_>) -> Result<NodeKind> {
    let tag = element.value().name();

    if HEADING_TAG_RE.is_match(tag) {
        return Ok(NodeKind::Heading {
            level: parse_heading_level(tag)?,
            id: element.value().attr("id").map(str::to_string),
            text: element.text().collect::<String>().trim().to_string(),
        });
    }

    if tag == "table" {
        return Ok(NodeKind::Table(read_table(element)));
    }

    Ok(NodeKind::Other {
        tag: tag.to_string(),
    })
}

/// Numeric level of a heading tag (`h3` → 3).
pub fn parse_heading_level(tag: &str) -> Result<u8> {
    tag.strip_prefix('h')
        .and_then(|digits| digits.parse::<u8>().ok())
        .ok_or_else(|| DocSchemaError::parse(format!("invalid heading level in <{tag}>")))
}

fn read_table(table: ElementRef<'_>) -> TableNode {
    let tr_sel = Selector::parse("tr").expect("tr selector");
    let th_sel = Selector::parse("th").expect("th selector");
    let td_sel = Selector::parse("td").expect("td selector");

    let mut rows = table.select(&tr_sel);
    let header = rows
        .next()
        .map(|tr| cell_texts(tr, &th_sel))
        .unwrap_or_default();
    let rows = rows.map(|tr| cell_texts(tr, &td_sel)).collect();

    TableNode { header, rows }
}

fn cell_texts(row: ElementRef<'_>, selector: &Selector) -> Vec<String> {
    row.select(selector)
        .map(|cell| cell.text().collect::<String>().trim().to_string())
        .collect()
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn top_level_kinds(tree: &DocumentTree) -> Vec<&NodeKind> {
        tree.node(tree.root())
            .unwrap()
            .children()
            .iter()
            .map(|&id| tree.kind(id).unwrap())
            .collect()
    }

    #[test]
    fn normalize_heading_and_table() {
        let md = "## General\n|name|description|type|default|\n|-|-|-|-|\n|foo|does x|bool|0|\n";
        let tree = normalize("Variables", md).unwrap();

        let kinds = top_level_kinds(&tree);
        assert_eq!(kinds.len(), 2);
        assert_eq!(
            kinds[0],
            &NodeKind::Heading {
                level: 2,
                id: None,
                text: "General".into()
            }
        );

        let (_, table) = tree.tables().next().expect("one table");
        assert_eq!(table.header, vec!["name", "description", "type", "default"]);
        assert_eq!(table.rows, vec![vec!["foo", "does x", "bool", "0"]]);
    }

    #[test]
    fn heading_attributes_become_ids() {
        let tree = normalize("doc", "### Blur {#blur-anchor}\n\ntext\n").unwrap();
        let heading = tree.headings().next().unwrap();
        match tree.kind(heading).unwrap() {
            NodeKind::Heading { level, id, text } => {
                assert_eq!(*level, 3);
                assert_eq!(id.as_deref(), Some("blur-anchor"));
                assert_eq!(text, "Blur");
            }
            other => panic!("expected heading, got {other:?}"),
        }
    }

    #[test]
    fn siblings_skip_blank_text() {
        let tree = normalize("doc", "# A\n\npara\n\n## B\n").unwrap();
        let top = tree.node(tree.root()).unwrap().children().to_vec();
        assert_eq!(top.len(), 3);

        assert_eq!(tree.prev_sibling(top[0]), None);
        assert_eq!(tree.next_sibling(top[0]), Some(top[1]));
        assert_eq!(tree.prev_sibling(top[2]), Some(top[1]));
        assert_eq!(tree.next_sibling(top[2]), None);
    }

    #[test]
    fn raw_html_passes_through() {
        let tree = from_html(
            "doc",
            r#"<h2 id="my-anchor">Title</h2><p>body</p><h2>Next</h2>"#,
        )
        .unwrap();
        let p = tree.next_sibling(tree.headings().next().unwrap()).unwrap();
        assert_eq!(tree.serialize(p).unwrap(), "<p>body</p>");
    }

    #[test]
    fn nested_elements_are_walked() {
        let tree = from_html("doc", "<div><h3>Inner</h3><p>x</p></div>").unwrap();
        let heading = tree.headings().next().expect("nested heading found");
        let parent = tree.node(heading).unwrap().parent().unwrap();
        assert_eq!(
            tree.kind(parent),
            Some(&NodeKind::Other { tag: "div".into() })
        );
    }

    #[test]
    fn loose_text_is_kept_and_escaped() {
        let tree = from_html("doc", "<h2>A</h2>a < b<p>x</p>").unwrap();
        let text = tree.next_sibling(tree.headings().next().unwrap()).unwrap();
        assert_eq!(tree.kind(text), Some(&NodeKind::Text("a < b".into())));
        assert_eq!(tree.serialize(text).unwrap(), "a &lt; b");
    }

    #[test]
    fn serialize_reports_missing_markup() {
        let mut tree = DocumentTree::new("manual");
        let root = tree.root();
        let id = tree.push(root, NodeKind::Other { tag: "p".into() }, None);

        let err = tree.serialize(id).unwrap_err();
        assert!(matches!(err, DocSchemaError::Serialization(_)));
        assert!(tree.serialize(99).is_err());
    }

    #[test]
    fn blank_document_is_empty() {
        let tree = normalize("blank", "\n\n   \n").unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.headings().count(), 0);
        assert!(!normalize("doc", "text\n").unwrap().is_empty());
    }

    #[test]
    fn heading_level_parsing() {
        assert_eq!(parse_heading_level("h1").unwrap(), 1);
        assert_eq!(parse_heading_level("h6").unwrap(), 6);
        assert!(matches!(
            parse_heading_level("hx"),
            Err(DocSchemaError::Parse { .. })
        ));
        assert!(parse_heading_level("table").is_err());
    }

    #[test]
    fn table_header_uses_first_row_only() {
        let md = "|a|b|\n|-|-|\n|1|2|\n|3|4|\n";
        let tree = normalize("doc", md).unwrap();
        let (_, table) = tree.tables().next().unwrap();
        assert_eq!(table.header, vec!["a", "b"]);
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn frontmatter_becomes_setext_heading() {
        let md = "---\nweight: 3\ntitle: Variables\n---\n\n### General\n";
        let tree = normalize("doc", md).unwrap();
        let first = tree.headings().next().unwrap();
        match tree.kind(first).unwrap() {
            NodeKind::Heading { level, text, .. } => {
                assert_eq!(*level, 2);
                assert!(text.starts_with("weight: 3"));
            }
            other => panic!("expected heading, got {other:?}"),
        }
    }
}
