//! Markdown normalization and rich-text rendering.
//!
//! - [`tree`] turns markdown (or HTML) into a [`DocumentTree`], an
//!   index-addressed arena of headings, tables, text and other elements.
//! - [`render`] turns captured HTML back into clean Markdown with `htmd`.

mod cleanup;
pub mod render;
pub mod tree;

pub use render::{RenderOptions, html_to_markdown};
pub use tree::{
    DocumentTree, Node, NodeId, NodeKind, TableNode, from_html, markdown_to_html, normalize,
    parse_heading_level,
};
