//! Ancestor-heading resolution.
//!
//! The path of an element is found by walking backwards through its
//! siblings to the nearest heading, then repeating from that heading's own
//! preceding sibling until a heading at or above the root level is reached.
//! Only document order and heading levels are consulted; there is no
//! explicit heading tree.

use docschema_markdown::{DocumentTree, NodeId, NodeKind};
use docschema_shared::{DocSchemaError, Result};

/// A heading found by [`backtrack`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingRef<'a> {
    pub id: NodeId,
    pub level: u8,
    pub text: &'a str,
}

/// The nearest heading at or before `element` among its siblings.
///
/// `element` itself is returned when it is a heading.
pub fn backtrack(tree: &DocumentTree, element: NodeId) -> Result<HeadingRef<'_>> {
    let mut cursor = element;
    loop {
        match tree.kind(cursor) {
            Some(NodeKind::Heading { level, text, .. }) => {
                return Ok(HeadingRef {
                    id: cursor,
                    level: *level,
                    text,
                });
            }
            Some(_) => {}
            None => {
                return Err(DocSchemaError::structure(format!(
                    "node {cursor} does not exist in {}",
                    tree.name()
                )));
            }
        }

        cursor = tree.prev_sibling(cursor).ok_or_else(|| {
            DocSchemaError::structure(format!(
                "no heading precedes node {element} in {}",
                tree.name()
            ))
        })?;
    }
}

/// Titles of the headings leading to `element`, outermost first.
///
/// The walk stops at the first heading whose level is `<= root_level`.
pub fn resolve_path(tree: &DocumentTree, element: NodeId, root_level: u8) -> Result<Vec<String>> {
    let heading = backtrack(tree, element)?;
    if heading.level <= root_level {
        return Ok(vec![heading.text.to_string()]);
    }

    let before = tree.prev_sibling(heading.id).ok_or_else(|| {
        DocSchemaError::structure(format!(
            "heading {:?} (level {}) in {} has no root heading before it",
            heading.text,
            heading.level,
            tree.name()
        ))
    })?;

    let mut path = resolve_path(tree, before, root_level)?;
    path.push(heading.text.to_string());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docschema_markdown::{from_html, normalize};

    fn first_table(tree: &DocumentTree) -> NodeId {
        tree.tables().next().expect("table").0
    }

    const TABLE: &str = "|a|b|\n|-|-|\n|1|2|\n";

    #[test]
    fn root_heading_directly_above() {
        let tree = normalize("doc", &format!("## General\n{TABLE}")).unwrap();
        assert_eq!(resolve_path(&tree, first_table(&tree), 2).unwrap(), vec!["General"]);
    }

    #[test]
    fn nested_heading_resolves_to_root() {
        let md = format!("## Layout\n\nintro\n\n### sub\n\n{TABLE}");
        let tree = normalize("doc", &md).unwrap();
        assert_eq!(
            resolve_path(&tree, first_table(&tree), 2).unwrap(),
            vec!["Layout", "sub"]
        );
    }

    #[test]
    fn narrative_between_heading_and_table_is_skipped() {
        let md = format!("### Input\n\nSome words.\n\n- a list\n- more\n\n{TABLE}");
        let tree = normalize("doc", &md).unwrap();
        assert_eq!(resolve_path(&tree, first_table(&tree), 3).unwrap(), vec!["Input"]);
    }

    #[test]
    fn shallower_heading_counts_as_root() {
        let tree = normalize("doc", &format!("# Title\n{TABLE}")).unwrap();
        assert_eq!(resolve_path(&tree, first_table(&tree), 3).unwrap(), vec!["Title"]);
    }

    #[test]
    fn three_levels_deep() {
        let md = format!("## A\n\n### B\n\n#### C\n\n{TABLE}");
        let tree = normalize("doc", &md).unwrap();
        assert_eq!(
            resolve_path(&tree, first_table(&tree), 2).unwrap(),
            vec!["A", "B", "C"]
        );
    }

    #[test]
    fn earlier_same_level_headings_chain_into_path() {
        // Document order only: the walk from "Shadow" passes through "Blur".
        let md = format!("### Decoration\n\n#### Blur\n\n{TABLE}\n#### Shadow\n\n{TABLE}");
        let tree = normalize("doc", &md).unwrap();
        let shadow_table = tree.tables().nth(1).unwrap().0;
        assert_eq!(
            resolve_path(&tree, shadow_table, 3).unwrap(),
            vec!["Decoration", "Blur", "Shadow"]
        );
    }

    #[test]
    fn orphan_table_is_structure_error() {
        let tree = normalize("doc", &format!("Intro text.\n\n{TABLE}")).unwrap();
        let err = resolve_path(&tree, first_table(&tree), 2).unwrap_err();
        assert!(matches!(err, DocSchemaError::DocumentStructure { .. }));
    }

    #[test]
    fn deep_heading_without_root_is_structure_error() {
        let tree = normalize("doc", &format!("### Orphan\n{TABLE}")).unwrap();
        let err = resolve_path(&tree, first_table(&tree), 2).unwrap_err();
        assert!(matches!(err, DocSchemaError::DocumentStructure { .. }));
    }

    #[test]
    fn backtrack_on_heading_returns_itself() {
        let tree = from_html("doc", "<h2>Only</h2>").unwrap();
        let heading = tree.headings().next().unwrap();
        let found = backtrack(&tree, heading).unwrap();
        assert_eq!(found.id, heading);
        assert_eq!(found.level, 2);
        assert_eq!(found.text, "Only");
    }

    #[test]
    fn backtrack_unknown_node() {
        let tree = from_html("doc", "<p>x</p>").unwrap();
        assert!(backtrack(&tree, 42).is_err());
    }
}
