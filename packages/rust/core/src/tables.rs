//! Variable tables → flat sections.

use tracing::{debug, instrument};

use docschema_markdown::{DocumentTree, TableNode};
use docschema_shared::{Result, Section, Variable};

use crate::heading_path::resolve_path;

/// Header row a table must have, exactly, to describe variables.
pub const SCHEMA_HEADER: [&str; 4] = ["name", "description", "type", "default"];

/// One section per variable table, in document order, without subsections.
///
/// Tables with any other header are ignored. Rows that do not have exactly
/// four cells are skipped; the rest of the table is still used.
#[instrument(skip_all, fields(document = tree.name(), root_level))]
pub fn extract_sections(tree: &DocumentTree, root_level: u8) -> Result<Vec<Section>> {
    let mut sections = Vec::new();

    for (id, table) in tree.tables() {
        if !is_schema_table(table) {
            debug!(node = id, header = ?table.header, "skipping non-variable table");
            continue;
        }

        let path = resolve_path(tree, id, root_level)?;
        let variables: Vec<Variable> = table
            .rows
            .iter()
            .filter_map(|row| row_to_variable(row))
            .collect();

        debug!(?path, variables = variables.len(), "section extracted");
        sections.push(Section {
            path,
            variables,
            subsections: Vec::new(),
        });
    }

    Ok(sections)
}

fn is_schema_table(table: &TableNode) -> bool {
    table.header.iter().map(|cell| cell.trim()).eq(SCHEMA_HEADER)
}

fn row_to_variable(row: &[String]) -> Option<Variable> {
    match row {
        [name, description, value_type, default] => Some(Variable::new(
            name.trim(),
            description.trim(),
            value_type.trim(),
            default.trim(),
        )),
        _ => None,
    }
}
