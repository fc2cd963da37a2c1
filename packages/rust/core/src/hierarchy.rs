//! Section hierarchy post-processing.
//!
//! Nesting is one level deep: every non-root section is attached directly
//! under the root sharing its first path element, whatever its depth.

use tracing::debug;

use docschema_shared::{Section, Variable};

/// Give every root section the non-root sections that share its root name,
/// in document order. The flat list keeps all sections.
pub fn attach_subsections(mut sections: Vec<Section>) -> Vec<Section> {
    let nested: Vec<Section> = sections.iter().filter(|s| !s.is_root()).cloned().collect();

    for root in sections.iter_mut().filter(|s| s.is_root()) {
        let subsections: Vec<Section> = nested
            .iter()
            .filter(|s| s.root_name() == root.root_name())
            .cloned()
            .collect();
        debug!(root = root.name(), count = subsections.len(), "attached subsections");
        root.subsections = subsections;
    }

    sections
}

/// Replace the first path element of every section, subsections included.
///
/// Used to merge independently parsed documents under one top-level name.
pub fn rename_root(sections: &mut [Section], root_name: &str) {
    for section in sections {
        if let Some(first) = section.path.first_mut() {
            *first = root_name.to_string();
        }
        rename_root(&mut section.subsections, root_name);
    }
}

/// Append `variables` to every section named `section_name`.
pub fn append_variables(sections: &mut [Section], section_name: &str, variables: &[Variable]) {
    for section in sections.iter_mut().filter(|s| s.name() == section_name) {
        section.variables.extend_from_slice(variables);
    }
}
