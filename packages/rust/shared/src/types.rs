//! Core domain types for the documentation schema.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Variable
// ---------------------------------------------------------------------------

/// A single documented configuration variable (one table row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub value_type: String,
    pub default: String,
}

impl Variable {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        value_type: impl Into<String>,
        default: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            value_type: value_type.into(),
            default: default.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Section
// ---------------------------------------------------------------------------

/// A named group of variables, identified by the chain of heading titles
/// leading to its table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Heading titles from the top-level ancestor down to this section.
    /// Never empty; length 1 for roots.
    pub path: Vec<String>,
    /// Variables in document order.
    pub variables: Vec<Variable>,
    /// Nested sections. Only populated on roots, one level deep.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subsections: Vec<Section>,
}

impl Section {
    /// The section's own title (last path element).
    pub fn name(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or_default()
    }

    /// The title of the top-level ancestor (first path element).
    pub fn root_name(&self) -> &str {
        self.path.first().map(String::as_str).unwrap_or_default()
    }

    /// Whether this section sits directly under a top-level heading.
    pub fn is_root(&self) -> bool {
        self.path.len() == 1
    }

    /// First variable named `name`, in document order.
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }
}

// ---------------------------------------------------------------------------
// Keyword
// ---------------------------------------------------------------------------

/// A registry entry whose description is resolved from a documentation
/// heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub name: String,
    /// Document to search, by source name (e.g. `Dispatchers`).
    documentation_file: String,
    /// Anchor of the heading whose content becomes the description.
    documentation_heading_slug: String,
    description: String,
}

impl Keyword {
    /// A keyword whose description will be looked up in `file` under the
    /// heading anchored at `slug`.
    pub fn new(
        name: impl Into<String>,
        file: impl Into<String>,
        slug: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            documentation_file: file.into(),
            documentation_heading_slug: slug.into(),
            description: String::new(),
        }
    }

    /// A keyword that already carries its description; extraction skips it.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn documentation_file(&self) -> &str {
        &self.documentation_file
    }

    pub fn documentation_heading_slug(&self) -> &str {
        &self.documentation_heading_slug
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Store the description unless one is already present.
    ///
    /// Returns `true` if the description was written.
    pub fn fill_description(&mut self, description: impl Into<String>) -> bool {
        if !self.description.is_empty() {
            return false;
        }
        self.description = description.into();
        true
    }
}

// ---------------------------------------------------------------------------
// DocumentSpec
// ---------------------------------------------------------------------------

/// How one source document is turned into sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSpec {
    /// Source name, resolved through a document source.
    pub name: String,
    /// Headings at this level or above (lower number) start a root section.
    pub heading_root_level: u8,
    /// Replaces the first path element of every section parsed from this
    /// document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_name: Option<String>,
}

impl DocumentSpec {
    pub fn new(name: impl Into<String>, heading_root_level: u8) -> Self {
        Self {
            name: name.into(),
            heading_root_level,
            root_name: None,
        }
    }

    pub fn with_root_name(mut self, root_name: impl Into<String>) -> Self {
        self.root_name = Some(root_name.into());
        self
    }
}
