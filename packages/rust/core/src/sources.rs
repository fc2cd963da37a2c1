//! Where documents come from.
//!
//! The default source serves documents compiled into the binary; a
//! directory source reads `<dir>/<name>.md` for working on the docs
//! without rebuilding.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::debug;

use docschema_shared::{DocSchemaError, Result};

/// Raw markup plus the name it was requested under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub name: String,
    pub text: String,
}

/// Loads documents by name.
pub trait DocumentSource {
    /// Load the document called `name`. Missing documents are
    /// [`DocSchemaError::Load`] errors.
    fn load(&self, name: &str) -> Result<Document>;

    /// Human-readable source name for tracing.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Embedded
// ---------------------------------------------------------------------------

const EMBEDDED: &[(&str, &str)] = &[
    ("Variables", include_str!("../sources/Variables.md")),
    ("Master-Layout", include_str!("../sources/Master-Layout.md")),
    ("Dwindle-Layout", include_str!("../sources/Dwindle-Layout.md")),
    ("Keywords", include_str!("../sources/Keywords.md")),
    ("Monitors", include_str!("../sources/Monitors.md")),
    ("Binds", include_str!("../sources/Binds.md")),
];

/// Documents bundled into the binary at build time.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedSource;

impl EmbeddedSource {
    /// Names of all bundled documents.
    pub fn names() -> impl Iterator<Item = &'static str> {
        EMBEDDED.iter().map(|(name, _)| *name)
    }
}

impl DocumentSource for EmbeddedSource {
    fn load(&self, name: &str) -> Result<Document> {
        EMBEDDED
            .iter()
            .find(|(embedded, _)| *embedded == name)
            .map(|(name, text)| Document {
                name: name.to_string(),
                text: text.to_string(),
            })
            .ok_or_else(|| {
                let available = Self::names().collect::<Vec<_>>().join(", ");
                DocSchemaError::load(name, format!("not in the embedded bundle ({available})"))
            })
    }

    fn name(&self) -> &str {
        "embedded"
    }
}

// ---------------------------------------------------------------------------
// Directory
// ---------------------------------------------------------------------------

/// Reads `<dir>/<name>.md`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
    label: String,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let label = dir.display().to_string();
        Self { dir, label }
    }
}

impl DocumentSource for DirectorySource {
    fn load(&self, name: &str) -> Result<Document> {
        let path = self.dir.join(format!("{name}.md"));
        debug!(path = %path.display(), "reading document");
        let text = std::fs::read_to_string(&path)
            .map_err(|e| DocSchemaError::load(name, format!("{}: {e}", path.display())))?;
        Ok(Document {
            name: name.to_string(),
            text,
        })
    }

    fn name(&self) -> &str {
        &self.label
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Documents held in a map; handy for embedding callers and tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: BTreeMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.documents.insert(name.into(), text.into());
        self
    }
}

impl DocumentSource for MemorySource {
    fn load(&self, name: &str) -> Result<Document> {
        self.documents
            .get(name)
            .map(|text| Document {
                name: name.to_string(),
                text: text.clone(),
            })
            .ok_or_else(|| DocSchemaError::load(name, "no such document"))
    }

    fn name(&self) -> &str {
        "memory"
    }
}
