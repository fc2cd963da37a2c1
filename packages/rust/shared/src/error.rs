//! Error types for docschema.
//!
//! Library crates use [`DocSchemaError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all docschema operations.
#[derive(Debug, thiserror::Error)]
pub enum DocSchemaError {
    /// The document tree does not have the shape the extractor relies on
    /// (e.g. a table with no heading anywhere before it).
    #[error("document structure error: {message}")]
    DocumentStructure { message: String },

    /// A token in the document could not be parsed (e.g. a heading level).
    #[error("parse error: {message}")]
    Parse { message: String },

    /// A named document could not be loaded from its source.
    #[error("failed to load document {name}: {message}")]
    Load { name: String, message: String },

    /// No heading in a document matched the requested anchor slug.
    #[error("no heading matching {slug:?} in {document}")]
    LookupMiss { slug: String, document: String },

    /// A node could not be serialized back to markup.
    #[error("serialization fault: {0}")]
    Serialization(String),

    /// HTML-to-Markdown conversion error.
    #[error("conversion error: {0}")]
    Conversion(String),

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocSchemaError>;

impl DocSchemaError {
    /// Create a document structure error from any displayable message.
    pub fn structure(msg: impl Into<String>) -> Self {
        Self::DocumentStructure {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a load error for the named document.
    pub fn load(name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Load {
            name: name.into(),
            message: msg.into(),
        }
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error aborts model construction.
    ///
    /// Structure and parse errors mean the schema cannot be built at all;
    /// the rest only degrade a single keyword to an empty description.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::DocumentStructure { .. }
            | Self::Parse { .. }
            | Self::Config { .. }
            | Self::Io { .. } => true,
            Self::Load { .. }
            | Self::LookupMiss { .. }
            | Self::Serialization(_)
            | Self::Conversion(_) => false,
        }
    }
}
