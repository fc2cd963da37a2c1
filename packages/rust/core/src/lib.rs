//! Documentation model for the configuration language.
//!
//! Sections come from variable tables and the headings above them; keywords
//! get their descriptions from the heading ranges that document them. Both
//! pipelines run once, in [`model::DocumentationModel::build`].

pub mod heading_path;
pub mod hierarchy;
pub mod keywords;
pub mod model;
pub mod registry;
pub mod slug;
pub mod sources;
pub mod tables;

pub use keywords::{ExtractOptions, KeywordDiagnostic};
pub use model::{DocumentationModel, ModelConfig};
pub use sources::{DirectorySource, Document, DocumentSource, EmbeddedSource, MemorySource};
