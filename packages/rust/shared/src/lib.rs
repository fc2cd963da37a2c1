//! Shared types, error model, and configuration for docschema.
//!
//! This crate is the foundation depended on by all other docschema crates.
//! It provides:
//! - [`DocSchemaError`], the unified error type
//! - Domain types ([`Section`], [`Variable`], [`Keyword`], [`DocumentSpec`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DiagnosticsConfig, RenderConfig, SourcesConfig, config_dir, config_file_path,
    default_documents, init_config, init_config_at, load_config, load_config_from,
    validate_config,
};
pub use error::{DocSchemaError, Result};
pub use types::{DocumentSpec, Keyword, Section, Variable};
