//! Application configuration for docschema.
//!
//! User config lives at `~/.docschema/docschema.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DocSchemaError, Result};
use crate::types::DocumentSpec;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "docschema.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".docschema";

// ---------------------------------------------------------------------------
// Config structs (matching docschema.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where documents are read from.
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Description rendering.
    #[serde(default)]
    pub render: RenderConfig,

    /// Diagnostic output.
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,

    /// Documents parsed into sections, in merge order.
    #[serde(default = "default_documents")]
    pub documents: Vec<DocumentSpec>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sources: SourcesConfig::default(),
            render: RenderConfig::default(),
            diagnostics: DiagnosticsConfig::default(),
            documents: default_documents(),
        }
    }
}

/// The built-in document set: the variables reference plus the two layout
/// pages, whose top-level sections are merged under the layout name.
pub fn default_documents() -> Vec<DocumentSpec> {
    vec![
        DocumentSpec::new("Variables", 3),
        DocumentSpec::new("Master-Layout", 2).with_root_name("Master"),
        DocumentSpec::new("Dwindle-Layout", 2).with_root_name("Dwindle"),
    ]
}

/// `[sources]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Directory holding `<name>.md` files. When unset, the documents
    /// embedded in the binary are used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

/// `[render]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Base URL that relative links in descriptions are resolved against.
    #[serde(default = "default_link_base_url")]
    pub link_base_url: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            link_base_url: default_link_base_url(),
        }
    }
}

fn default_link_base_url() -> String {
    "https://wiki.hyprland.org/Configuring/Variables/".into()
}

/// `[diagnostics]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    /// Report siblings dropped during range capture at warn level.
    #[serde(default)]
    pub verbose: bool,
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.docschema/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| DocSchemaError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.docschema/docschema.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DocSchemaError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        DocSchemaError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    validate_config(&config)?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    init_config_at(&config_file_path()?)
}

/// Write a default config file at `path`, creating parent directories.
pub fn init_config_at(path: &Path) -> Result<PathBuf> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| DocSchemaError::io(dir, e))?;
    }

    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| DocSchemaError::config(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| DocSchemaError::io(path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path.to_path_buf())
}

/// Reject configs the model builder cannot work with.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    Url::parse(&config.render.link_base_url).map_err(|e| {
        DocSchemaError::config(format!(
            "render.link_base_url {:?} is not a valid URL: {e}",
            config.render.link_base_url
        ))
    })?;

    for doc in &config.documents {
        if doc.name.trim().is_empty() {
            return Err(DocSchemaError::config("document entry with an empty name"));
        }
        if !(1..=6).contains(&doc.heading_root_level) {
            return Err(DocSchemaError::config(format!(
                "document {}: heading_root_level must be between 1 and 6, got {}",
                doc.name, doc.heading_root_level
            )));
        }
    }

    Ok(())
}
