//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use docschema_core::{DirectorySource, DocumentationModel, EmbeddedSource, ModelConfig};
use docschema_shared::{
    AppConfig, Section, init_config, init_config_at, load_config, load_config_from,
};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// docschema: the configuration documentation as a queryable schema.
#[derive(Parser)]
#[command(
    name = "docschema",
    version,
    about = "Extract config sections, variables and keyword docs from the documentation.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.docschema/docschema.toml.
    #[arg(long, global = true, env = "DOCSCHEMA_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// List every section and its variables.
    Sections {
        /// Print the section tree as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List keywords with their descriptions.
    Keywords {
        /// Print keywords as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show a section, or one variable of it.
    Lookup {
        /// Section name (`Snap`) or colon-separated path (`General:Snap`).
        section: String,

        /// Variable name within the section.
        variable: Option<String>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults (at `--config` when given).
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "docschema=info",
        1 => "docschema=debug",
        _ => "docschema=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Sections { json } => cmd_sections(config_path, json),
        Command::Keywords { json } => cmd_keywords(config_path, json),
        Command::Lookup { section, variable } => {
            cmd_lookup(config_path, &section, variable.as_deref())
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(config_path),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

/// Load config, pick the document source and build the model.
fn build_model(config_path: Option<&Path>) -> Result<DocumentationModel> {
    let config = resolve_config(config_path)?;
    let model_config = ModelConfig::from_app_config(&config)?;

    let model = match config.sources.dir.as_deref() {
        Some(dir) => {
            info!(dir, "reading documents from directory");
            DocumentationModel::build(model_config, &DirectorySource::new(dir))?
        }
        None => DocumentationModel::build(model_config, &EmbeddedSource)?,
    };
    Ok(model)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_sections(config_path: Option<&Path>, json: bool) -> Result<()> {
    let model = build_model(config_path)?;

    if json {
        // Roots carry their subsections. Nested sections without a root are
        // listed at top level.
        let top: Vec<&Section> = model
            .sections()
            .iter()
            .filter(|s| s.is_root() || model.section_by_path(&[s.root_name()]).is_none())
            .collect();
        println!("{}", serde_json::to_string_pretty(&top)?);
        return Ok(());
    }

    for section in model.sections() {
        let indent = "  ".repeat(section.path.len() - 1);
        println!(
            "{indent}{} ({} variables)",
            section.path.join(":"),
            section.variables.len()
        );
    }
    Ok(())
}

fn cmd_keywords(config_path: Option<&Path>, json: bool) -> Result<()> {
    let model = build_model(config_path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(model.keywords())?);
        return Ok(());
    }

    for keyword in model.keywords() {
        println!("{}", keyword.name);
        if keyword.description().is_empty() {
            println!("    (no description)");
        }
        for line in keyword.description().lines() {
            println!("    {line}");
        }
        println!();
    }

    for diagnostic in model.diagnostics() {
        eprintln!("{}: {}", diagnostic.keyword, diagnostic.error);
    }
    Ok(())
}

fn cmd_lookup(config_path: Option<&Path>, section: &str, variable: Option<&str>) -> Result<()> {
    let model = build_model(config_path)?;

    let found = if section.contains(':') {
        let path: Vec<&str> = section.split(':').collect();
        model.section_by_path(&path)
    } else {
        model.section(section)
    };
    let found = found.ok_or_else(|| eyre!("no section '{section}'"))?;

    match variable {
        Some(name) => {
            let var = found
                .variable(name)
                .ok_or_else(|| eyre!("no variable '{name}' in section '{section}'"))?;
            println!("{}:{}", found.path.join(":"), var.name);
            println!("  type:    {}", var.value_type);
            println!("  default: {}", var.default);
            println!("  {}", var.description);
        }
        None => {
            println!("{}", found.path.join(":"));
            for var in &found.variables {
                println!(
                    "  {:<28} {:<10} {:<14} {}",
                    var.name, var.value_type, var.default, var.description
                );
            }
            for sub in &found.subsections {
                println!("  [{}] ({} variables)", sub.path.join(":"), sub.variables.len());
            }
        }
    }
    Ok(())
}

fn cmd_config_init(config_path: Option<&Path>) -> Result<()> {
    let path = match config_path {
        Some(path) => init_config_at(path)?,
        None => init_config()?,
    };
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
