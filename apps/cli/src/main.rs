//! docschema CLI: dump and query the configuration documentation model.
//!
//! Builds the model once from the embedded documents (or a directory set in
//! the config file) and prints sections, keywords or single variables.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
