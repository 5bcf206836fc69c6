pub mod args;

use serde::Serialize;

use crate::cli::Cli;
use crate::error::CliError;
use crate::tree::Command;
use crate::{usage, visuals};
use args::OutputFormat;

#[derive(Serialize)]
struct TreeDump<'a> {
    name: &'a str,
    version: &'a str,
    description: &'a str,
    root: &'a Command,
}

/// The assembled tree as pretty JSON, in declaration order.
pub fn tree_json(cli: &Cli) -> Result<String, CliError> {
    let dump = TreeDump {
        name: cli.name(),
        version: cli.version(),
        description: cli.description(),
        root: cli.root(),
    };
    serde_json::to_string_pretty(&dump)
        .map_err(|e| CliError::Output(format!("failed to serialize tree: {}", e)))
}

pub fn render(cli: &Cli, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Text => Ok(usage::help_page(cli)),
        OutputFormat::Json => tree_json(cli).map(|json| json + "\n"),
        OutputFormat::Table => Ok(format!("{}\n", visuals::summary_table(cli))),
        OutputFormat::Version => Ok(format!("{}\n", cli.version())),
    }
}

pub fn emit(cli: &Cli, format: OutputFormat) -> Result<(), CliError> {
    print!("{}", render(cli, format)?);
    Ok(())
}
