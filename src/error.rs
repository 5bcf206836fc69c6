use thiserror::Error;

use crate::builder::errors::BuildError;
use crate::handler::errors::HandlerError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Handler(#[from] HandlerError),

    #[error("Unknown command: '{0}'.")]
    UnknownCommand(String),

    #[error("Invalid setting: {0}.")]
    InvalidSetting(String),

    #[error("Output error: {0}.")]
    Output(String),

    #[error("While invoking '{command}': {source}")]
    InCommand {
        command: String,
        #[source]
        source: Box<CliError>,
    },
}
