use thiserror::Error;

use crate::handler::errors::HandlerError;
use crate::scope::errors::ScopeError;

#[derive(Debug, Clone, Error)]
pub enum BuildError {
    #[error(transparent)]
    Handler(#[from] HandlerError),

    #[error(transparent)]
    Scope(#[from] ScopeError),

    #[error("{operation}() is not available in this block.")]
    Unbound { operation: &'static str },

    #[error("Required() got flag '{flag}' which {reason}.")]
    InvalidRequirement { flag: String, reason: &'static str },

    #[error("Bind() got flag '{flag}' which {reason}.")]
    InvalidArgument { flag: String, reason: &'static str },

    #[error("{label}: {source}")]
    InCommand {
        label: String,
        #[source]
        source: Box<BuildError>,
    },
}

impl BuildError {
    /// Attaches a handler's owner label; unlabelled owners (root, flags) pass through.
    pub(crate) fn labelled(label: &str, source: BuildError) -> BuildError {
        if label.is_empty() {
            source
        } else {
            BuildError::InCommand {
                label: label.to_string(),
                source: Box::new(source),
            }
        }
    }

    /// Label of the command the error was reported against, if any.
    pub fn label(&self) -> Option<&str> {
        match self {
            BuildError::InCommand { label, .. } => Some(label),
            _ => None,
        }
    }

    /// The error with every command label peeled off.
    pub fn root_cause(&self) -> &BuildError {
        match self {
            BuildError::InCommand { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub fn handler_error(&self) -> Option<&HandlerError> {
        match self.root_cause() {
            BuildError::Handler(err) => Some(err),
            _ => None,
        }
    }
}
