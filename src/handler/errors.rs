use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum HandlerError {
    #[error("Command() section is declared but method Handle() was not invoked in there.")]
    MissingHandler,

    #[error(
        "Handle() for {callback} was invoked, but no arguments were specified for this handler."
    )]
    ArgsNotBound { callback: String },

    #[error("Unable to call {callback}: expected {expected} args but got {got}.")]
    ArityMismatch {
        callback: String,
        expected: usize,
        got: usize,
    },

    #[error("Handler of {owner} has no bound arguments to call with.")]
    NotBound { owner: String },

    #[error("Missing value, expected {expected}.")]
    MissingValue { expected: &'static str },

    #[error("Expected {expected}, got {found}.")]
    ValueType {
        expected: &'static str,
        found: &'static str,
    },

    #[error("In argument {position}: {source}")]
    InArgument {
        position: usize,
        #[source]
        source: Box<HandlerError>,
    },
}
