use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScopeError {
    #[error("Scope stack underflow: leave() called without a matching enter().")]
    StackUnderflow,
}
