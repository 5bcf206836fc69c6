#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use cli_dsl::builder::errors::BuildError;
use cli_dsl::handler::errors::HandlerError;
use cli_dsl::{Cli, Scope};

pub fn noop() {}

pub fn two(_: String, _: String) {}

pub fn three(_: String, _: String, _: i64) {}

/// Shared call log for handlers that record what they were called with.
pub type Calls = Rc<RefCell<Vec<String>>>;

pub fn calls() -> Calls {
    Rc::new(RefCell::new(Vec::new()))
}

/// A command block that satisfies validation with a zero-argument handler.
pub fn handled(scope: &mut Scope) -> Result<(), BuildError> {
    scope.handle(noop).bind(())
}

pub fn build_err<F>(block: F) -> BuildError
where
    F: FnOnce(&mut Scope) -> Result<(), BuildError>,
{
    match Cli::build(block) {
        Ok(_) => panic!("expected assembly to fail"),
        Err(err) => err,
    }
}

pub fn handler_err(err: &BuildError) -> &HandlerError {
    err.handler_error()
        .unwrap_or_else(|| panic!("expected a handler error, got: {err}"))
}
