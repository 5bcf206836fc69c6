use tracing::{debug, info};

use crate::builder::Scope;
use crate::builder::errors::BuildError;
use crate::error::CliError;
use crate::handler::errors::HandlerError;
use crate::handler::{Arg, Handler, HandlerState};
use crate::tree::{Command, Flag, Value};
use crate::usage;

/// An assembled and validated command tree.
#[derive(Debug, Clone)]
pub struct Cli {
    version: String,
    root: Command,
}

impl Cli {
    /// Runs the top-level declaration block and returns the finished tree.
    ///
    /// Assembly is all or nothing: the first error from any nested block aborts it.
    pub fn build<F>(block: F) -> Result<Self, BuildError>
    where
        F: FnOnce(&mut Scope) -> Result<(), BuildError>,
    {
        let mut scope = Scope::root();
        let outcome = block(&mut scope);
        // A nested error the author swallowed still fails the whole assembly.
        if let Some(err) = scope.take_failure() {
            return Err(err);
        }
        outcome?;
        let (version, root) = scope.finish();
        debug!(
            flags = root.flags.len(),
            commands = root.commands.len(),
            "assembled command tree"
        );
        Ok(Self { version, root })
    }

    pub fn name(&self) -> &str {
        &self.root.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn description(&self) -> &str {
        &self.root.description
    }

    pub fn root(&self) -> &Command {
        &self.root
    }

    pub fn print_version(&self) {
        println!("{}", self.version);
    }

    pub fn print_usage(&self) {
        print!("{}", usage::help_page(self));
    }

    pub fn find(&self, path: &[&str]) -> Option<&Command> {
        self.root.find(path)
    }

    pub fn flag_named(&self, token: &str) -> Option<&Flag> {
        self.root.flag_named(token)
    }

    /// Seeds every bound value slot that is still empty with its flag's default.
    pub fn resolve_defaults(&self) {
        for flag in self.root.all_flags() {
            if let (Some(target), Some(default)) = (&flag.target, &flag.default)
                && target.is_empty()
            {
                target.set(default.clone());
            }
        }
    }

    /// Writes `raw` into the value slot of the flag answering to `token`.
    pub fn set(&self, token: &str, raw: &str) -> Result<(), CliError> {
        let flag = self
            .flag_named(token)
            .ok_or_else(|| CliError::InvalidSetting(format!("no flag named '{}'", token)))?;
        let target = flag.target.as_ref().ok_or_else(|| {
            CliError::InvalidSetting(format!("flag '{}' has no value target", flag.name))
        })?;
        target.set(Value::parse(raw));
        Ok(())
    }

    /// Calls the handler of the command at `path` with its bound arguments.
    pub fn invoke(&self, path: &[&str]) -> Result<(), CliError> {
        let joined = path.join(" ");
        let command = self
            .find(path)
            .ok_or_else(|| CliError::UnknownCommand(joined.clone()))?;
        info!(command = %joined, "invoking handler");
        self.call(&command.handler)
            .map_err(|e| CliError::InCommand {
                command: joined,
                source: Box::new(e.into()),
            })
    }

    /// Resolves a handler's bound arguments against the tree and calls it.
    pub fn call(&self, handler: &Handler) -> Result<(), HandlerError> {
        let HandlerState::ArgsBound(callback, args) = handler.state() else {
            return Err(HandlerError::NotBound {
                owner: owner_name(handler),
            });
        };
        let values: Vec<Option<Value>> = args.iter().map(|arg| self.resolve(arg)).collect();
        callback.call(&values)
    }

    /// Current value of a bound argument: slot value, then default, for flags.
    pub fn resolve(&self, arg: &Arg) -> Option<Value> {
        match arg {
            Arg::Literal(value) => Some(value.clone()),
            Arg::Flag(id) => self.root.flag(*id).and_then(Flag::resolved),
        }
    }
}

fn owner_name(handler: &Handler) -> String {
    match handler.parent_label() {
        "" => "an unlabelled node".to_string(),
        label => label.to_string(),
    }
}
