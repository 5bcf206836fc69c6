pub mod errors;

use crate::tree::{CommandId, FlagRef};
use errors::ScopeError;

/// The node an operation writes to in the current scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Flag(FlagRef),
    Command(CommandId),
}

/// Binding slots: where each context-sensitive operation writes while a block runs.
///
/// `None` means the operation is unbound in this scope (e.g. `default` outside a
/// flag block). `name` and `version` are not slots: they always target the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bindings {
    pub description: Target,
    pub handler: Target,
    /// Collection receiving `flag`/`option`/`argument` declarations.
    pub flags: CommandId,
    /// Collection receiving `command` declarations.
    pub commands: CommandId,
    pub default: Option<FlagRef>,
    pub value: Option<FlagRef>,
    pub required: Option<CommandId>,
}

impl Bindings {
    /// Bindings of the top-level block: everything targets the root command.
    pub fn root() -> Self {
        Self {
            description: Target::Command(CommandId::ROOT),
            handler: Target::Command(CommandId::ROOT),
            flags: CommandId::ROOT,
            commands: CommandId::ROOT,
            default: None,
            value: None,
            required: None,
        }
    }

    /// Rebinding used inside a flag block. Collections and `required` are inherited.
    pub fn for_flag(self, flag: FlagRef) -> Self {
        Self {
            description: Target::Flag(flag),
            handler: Target::Flag(flag),
            default: Some(flag),
            value: Some(flag),
            ..self
        }
    }

    /// Rebinding used inside a command block.
    pub fn for_command(self, command: CommandId) -> Self {
        Self {
            description: Target::Command(command),
            handler: Target::Command(command),
            flags: command,
            commands: command,
            default: None,
            value: None,
            required: Some(command),
        }
    }
}

/// LIFO stack of complete binding snapshots, one per open declaration block.
#[derive(Debug, Default)]
pub struct ScopeStack {
    frames: Vec<Bindings>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Capture every slot of `current` into a new frame.
    pub fn enter(&mut self, current: &Bindings) {
        self.frames.push(*current);
    }

    /// Pop the most recent frame; the caller restores all slots from it at once.
    pub fn leave(&mut self) -> Result<Bindings, ScopeError> {
        self.frames.pop().ok_or(ScopeError::StackUnderflow)
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leave_without_enter_underflows() {
        let mut stack = ScopeStack::new();
        assert_eq!(stack.leave(), Err(ScopeError::StackUnderflow));
    }

    #[test]
    fn leave_returns_frames_in_reverse_order() {
        let mut stack = ScopeStack::new();
        let root = Bindings::root();
        let flag = root.for_flag(FlagRef::new(0, 3));

        stack.enter(&root);
        stack.enter(&flag);
        assert_eq!(stack.depth(), 2);

        assert_eq!(stack.leave(), Ok(flag));
        assert_eq!(stack.leave(), Ok(root));
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn flag_rebinding_keeps_collections_and_required() {
        let command = Bindings::root().for_command(CommandId(2));
        let flag = command.for_flag(FlagRef::new(0, 7));

        assert_eq!(flag.flags, CommandId(2));
        assert_eq!(flag.commands, CommandId(2));
        assert_eq!(flag.required, Some(CommandId(2)));
        assert_eq!(flag.default, Some(FlagRef::new(0, 7)));
        assert_eq!(flag.handler, Target::Flag(FlagRef::new(0, 7)));
    }

    #[test]
    fn command_rebinding_clears_flag_only_slots() {
        let flag = Bindings::root().for_flag(FlagRef::new(0, 1));
        let command = flag.for_command(CommandId(4));

        assert_eq!(command.default, None);
        assert_eq!(command.value, None);
        assert_eq!(command.description, Target::Command(CommandId(4)));
    }
}
