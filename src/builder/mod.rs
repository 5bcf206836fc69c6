pub mod errors;

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU32, Ordering};

use tracing::{debug, trace, warn};

use crate::handler::{self, Arg, Handler, IntoArgs, IntoCallback};
use crate::scope::{Bindings, ScopeStack, Target};
use crate::tree::{Command, CommandId, Flag, FlagKind, FlagRef, Requirement, Value, ValueSlot};
use errors::BuildError;

/// Tags every assembly so a `FlagRef` cannot resolve inside a different tree.
static ASSEMBLIES: AtomicU32 = AtomicU32::new(1);

struct FlagNode {
    flag: Flag,
    /// Set once the declaration block returned and the flag joined its collection.
    owner: Option<CommandId>,
}

struct CommandNode {
    command: Command,
    parent: Option<CommandId>,
    flags: Vec<FlagRef>,
    commands: Vec<CommandId>,
}

impl CommandNode {
    fn new(name: String, parent: Option<CommandId>) -> Self {
        Self {
            command: Command::new(name),
            parent,
            flags: Vec::new(),
            commands: Vec::new(),
        }
    }
}

/// Declaration context handed to every block.
///
/// Operations write into whatever node the current [`Bindings`] target; node
/// builders rebind them for the duration of a nested block and restore them after.
pub struct Scope {
    assembly: u32,
    version: String,
    flags: Vec<FlagNode>,
    commands: Vec<CommandNode>,
    bindings: Bindings,
    stack: ScopeStack,
    /// First error any operation reported; assembly fails with it even if a block discarded it.
    failed: Option<BuildError>,
}

/// An open nested scope; leaving happens on drop, so `?` and panics restore the parent.
struct Frame<'s> {
    scope: &'s mut Scope,
}

impl Deref for Frame<'_> {
    type Target = Scope;

    fn deref(&self) -> &Scope {
        &*self.scope
    }
}

impl DerefMut for Frame<'_> {
    fn deref_mut(&mut self) -> &mut Scope {
        &mut *self.scope
    }
}

impl Drop for Frame<'_> {
    fn drop(&mut self) {
        match self.scope.stack.leave() {
            Ok(saved) => {
                self.scope.bindings = saved;
                trace!(depth = self.scope.stack.depth(), "left scope");
            }
            // Frames pair every leave with an enter; reaching this is a builder bug.
            Err(err) => panic!("{err}"),
        }
    }
}

/// Second stage of `handle`: supplies the arguments the callback will be called with.
#[must_use = "a command whose handler arguments are never bound fails validation"]
pub struct Binder<'a> {
    scope: &'a mut Scope,
}

impl Binder<'_> {
    pub fn bind(self, args: impl IntoArgs) -> Result<(), BuildError> {
        self.scope.bind_args(args.into_args())
    }
}

impl Scope {
    pub(crate) fn root() -> Self {
        Self {
            assembly: ASSEMBLIES.fetch_add(1, Ordering::Relaxed),
            version: String::new(),
            flags: Vec::new(),
            commands: vec![CommandNode::new(String::new(), None)],
            bindings: Bindings::root(),
            stack: ScopeStack::new(),
            failed: None,
        }
    }

    /// Snapshot of the current binding slots.
    pub fn bindings(&self) -> Bindings {
        self.bindings
    }

    /// Number of enclosing declaration blocks.
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    fn enter(&mut self, bindings: Bindings) -> Frame<'_> {
        self.stack.enter(&self.bindings);
        self.bindings = bindings;
        trace!(depth = self.stack.depth(), "entered scope");
        Frame { scope: self }
    }

    /// Remembers the first error of the assembly and hands it back to the caller.
    fn fail(&mut self, err: BuildError) -> BuildError {
        if self.failed.is_none() {
            warn!(error = %err, "assembly failed");
            self.failed = Some(err.clone());
        }
        err
    }

    pub(crate) fn take_failure(&mut self) -> Option<BuildError> {
        self.failed.take()
    }

    pub fn name(&mut self, name: impl Into<String>) {
        self.commands[CommandId::ROOT.0].command.name = name.into();
    }

    pub fn version(&mut self, version: impl Into<String>) {
        self.version = version.into();
    }

    pub fn description(&mut self, text: impl Into<String>) {
        let text = text.into();
        match self.bindings.description {
            Target::Flag(id) => self.flags[id.index].flag.description = text,
            Target::Command(id) => self.commands[id.0].command.description = text,
        }
    }

    pub fn default(&mut self, value: impl Into<Value>) -> Result<(), BuildError> {
        let Some(id) = self.bindings.default else {
            return Err(self.fail(BuildError::Unbound { operation: "Default" }));
        };
        self.flags[id.index].flag.default = Some(value.into());
        Ok(())
    }

    pub fn value(&mut self, slot: &ValueSlot) -> Result<(), BuildError> {
        let Some(id) = self.bindings.value else {
            return Err(self.fail(BuildError::Unbound { operation: "Value" }));
        };
        self.flags[id.index].flag.target = Some(slot.clone());
        Ok(())
    }

    /// Declares a positional-style flag such as `-v --version` or `<program>`.
    pub fn flag<F>(&mut self, name: impl Into<String>, block: F) -> Result<FlagRef, BuildError>
    where
        F: FnOnce(&mut Scope) -> Result<(), BuildError>,
    {
        self.declare_flag(name.into(), FlagKind::Positional, block)
    }

    /// Declares an option-style flag that takes a value.
    pub fn option<F>(&mut self, name: impl Into<String>, block: F) -> Result<FlagRef, BuildError>
    where
        F: FnOnce(&mut Scope) -> Result<(), BuildError>,
    {
        self.declare_flag(name.into(), FlagKind::Option, block)
    }

    pub fn argument<F>(&mut self, name: impl Into<String>, block: F) -> Result<FlagRef, BuildError>
    where
        F: FnOnce(&mut Scope) -> Result<(), BuildError>,
    {
        self.declare_flag(name.into(), FlagKind::Positional, block)
    }

    fn declare_flag<F>(&mut self, name: String, kind: FlagKind, block: F) -> Result<FlagRef, BuildError>
    where
        F: FnOnce(&mut Scope) -> Result<(), BuildError>,
    {
        let owner = self.bindings.flags;
        let id = FlagRef::new(self.assembly, self.flags.len());
        debug!(flag = %name, ?kind, "declaring flag");
        self.flags.push(FlagNode {
            flag: Flag::new(id, name, kind),
            owner: None,
        });

        let outcome = {
            let rebound = self.bindings.for_flag(id);
            let mut frame = self.enter(rebound);
            block(&mut frame)
        };
        outcome.map_err(|e| self.fail(e))?;

        self.flags[id.index].owner = Some(owner);
        self.commands[owner.0].flags.push(id);
        Ok(id)
    }

    /// Declares a sub-command of the current command. Its block must register and
    /// bind a handler.
    pub fn command<F>(&mut self, name: impl Into<String>, block: F) -> Result<(), BuildError>
    where
        F: FnOnce(&mut Scope) -> Result<(), BuildError>,
    {
        let name = name.into();
        let parent = self.bindings.commands;
        let id = CommandId(self.commands.len());
        debug!(command = %name, "declaring command");
        self.commands.push(CommandNode::new(name, Some(parent)));

        let outcome = {
            let rebound = self.bindings.for_command(id);
            let mut frame = self.enter(rebound);
            block(&mut frame)
        };
        outcome.map_err(|e| self.fail(e))?;

        let registered = &self.commands[id.0].command.handler;
        if let Err(e) = handler::validate(registered) {
            let err = BuildError::labelled(registered.parent_label(), e.into());
            return Err(self.fail(err));
        }

        self.commands[parent.0].commands.push(id);
        Ok(())
    }

    /// Marks flags (or value slots) as mandatory for the current command.
    pub fn required<I, R>(&mut self, refs: I) -> Result<(), BuildError>
    where
        I: IntoIterator<Item = R>,
        R: Into<Requirement>,
    {
        let Some(command) = self.bindings.required else {
            return Err(self.fail(BuildError::Unbound { operation: "Required" }));
        };
        for requirement in refs {
            let requirement = requirement.into();
            if let Requirement::Flag(flag) = &requirement
                && let Err((flag, reason)) = self.check_visible(command, *flag)
            {
                return Err(self.fail(BuildError::InvalidRequirement { flag, reason }));
            }
            self.commands[command.0].command.required.push(requirement);
        }
        Ok(())
    }

    /// A flag is visible from `command` once it is attached to it or to one of its
    /// ancestors. On failure returns the flag's display name and the reason.
    fn check_visible(
        &self,
        command: CommandId,
        flag: FlagRef,
    ) -> Result<(), (String, &'static str)> {
        let node = self
            .flags
            .get(flag.index)
            .filter(|_| flag.assembly == self.assembly)
            .ok_or_else(|| (format!("#{}", flag.index), "was not declared by this builder"))?;
        let Some(owner) = node.owner else {
            return Err((node.flag.name.clone(), "is still being declared"));
        };

        let mut cursor = Some(command);
        while let Some(current) = cursor {
            if current == owner {
                return Ok(());
            }
            cursor = self.commands[current.0].parent;
        }
        Err((node.flag.name.clone(), "is not visible from this command"))
    }

    fn handler_mut(&mut self) -> &mut Handler {
        match self.bindings.handler {
            Target::Flag(id) => &mut self.flags[id.index].flag.handler,
            Target::Command(id) => &mut self.commands[id.0].command.handler,
        }
    }

    /// Registers `callback` for the current node and returns the binder for its arguments.
    ///
    /// The callback's parameter count is part of its type, so passing something that
    /// is not a function does not compile:
    ///
    /// ```compile_fail
    /// cli_dsl::Cli::build(|root| {
    ///     root.handle("not a function").bind(())
    /// });
    /// ```
    pub fn handle<C, P>(&mut self, callback: C) -> Binder<'_>
    where
        C: IntoCallback<P>,
    {
        let callback = callback.into_callback();
        let handler = self.handler_mut();
        debug!(
            callback = callback.name(),
            arity = callback.arity(),
            owner = handler.parent_label(),
            "registering handler"
        );
        handler.set_callback(callback);
        Binder { scope: self }
    }

    /// Flags passed as arguments must be visible from the node whose handler is bound.
    fn bind_args(&mut self, args: Vec<Arg>) -> Result<(), BuildError> {
        let label = self.handler_mut().parent_label().to_string();
        let visible_from = self.bindings.flags;
        for arg in &args {
            if let Arg::Flag(flag) = arg
                && let Err((flag, reason)) = self.check_visible(visible_from, *flag)
            {
                let err = BuildError::labelled(&label, BuildError::InvalidArgument { flag, reason });
                return Err(self.fail(err));
            }
        }
        if let Err(e) = self.handler_mut().bind(args) {
            return Err(self.fail(BuildError::labelled(&label, e.into())));
        }
        Ok(())
    }

    /// Moves the attached nodes out of the arena into an owned tree.
    pub(crate) fn finish(self) -> (String, Command) {
        let mut flags: Vec<Option<Flag>> = self.flags.into_iter().map(|n| Some(n.flag)).collect();
        let mut commands: Vec<Option<CommandNode>> =
            self.commands.into_iter().map(Some).collect();
        let root = assemble(CommandId::ROOT, &mut flags, &mut commands);
        (self.version, root)
    }
}

fn assemble(
    id: CommandId,
    flags: &mut [Option<Flag>],
    commands: &mut [Option<CommandNode>],
) -> Command {
    let Some(node) = commands[id.0].take() else {
        return Command::new(String::new());
    };
    let mut command = node.command;
    command.flags = node
        .flags
        .iter()
        .filter_map(|flag| flags[flag.index].take())
        .collect();
    command.commands = node
        .commands
        .iter()
        .map(|child| assemble(*child, flags, commands))
        .collect();
    command
}
