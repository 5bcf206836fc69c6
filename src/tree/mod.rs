pub mod value;

use serde::{Serialize, Serializer};

use crate::handler::Handler;
pub use value::{Value, ValueSlot};

/// Opaque reference to a declared flag, usable in `required` and as a handler argument.
///
/// A reference only resolves inside the assembly that declared the flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlagRef {
    pub(crate) assembly: u32,
    pub(crate) index: usize,
}

impl FlagRef {
    pub(crate) const fn new(assembly: u32, index: usize) -> Self {
        Self { assembly, index }
    }
}

impl Serialize for FlagRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.index as u64)
    }
}

/// Identifies a command while the tree is being assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandId(pub(crate) usize);

impl CommandId {
    pub const ROOT: CommandId = CommandId(0);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagKind {
    /// Takes a value: `-c --config <value>`.
    Option,
    /// Switch or positional argument: `-v --version`, `<program>`.
    Positional,
}

#[derive(Debug, Clone, Serialize)]
pub struct Flag {
    pub id: FlagRef,
    pub name: String,
    pub kind: FlagKind,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip)]
    pub target: Option<ValueSlot>,
    pub handler: Handler,
}

impl Flag {
    pub(crate) fn new(id: FlagRef, name: String, kind: FlagKind) -> Self {
        Self {
            id,
            name,
            kind,
            description: String::new(),
            default: None,
            target: None,
            handler: Handler::default(),
        }
    }

    pub fn is_option(&self) -> bool {
        self.kind == FlagKind::Option
    }

    /// Whether `token` is one of the space-separated spellings in the flag's name.
    pub fn answers_to(&self, token: &str) -> bool {
        self.name == token || self.name.split_whitespace().any(|part| part == token)
    }

    /// Value written to the bound slot, falling back to the default.
    pub fn resolved(&self) -> Option<Value> {
        self.target
            .as_ref()
            .and_then(ValueSlot::get)
            .or_else(|| self.default.clone())
    }
}

/// Reference accepted by `required`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Requirement {
    Flag(FlagRef),
    Slot(ValueSlot),
}

impl From<FlagRef> for Requirement {
    fn from(flag: FlagRef) -> Self {
        Requirement::Flag(flag)
    }
}

impl From<ValueSlot> for Requirement {
    fn from(slot: ValueSlot) -> Self {
        Requirement::Slot(slot)
    }
}

impl From<&ValueSlot> for Requirement {
    fn from(slot: &ValueSlot) -> Self {
        Requirement::Slot(slot.clone())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Command {
    pub name: String,
    pub description: String,
    pub required: Vec<Requirement>,
    pub handler: Handler,
    pub flags: Vec<Flag>,
    pub commands: Vec<Command>,
}

impl Command {
    pub(crate) fn new(name: String) -> Self {
        let label = if name.is_empty() {
            String::new()
        } else {
            format!("command \"{}\"", name)
        };
        Self {
            name,
            description: String::new(),
            required: Vec::new(),
            handler: Handler::new(label),
            flags: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// Finds a flag declared anywhere in this subtree.
    pub fn flag(&self, id: FlagRef) -> Option<&Flag> {
        self.flags
            .iter()
            .find(|flag| flag.id == id)
            .or_else(|| self.commands.iter().find_map(|cmd| cmd.flag(id)))
    }

    /// Finds the first flag in this subtree (depth-first) answering to `token`.
    pub fn flag_named(&self, token: &str) -> Option<&Flag> {
        self.flags
            .iter()
            .find(|flag| flag.answers_to(token))
            .or_else(|| self.commands.iter().find_map(|cmd| cmd.flag_named(token)))
    }

    /// Follows a path of sub-command names; the empty path is `self`.
    pub fn find(&self, path: &[&str]) -> Option<&Command> {
        let Some((head, rest)) = path.split_first() else {
            return Some(self);
        };
        self.commands
            .iter()
            .find(|cmd| cmd.name == *head)
            .and_then(|cmd| cmd.find(rest))
    }

    /// Every flag in this subtree, parents before children.
    pub fn all_flags(&self) -> Vec<&Flag> {
        let mut out: Vec<&Flag> = self.flags.iter().collect();
        for cmd in &self.commands {
            out.extend(cmd.all_flags());
        }
        out
    }
}
