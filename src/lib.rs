//! Declarative, block-scoped construction of command/flag trees.
//!
//! An author describes the tree with nested closures. Each closure receives a
//! [`Scope`] whose operations (`description`, `default`, `handle`, ...) write to the
//! node whose block is running; the previous targets come back when the block
//! returns, whether it returns normally, with an error, or by panicking.
//!
//! ```
//! use cli_dsl::Cli;
//!
//! fn start(program: String) {
//!     println!("starting {program}");
//! }
//!
//! let cli = Cli::build(|root| {
//!     root.name("demo");
//!     root.version("0.1");
//!     let program = root.argument("<program>", |f| {
//!         f.description("Program to start");
//!         Ok(())
//!     })?;
//!     root.command("start", |c| {
//!         c.description("Start a program");
//!         c.required([program])?;
//!         c.handle(start).bind((program,))
//!     })
//! })
//! .unwrap();
//!
//! assert_eq!(cli.root().commands[0].name, "start");
//! assert!(cli.root().commands[0].handler.args_bound());
//! ```

pub mod args;
pub mod builder;
pub mod cli;
pub mod error;
pub mod handler;
pub mod output;
pub mod scope;
pub mod supervisor;
pub mod tree;
pub mod usage;
pub mod visuals;

pub use builder::Scope;
pub use cli::Cli;
pub use tree::{Command, Flag, FlagKind, FlagRef, Value, ValueSlot};
