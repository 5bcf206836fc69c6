//! Example tree: a tiny process supervisor with `start` and `stop` commands.
//!
//! The handlers only report what they would do; signalling processes is not
//! this crate's business.

pub mod args;

use std::cell::RefCell;
use std::rc::Rc;

use tracing::info;

use crate::builder::errors::BuildError;
use crate::cli::Cli;
use crate::error::CliError;
use crate::tree::ValueSlot;
use crate::usage;
use args::InvokeArgs;

pub const VERSION: &str = "1.0";

/// The declared tree plus the value slots its flags write into.
pub struct Supervisor {
    pub cli: Cli,
    pub config: ValueSlot,
    pub program: ValueSlot,
    pub signal: ValueSlot,
}

pub fn print_version(version: String) {
    println!("{version}");
}

pub fn handle_start(config: String, program: String) {
    info!(%config, %program, "start requested");
    println!("start {program} (config: {config})");
}

pub fn handle_stop(config: String, program: Option<String>, signal: i64) {
    info!(%config, ?program, signal, "stop requested");
    match program {
        Some(program) => println!("stop {program} with signal {signal} (config: {config})"),
        None => println!("stop all programs with signal {signal} (config: {config})"),
    }
}

pub fn declare() -> Result<Supervisor, BuildError> {
    let config = ValueSlot::new();
    let program = ValueSlot::new();
    let signal = ValueSlot::new();
    let help_page: Rc<RefCell<Option<String>>> = Rc::new(RefCell::new(None));

    let cli = Cli::build(|cli| {
        cli.name("supervise");
        cli.version(VERSION);
        cli.description("Example of cli with DSL");

        cli.flag("-v --version", |f| {
            f.description("Show version of program");
            f.handle(print_version).bind((VERSION,))
        })?;

        let page = Rc::clone(&help_page);
        cli.flag("-h --help", |f| {
            f.description("Show program help");
            f.handle(move || {
                if let Some(text) = page.borrow().as_deref() {
                    print!("{text}");
                }
            })
            .bind(())
        })?;

        let config_flag = cli.option("-c --config", |f| {
            f.description("Read specified configuration file");
            f.default("example.conf")?;
            f.value(&config)
        })?;

        let program_flag = cli.argument("<program>", |f| {
            f.description("Program name or path to start/stop");
            f.value(&program)
        })?;

        cli.command("start", |c| {
            c.description("Start specified program");
            c.required([program_flag])?;
            c.handle(handle_start).bind((config_flag, program_flag))
        })?;

        cli.command("stop", |c| {
            c.description("Stop specified program or stop all programs if no <program> specified");

            let signal_flag = c.option("-s --signal", |f| {
                f.description("Signal to send when killing process");
                f.default(9)?;
                f.value(&signal)
            })?;
            c.required([program_flag])?;

            c.handle(handle_stop)
                .bind((config_flag, program_flag, signal_flag))
        })?;

        Ok(())
    })?;

    // The page needs the finished tree, so the help handler reads it once assembly is done.
    *help_page.borrow_mut() = Some(usage::help_page(&cli));

    Ok(Supervisor {
        cli,
        config,
        program,
        signal,
    })
}

/// Applies `--set` values, fills the remaining slots from defaults and calls the handler.
pub fn run(supervisor: &Supervisor, args: &InvokeArgs) -> Result<(), CliError> {
    let Some(command) = args.invoke.as_deref() else {
        return Ok(());
    };

    for setting in &args.settings {
        supervisor.cli.set(&setting.flag, &setting.value)?;
    }
    supervisor.cli.resolve_defaults();

    let path: Vec<&str> = command.split_whitespace().collect();
    supervisor.cli.invoke(&path)
}
