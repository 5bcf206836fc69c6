use crate::output::args::OutputArgs;
use crate::supervisor::args::InvokeArgs;
use clap::Parser;

// Top-level CLI parser. Sub-sections are flattened from sub-Args structs.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Declare the example supervisor command tree, print it, or call one of its handlers",
    after_help = "Set RUST_LOG (or --log-level) to trace the declaration scopes."
)]
pub struct Args {
    #[command(flatten)]
    pub output: OutputArgs,

    #[command(flatten)]
    pub invoke: InvokeArgs,

    #[arg(
        long,
        value_name = "FILTER",
        default_value = "warn",
        help = "Log filter used when RUST_LOG is not set (e.g. debug, cli_dsl=trace)"
    )]
    pub log_level: String,
}
