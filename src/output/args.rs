use clap::{Args, ValueEnum};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Full help page.
    Text,
    /// The assembled tree as JSON.
    Json,
    /// One table row per command.
    Table,
    /// Only the declared version string.
    Version,
}

/// Output configuration for the demo binary.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// What to print about the declared tree.
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value_t = OutputFormat::Text,
        help = "What to print: text, json, table or version",
    )]
    pub format: OutputFormat,

    /// Suppress all output except errors and handler output.
    #[arg(long, help = "Suppress all output except errors")]
    pub quiet: bool,
}
