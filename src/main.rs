use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli_dsl::args::Args;
use cli_dsl::error::CliError;
use cli_dsl::output;
use cli_dsl::supervisor;

fn main() -> Result<(), CliError> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays the help page / JSON dump.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    let supervisor = supervisor::declare()?;
    info!(
        name = supervisor.cli.name(),
        version = supervisor.cli.version(),
        "declared command tree"
    );

    if args.invoke.invoke.is_some() {
        return supervisor::run(&supervisor, &args.invoke);
    }

    if !args.output.quiet {
        output::emit(&supervisor.cli, args.output.format)?;
    }

    Ok(())
}
