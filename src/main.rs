// Entrypoint for the CLI application.
// - Keeps `main` small: set up logging, then hand the parsed flags to `run`.
// - Any error ends the process with a non-zero status.

use clap::Parser;
use filedrop::{args::Args, prompt::TerminalPrompter, run};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    run(&args, &mut TerminalPrompter)?;
    Ok(())
}
