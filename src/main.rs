use anyhow::Result;
use clap::Parser;
use sqlite_inspect::cli;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    let args = cli::Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level.as_str()));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    cli::execute_command(args)
}
