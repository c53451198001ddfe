// Entrypoint: parse the command line, set up logging, run one publish.
// Errors bubble up as `anyhow::Error`, which prints the chain and exits
// with a non-zero status.

mod cli;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use xkcd_vk_poster::{logging, workflow};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = logging::init(&cli.log_file, cli.verbose)?;

    let config = cli.into_config()?;
    tracing::debug!(?config, "starting run");

    let outcome = workflow::run(&config).context("failed to publish comic")?;
    tracing::debug!(?outcome, "run finished");
    Ok(())
}
