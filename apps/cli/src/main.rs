//! stackbff CLI: page-ready Contentstack content on stdout.
//!
//! Each command performs one delivery API request and prints the typed
//! result as pretty JSON. Failures exit non-zero with a diagnostic.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
