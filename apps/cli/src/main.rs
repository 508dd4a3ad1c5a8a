//! LessonForge CLI — lesson content tooling.
//!
//! Segments lesson markdown into its document model and resolves embedded
//! exercises against the on-disk content repository.

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
