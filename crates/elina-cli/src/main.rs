//! Elina CLI Application
//!
//! Command-line console for the Elina project-management backend.

mod args;
mod cli;
mod renderer;

use std::{process::ExitCode, time::Duration};

use anyhow::{Context, Result};
use args::Args;
use clap::Parser;
use cli::Cli;
use elina_core::ConsoleBuilder;
use log::info;
use renderer::TerminalRenderer;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    env_logger::init();

    let Args {
        api_url,
        session_file,
        timeout,
        no_color,
        command,
    } = Args::parse();

    let console = ConsoleBuilder::new()
        .with_base_url(api_url)
        .with_session_path(session_file)
        .with_timeout(Duration::from_secs(timeout))
        .build()
        .await
        .context("Failed to initialize console")?;

    let renderer = TerminalRenderer::new(!no_color);

    info!("Elina started");

    Cli::new(console, renderer).run(command).await
}
