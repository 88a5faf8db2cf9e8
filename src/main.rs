//! vnodectl - scripted driver for the netutil VNode console
//!
//! CLI entry point.

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod settings;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let cli = cli::Cli::parse();
    let app = settings::load_config()?;

    let default_filter = if cli.verbose {
        "vnodectl=debug,vnodectl_core=debug,vnodectl_pty=debug"
    } else {
        "vnodectl=info,vnodectl_core=warn,vnodectl_pty=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    // stdout carries command output; logs go to stderr
    let registry = tracing_subscriber::registry().with(filter);
    if app.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    cli::run(cli, app).await
}
