//! CLI module for vnodectl
//!
//! One subcommand per console operation, plus:
//! - `doctor`: configuration and console diagnostics

use crate::settings::AppConfig;
use clap::{Parser, Subcommand};
use vnodectl_core::Scope;

pub mod admin;
pub mod doctor;
pub mod output;

/// Drive the netutil VNode administration console
#[derive(Parser, Debug)]
#[command(name = "vnodectl")]
#[command(about = "Scripted driver for the netutil VNode console")]
#[command(version)]
pub struct Cli {
    /// Print listings as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Log every command and response
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Act on behalf of this user
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Seconds to wait for each prompt
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List login entries
    Logins {
        /// global, private or *
        #[arg(default_value = "*")]
        scope: Scope,
        /// VNode name filter
        name: Option<String>,
    },
    /// List connection entries
    Connections {
        /// global, private or *
        #[arg(default_value = "*")]
        scope: Scope,
        name: Option<String>,
        address: Option<String>,
        protocol: Option<String>,
        listen: Option<String>,
    },
    /// Add a login entry
    CreateLogin {
        /// global or private
        scope: Scope,
        name: String,
    },
    /// Add a connection entry
    CreateConnection {
        /// global or private
        scope: Scope,
        name: String,
        address: String,
        protocol: String,
        listen: String,
    },
    /// Remove login entries
    DestroyLogin {
        /// global, private or *
        #[arg(default_value = "*")]
        scope: Scope,
        name: Option<String>,
    },
    /// Remove connection entries of one vnode
    DestroyConnection {
        /// global or private
        scope: Scope,
        name: String,
        address: Option<String>,
        protocol: Option<String>,
        listen: Option<String>,
    },
    /// Quiesce a server (default: all)
    Quiesce { server: Option<String> },
    /// Stop a server (default: all)
    Stop { server: Option<String> },
    /// Check configuration and console startup
    Doctor,
}

/// Apply command-line overrides to the loaded configuration
pub fn apply_overrides(cli: &Cli, mut app: AppConfig) -> AppConfig {
    if let Some(user) = &cli.user {
        app.netutil.user = Some(user.clone());
    }
    if let Some(timeout) = cli.timeout {
        app.netutil.timeout_secs = timeout;
    }
    app
}

/// Run the CLI command
pub async fn run(cli: Cli, app: AppConfig) -> anyhow::Result<()> {
    let app = apply_overrides(&cli, app);
    match cli.command {
        Some(Commands::Doctor) => doctor::run(&app).await,
        Some(command) => admin::run(command, &app, cli.json).await,
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}
