//! Console subcommands

use super::output;
use super::Commands;
use crate::settings::AppConfig;
use anyhow::{Context, Result};
use tracing::info;
use vnodectl_core::{ConsoleSession, Controller};

/// Start the console, run one command, close the console
pub async fn run(command: Commands, app: &AppConfig, json: bool) -> Result<()> {
    let mut ctl = vnodectl_pty::connect(&app.netutil)
        .await
        .context("Failed to start netutil")?;

    let result = execute(&mut ctl, command, json).await;
    // close even when the command failed; report the command's error first
    let closed = ctl.close().await;
    let text = result?;
    closed.context("Failed to close netutil")?;

    if !text.is_empty() {
        println!("{}", text);
    }
    Ok(())
}

/// Run one subcommand against a controller and return what to print
pub async fn execute<S: ConsoleSession>(
    ctl: &mut Controller<S>,
    command: Commands,
    json: bool,
) -> Result<String> {
    let text = match command {
        Commands::Logins { scope, name } => {
            let rows = ctl.logins(scope, name.as_deref()).await?;
            if json {
                output::to_json(&rows)?
            } else {
                output::login_table(&rows)
            }
        }
        Commands::Connections {
            scope,
            name,
            address,
            protocol,
            listen,
        } => {
            let rows = ctl
                .connections(
                    scope,
                    name.as_deref(),
                    address.as_deref(),
                    protocol.as_deref(),
                    listen.as_deref(),
                )
                .await?;
            if json {
                output::to_json(&rows)?
            } else {
                output::connection_table(&rows)
            }
        }
        Commands::CreateLogin { scope, name } => {
            info!(%scope, %name, "Creating login");
            ctl.create_login(scope, &name).await?
        }
        Commands::CreateConnection {
            scope,
            name,
            address,
            protocol,
            listen,
        } => {
            info!(%scope, %name, %address, "Creating connection");
            ctl.create_connection(scope, &name, &address, &protocol, &listen)
                .await?
        }
        Commands::DestroyLogin { scope, name } => {
            info!(%scope, name = name.as_deref().unwrap_or("*"), "Destroying login");
            ctl.destroy_login(scope, name.as_deref()).await?
        }
        Commands::DestroyConnection {
            scope,
            name,
            address,
            protocol,
            listen,
        } => {
            info!(%scope, %name, "Destroying connection");
            ctl.destroy_connection(
                scope,
                &name,
                address.as_deref(),
                protocol.as_deref(),
                listen.as_deref(),
            )
            .await?
        }
        Commands::Quiesce { server } => ctl.quiesce(server.as_deref()).await?,
        Commands::Stop { server } => ctl.stop(server.as_deref()).await?,
        Commands::Doctor => anyhow::bail!("doctor does not run against an open console"),
    };
    Ok(text.trim().to_string())
}
