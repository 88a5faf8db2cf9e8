//! Session controller
//!
//! Owns one console session and turns typed calls into command lines.
//! Listings are cached in a [`ResultBuffer`] and read back one line at a
//! time through `next_login` / `next_connection`:
//!
//! ```text
//! show_logins ──► SHOW GLOBAL LOGIN * ──► console
//!                                            │
//!            normalize ◄── text up to prompt ┘
//!                │
//!                ▼
//!          ResultBuffer (Login) ──► next_login() ──► [type, name, account]
//! ```
//!
//! Create and destroy calls invalidate the buffer; quiesce and stop leave
//! it alone. A failed call never touches the buffer.

use crate::args::Scope;
use crate::command::{BufferEffect, Command};
use crate::error::{Error, Result};
use crate::record::{ConnectionEntry, LoginEntry};
use crate::response::{normalize, CursorPolicy, ResultBuffer, StreamKind};
use crate::session::ConsoleSession;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

#[cfg(test)]
mod tests;

/// Default bound on waiting for a prompt
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const SHOW_FIRST: &str = "show must precede next";

/// Per-controller settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerOptions {
    /// How long each command may wait for the prompt
    pub timeout: Duration,
    /// Cursor behaviour at end of listing
    pub cursor_policy: CursorPolicy,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cursor_policy: CursorPolicy::default(),
        }
    }
}

/// Request/reply driver for the VNode administration console
///
/// Not `Sync`-safe by contract: every operation takes `&mut self`, so
/// callers sharing a controller must wrap it in a mutex.
pub struct Controller<S: ConsoleSession> {
    session: S,
    buffer: ResultBuffer,
    options: ControllerOptions,
}

impl<S: ConsoleSession> Controller<S> {
    /// Wrap an already-started session
    pub fn new(session: S, options: ControllerOptions) -> Self {
        Self {
            session,
            buffer: ResultBuffer::new(options.cursor_policy),
            options,
        }
    }

    /// The active settings
    #[must_use]
    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    /// The cached listing
    #[must_use]
    pub fn buffer(&self) -> &ResultBuffer {
        &self.buffer
    }

    /// The underlying session
    #[must_use]
    pub fn session(&self) -> &S {
        &self.session
    }

    /// Send one command, collect and normalize its output, then apply the
    /// command's effect on the buffer.
    async fn execute(&mut self, command: Command) -> Result<String> {
        let start = Instant::now();
        let line = command.to_string();
        debug!(command = %line, "Sending console command");

        let output = match self.round_trip(&line).await {
            Ok(output) => output,
            Err(e) => {
                warn!(command = %line, error = %e, "Console command failed");
                return Err(e);
            }
        };
        let text = normalize(&output);

        match command.effect() {
            BufferEffect::Replace(kind) => {
                self.buffer.load(kind, &text);
                debug!(?kind, lines = self.buffer.len(), "Listing cached");
            }
            BufferEffect::Clear => self.buffer.clear(),
            BufferEffect::Keep => {}
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        if matches!(command.effect(), BufferEffect::Replace(_)) {
            debug!(command = %line, duration_ms, response = %text, "Console command completed");
        } else {
            info!(command = %line, duration_ms, "Console command completed");
        }
        Ok(text)
    }

    async fn round_trip(&mut self, line: &str) -> Result<String> {
        self.session.send(line).await?;
        self.session.read_until_prompt(self.options.timeout).await
    }

    // ── Listings ────────────────────────────────────────────────────────

    /// `SHOW <scope> LOGIN <name>`; returns the normalized response
    pub async fn show_logins(&mut self, scope: Scope, name: Option<&str>) -> Result<String> {
        self.execute(Command::show_login(scope, name)?).await
    }

    /// `SHOW <scope> CONNECTION <name> <address> <protocol> <listen>`
    pub async fn show_connections(
        &mut self,
        scope: Scope,
        name: Option<&str>,
        address: Option<&str>,
        protocol: Option<&str>,
        listen: Option<&str>,
    ) -> Result<String> {
        self.execute(Command::show_connection(
            scope, name, address, protocol, listen,
        )?)
        .await
    }

    /// Fields of the next login line; empty at end of listing
    pub fn next_login(&mut self) -> Result<Vec<String>> {
        self.buffer
            .next_fields(StreamKind::Login)
            .ok_or(Error::ProtocolSequence(SHOW_FIRST))
    }

    /// Fields of the next connection line; empty at end of listing
    pub fn next_connection(&mut self) -> Result<Vec<String>> {
        self.buffer
            .next_fields(StreamKind::Connection)
            .ok_or(Error::ProtocolSequence(SHOW_FIRST))
    }

    /// Show logins and parse every line. Lines that are not login entries
    /// (banners, "no entries" notices) are skipped.
    pub async fn logins(&mut self, scope: Scope, name: Option<&str>) -> Result<Vec<LoginEntry>> {
        self.show_logins(scope, name).await?;
        let rows = self
            .buffer
            .drain_fields(StreamKind::Login)
            .ok_or(Error::ProtocolSequence(SHOW_FIRST))?;
        Ok(rows
            .iter()
            .filter_map(|fields| match LoginEntry::from_fields(fields) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!(error = %e, "Skipping non-entry line");
                    None
                }
            })
            .collect())
    }

    /// Show connections and parse every line
    pub async fn connections(
        &mut self,
        scope: Scope,
        name: Option<&str>,
        address: Option<&str>,
        protocol: Option<&str>,
        listen: Option<&str>,
    ) -> Result<Vec<ConnectionEntry>> {
        self.show_connections(scope, name, address, protocol, listen)
            .await?;
        let rows = self
            .buffer
            .drain_fields(StreamKind::Connection)
            .ok_or(Error::ProtocolSequence(SHOW_FIRST))?;
        Ok(rows
            .iter()
            .filter_map(|fields| match ConnectionEntry::from_fields(fields) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!(error = %e, "Skipping non-entry line");
                    None
                }
            })
            .collect())
    }

    // ── Mutations ───────────────────────────────────────────────────────

    /// `CREATE <scope> LOGIN <name>`; scope must be concrete
    pub async fn create_login(&mut self, scope: Scope, name: &str) -> Result<String> {
        self.execute(Command::create_login(scope, name)?).await
    }

    /// `CREATE <scope> CONNECTION ...`; every field is required
    pub async fn create_connection(
        &mut self,
        scope: Scope,
        name: &str,
        address: &str,
        protocol: &str,
        listen: &str,
    ) -> Result<String> {
        self.execute(Command::create_connection(
            scope, name, address, protocol, listen,
        )?)
        .await
    }

    /// `DESTROY <scope> LOGIN <name>`; name defaults to `*`
    pub async fn destroy_login(&mut self, scope: Scope, name: Option<&str>) -> Result<String> {
        self.execute(Command::destroy_login(scope, name)?).await
    }

    /// `DESTROY <scope> CONNECTION ...`; name must be concrete, the
    /// endpoint fields default to `*`
    pub async fn destroy_connection(
        &mut self,
        scope: Scope,
        name: &str,
        address: Option<&str>,
        protocol: Option<&str>,
        listen: Option<&str>,
    ) -> Result<String> {
        self.execute(Command::destroy_connection(
            scope, name, address, protocol, listen,
        )?)
        .await
    }

    // ── Servers ─────────────────────────────────────────────────────────

    /// `QUIESCE <server>`; blank or `None` addresses every server
    pub async fn quiesce(&mut self, server: Option<&str>) -> Result<String> {
        self.execute(Command::quiesce(server)?).await
    }

    /// `STOP <server>`; blank or `None` addresses every server
    pub async fn stop(&mut self, server: Option<&str>) -> Result<String> {
        self.execute(Command::stop(server)?).await
    }

    /// Close the session. Dropping the controller also releases it.
    pub async fn close(mut self) -> Result<()> {
        debug!("Closing console session");
        self.session.close().await
    }
}
