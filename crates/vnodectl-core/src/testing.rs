//! Scripted console double
//!
//! Answers exact command lines with canned text and records every line it
//! was sent. No process is spawned.

use crate::error::{Error, Result};
use crate::session::ConsoleSession;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Timeout,
    Closed,
}

/// In-memory [`ConsoleSession`] driven by a command → reply table
#[derive(Debug, Default)]
pub struct ScriptedSession {
    replies: HashMap<String, Reply>,
    fallback: String,
    sent: Vec<String>,
    pending: Option<String>,
    closed: bool,
}

impl ScriptedSession {
    /// Create a session that answers every command with empty output
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `command` with `output`
    #[must_use]
    pub fn respond(mut self, command: &str, output: &str) -> Self {
        self.replies
            .insert(command.to_string(), Reply::Text(output.to_string()));
        self
    }

    /// Never show a prompt after `command`
    #[must_use]
    pub fn time_out_on(mut self, command: &str) -> Self {
        self.replies.insert(command.to_string(), Reply::Timeout);
        self
    }

    /// Report end of stream after `command`
    #[must_use]
    pub fn close_on(mut self, command: &str) -> Self {
        self.replies.insert(command.to_string(), Reply::Closed);
        self
    }

    /// Output for commands without a scripted reply
    #[must_use]
    pub fn otherwise(mut self, output: &str) -> Self {
        self.fallback = output.to_string();
        self
    }

    /// Every line sent so far, oldest first
    #[must_use]
    pub fn sent(&self) -> &[String] {
        &self.sent
    }

    /// Whether `close` has been called
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[async_trait::async_trait]
impl ConsoleSession for ScriptedSession {
    async fn send(&mut self, line: &str) -> Result<()> {
        if self.closed {
            return Err(Error::SessionClosed);
        }
        self.sent.push(line.to_string());
        self.pending = Some(line.to_string());
        Ok(())
    }

    async fn read_until_prompt(&mut self, timeout: Duration) -> Result<String> {
        let Some(line) = self.pending.take() else {
            return Ok(String::new());
        };
        match self.replies.get(&line) {
            Some(Reply::Text(text)) => Ok(text.clone()),
            Some(Reply::Timeout) => Err(Error::SessionTimeout(timeout.as_millis() as u64)),
            Some(Reply::Closed) => {
                self.closed = true;
                Err(Error::SessionClosed)
            }
            None => Ok(self.fallback.clone()),
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}
