//! Console session capability
//!
//! The controller never talks to a process directly. It drives anything
//! that can send a line and collect output up to the next prompt, which
//! lets tests swap in a scripted double.

use crate::error::Result;
use std::time::Duration;

/// A live, line-oriented interactive console
///
/// Methods take `&mut self`, so at most one command is in flight per
/// session. Sharing a session across threads needs an external lock.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ConsoleSession: Send {
    /// Write one command line (the implementation appends the line terminator)
    async fn send(&mut self, line: &str) -> Result<()>;

    /// Collect everything the console prints before its next prompt.
    ///
    /// Fails with [`crate::Error::SessionTimeout`] when no prompt appears
    /// within `timeout`.
    async fn read_until_prompt(&mut self, timeout: Duration) -> Result<String>;

    /// Tear the session down
    async fn close(&mut self) -> Result<()>;
}
