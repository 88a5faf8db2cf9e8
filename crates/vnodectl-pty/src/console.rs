//! PTY-backed console session

use crate::scan::{strip_echo, PromptScanner, MAX_REPLY_BYTES};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, info, warn};
use vnodectl_core::{
    locate_executable, ConsoleSession, Controller, Error, NetutilConfig, Result,
};

/// Terminal geometry; wide enough that listings never wrap
const PTY_ROWS: u16 = 50;
const PTY_COLS: u16 = 512;

/// How long `close` waits for the utility to exit on its own
const CLOSE_GRACE: Duration = Duration::from_secs(2);

// Linux reports EIO on the master once the child side closes
const EIO: i32 = 5;

/// The utility running on a pseudo-terminal
pub struct PtyConsole {
    executable: PathBuf,
    child: tokio::process::Child,
    pty: pty_process::Pty,
    scanner: PromptScanner,
    last_sent: Option<String>,
    /// Prompts still due to commands whose read timed out
    owed_prompts: usize,
    started_at: Instant,
}

impl PtyConsole {
    /// Locate the utility, start it on a fresh PTY and wait for its first
    /// prompt. Failures after the executable check are reported as
    /// [`Error::SessionStart`].
    pub async fn spawn(config: &NetutilConfig) -> Result<Self> {
        let executable = locate_executable(config)?;
        info!(executable = %executable.display(), user = ?config.user, "Starting console");

        let (pty, pts) = pty_process::open()
            .map_err(|e| Error::SessionStart(format!("Failed to open PTY: {}", e)))?;
        pty.resize(pty_process::Size::new(PTY_ROWS, PTY_COLS))
            .map_err(|e| Error::SessionStart(format!("Failed to size PTY: {}", e)))?;

        let mut cmd = pty_process::Command::new(&executable)
            .args(config.args())
            .env("TERM", "dumb");
        if let Some(root) = &config.install_root {
            cmd = cmd.env("II_SYSTEM", root);
        }

        let child = cmd.spawn(pts).map_err(|e| {
            Error::SessionStart(format!("Failed to spawn {}: {}", executable.display(), e))
        })?;

        let mut console = Self {
            executable,
            child,
            pty,
            scanner: PromptScanner::new(config.prompt.clone()),
            last_sent: None,
            owed_prompts: 0,
            started_at: Instant::now(),
        };

        let timeout = Duration::from_secs(config.timeout_secs);
        match console.read_until_prompt(timeout).await {
            Ok(banner) => {
                debug!(banner = %banner.trim(), "Console ready");
                Ok(console)
            }
            Err(e) => {
                let _ = console.child.start_kill();
                Err(Error::SessionStart(format!(
                    "{} did not show prompt '{}': {}",
                    console.executable.display(),
                    config.prompt,
                    e
                )))
            }
        }
    }

    /// Path of the running utility
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// OS process id, if the child is still running
    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    async fn fill_until_prompt(&mut self) -> Result<String> {
        let mut read_buf = [0u8; 4096];
        loop {
            while let Some(reply) = self.scanner.take_reply() {
                if self.owed_prompts == 0 {
                    return Ok(reply);
                }
                self.owed_prompts -= 1;
                debug!(
                    bytes = reply.len(),
                    still_owed = self.owed_prompts,
                    "Discarded late reply"
                );
            }
            match self.pty.read(&mut read_buf).await {
                Ok(0) => return Err(Error::SessionClosed),
                Ok(n) => {
                    self.scanner.push(&read_buf[..n]);
                    if self.scanner.buffered() > MAX_REPLY_BYTES {
                        self.scanner.reset();
                        return Err(Error::Io(std::io::Error::new(
                            std::io::ErrorKind::InvalidData,
                            format!("console output exceeded {} bytes", MAX_REPLY_BYTES),
                        )));
                    }
                }
                Err(e) if e.raw_os_error() == Some(EIO) => return Err(Error::SessionClosed),
                Err(e) => return Err(Error::Io(e)),
            }
        }
    }
}

#[async_trait::async_trait]
impl ConsoleSession for PtyConsole {
    async fn send(&mut self, line: &str) -> Result<()> {
        self.pty.write_all(line.as_bytes()).await?;
        self.pty.write_all(b"\n").await?;
        self.pty.flush().await?;
        self.last_sent = Some(line.to_string());
        Ok(())
    }

    /// A timed-out read leaves its prompt owed: the next read drops
    /// output up to and including that prompt before returning a reply.
    async fn read_until_prompt(&mut self, timeout: Duration) -> Result<String> {
        let reply = match tokio::time::timeout(timeout, self.fill_until_prompt()).await {
            Ok(reply) => reply?,
            Err(_) => {
                self.owed_prompts += 1;
                self.last_sent = None;
                warn!(owed = self.owed_prompts, "No prompt in time, reply will be discarded");
                return Err(Error::SessionTimeout(timeout.as_millis() as u64));
            }
        };
        Ok(match self.last_sent.take() {
            Some(sent) => strip_echo(&reply, &sent),
            None => reply,
        })
    }

    async fn close(&mut self) -> Result<()> {
        if let Ok(Some(_)) = self.child.try_wait() {
            return Ok(());
        }
        if let Err(e) = self.send("QUIT").await {
            debug!(error = %e, "Console already gone");
        }
        match tokio::time::timeout(CLOSE_GRACE, self.child.wait()).await {
            Ok(Ok(status)) => {
                info!(
                    status = %status,
                    ran_for_secs = self.started_at.elapsed().as_secs(),
                    "Console exited"
                );
                Ok(())
            }
            Ok(Err(e)) => Err(Error::Io(e)),
            Err(_) => {
                warn!(pid = ?self.child.id(), "Console ignored QUIT, killing");
                self.child.kill().await?;
                Ok(())
            }
        }
    }
}

impl Drop for PtyConsole {
    fn drop(&mut self) {
        if let Ok(None) = self.child.try_wait() {
            let _ = self.child.start_kill();
        }
    }
}

/// Start the utility and wrap it in a controller
pub async fn connect(config: &NetutilConfig) -> Result<Controller<PtyConsole>> {
    let console = PtyConsole::spawn(config).await?;
    Ok(Controller::new(console, config.controller_options()))
}
