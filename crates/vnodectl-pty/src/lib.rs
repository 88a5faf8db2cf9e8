//! vnodectl PTY - the console utility on a pseudo-terminal
//!
//! Provides [`PtyConsole`], the production [`vnodectl_core::ConsoleSession`]:
//! - spawns the utility (optionally as another user) on a wide PTY
//! - waits for the configured prompt, stripping ANSI sequences and the
//!   terminal's echo of each command
//! - bounds every wait and kills the child on drop
//!
//! ```ignore
//! let config = NetutilConfig { install_root: Some("/opt/ii".into()), ..Default::default() };
//! let mut ctl = vnodectl_pty::connect(&config).await?;
//! println!("{}", ctl.show_logins(Scope::Any, None).await?);
//! ctl.close().await?;
//! ```

#![forbid(unsafe_code)]

mod console;
pub mod scan;

pub use console::{connect, PtyConsole};
