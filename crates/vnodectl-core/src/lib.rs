//! vnodectl core - session controller for the netutil console
//!
//! This crate drives the interactive VNode administration utility through
//! an abstract [`ConsoleSession`]:
//! - `command`: typed command grammar (SHOW / CREATE / DESTROY / QUIESCE / STOP)
//! - `response`: whitespace normalization and the listing cursor
//! - `controller`: request/reply driver with `next_*` iteration
//! - `locate`: utility settings and executable lookup
//!
//! # Example
//!
//! ```ignore
//! use vnodectl_core::{Controller, ControllerOptions, Scope};
//!
//! let mut ctl = Controller::new(session, ControllerOptions::default());
//! ctl.show_logins(Scope::Global, None).await?;
//! loop {
//!     let fields = ctl.next_login()?;
//!     if fields.is_empty() {
//!         break;
//!     }
//!     println!("{}", fields.join(" "));
//! }
//! ```

#![forbid(unsafe_code)]

pub mod args;
pub mod command;
pub mod controller;
pub mod error;
pub mod locate;
pub mod record;
pub mod response;
pub mod session;
pub mod testing;

pub use args::{Pattern, Scope, ServerId, WILDCARD};
pub use command::{BufferEffect, Command, Endpoint};
pub use controller::{Controller, ControllerOptions, DEFAULT_TIMEOUT_SECS};
pub use error::{Error, Result};
pub use locate::{locate_executable, NetutilConfig};
pub use record::{ConnectionEntry, LoginEntry};
pub use response::{normalize, tokenize, CursorPolicy, ResultBuffer, StreamKind};
pub use session::ConsoleSession;
