//! Console command grammar
//!
//! Each [`Command`] renders to exactly one line of console input:
//!
//! ```text
//! SHOW <TYPE> LOGIN <NAME>
//! SHOW <TYPE> CONNECTION <NAME> <ADDR> <PROTO> <LISTEN>
//! CREATE <TYPE> LOGIN <NAME>
//! CREATE <TYPE> CONNECTION <NAME> <ADDR> <PROTO> <LISTEN>
//! DESTROY <TYPE> LOGIN <NAME>
//! DESTROY <TYPE> CONNECTION <NAME> <ADDR> <PROTO> <LISTEN>
//! QUIESCE <SERVERID>
//! STOP <SERVERID>
//! ```
//!
//! Validation happens in the constructors, so a built command is always
//! well formed.

use crate::args::{Pattern, Scope, ServerId};
use crate::error::Result;
use crate::response::StreamKind;
use std::fmt;

/// Connection endpoint fields shared by the connection commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Remote host address
    pub address: Pattern,
    /// Network protocol (e.g. `tcp_ip`)
    pub protocol: Pattern,
    /// Listen address on the remote installation
    pub listen: Pattern,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.address, self.protocol, self.listen)
    }
}

/// One console request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List login entries
    ShowLogin { scope: Scope, name: Pattern },
    /// List connection entries
    ShowConnection {
        scope: Scope,
        name: Pattern,
        endpoint: Endpoint,
    },
    /// Add a login entry
    CreateLogin { scope: Scope, name: Pattern },
    /// Add a connection entry
    CreateConnection {
        scope: Scope,
        name: Pattern,
        endpoint: Endpoint,
    },
    /// Remove login entries
    DestroyLogin { scope: Scope, name: Pattern },
    /// Remove connection entries of one vnode
    DestroyConnection {
        scope: Scope,
        name: Pattern,
        endpoint: Endpoint,
    },
    /// Let a server finish its sessions, then exit
    Quiesce(ServerId),
    /// Stop a server immediately
    Stop(ServerId),
}

/// What a command does to the controller's result buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferEffect {
    /// Replace the buffer with the response
    Replace(StreamKind),
    /// Invalidate the buffer
    Clear,
    /// Leave the buffer alone
    Keep,
}

impl Command {
    /// `SHOW <scope> LOGIN <name>`
    pub fn show_login(scope: Scope, name: Option<&str>) -> Result<Self> {
        Ok(Self::ShowLogin {
            scope,
            name: Pattern::filter(name)?,
        })
    }

    /// `SHOW <scope> CONNECTION ...`; every filter defaults to `*`
    pub fn show_connection(
        scope: Scope,
        name: Option<&str>,
        address: Option<&str>,
        protocol: Option<&str>,
        listen: Option<&str>,
    ) -> Result<Self> {
        Ok(Self::ShowConnection {
            scope,
            name: Pattern::filter(name)?,
            endpoint: Endpoint {
                address: Pattern::filter(address)?,
                protocol: Pattern::filter(protocol)?,
                listen: Pattern::filter(listen)?,
            },
        })
    }

    /// `CREATE <scope> LOGIN <name>`
    pub fn create_login(scope: Scope, name: &str) -> Result<Self> {
        Ok(Self::CreateLogin {
            scope: scope.concrete()?,
            name: Pattern::required(name, "name")?,
        })
    }

    /// `CREATE <scope> CONNECTION ...`; all fields required
    pub fn create_connection(
        scope: Scope,
        name: &str,
        address: &str,
        protocol: &str,
        listen: &str,
    ) -> Result<Self> {
        Ok(Self::CreateConnection {
            scope: scope.concrete()?,
            name: Pattern::required(name, "name")?,
            endpoint: Endpoint {
                address: Pattern::required(address, "address")?,
                protocol: Pattern::required(protocol, "protocol")?,
                listen: Pattern::required(listen, "listen address")?,
            },
        })
    }

    /// `DESTROY <scope> LOGIN <name>`; the name defaults to `*`
    pub fn destroy_login(scope: Scope, name: Option<&str>) -> Result<Self> {
        Ok(Self::DestroyLogin {
            scope,
            name: Pattern::value_or_any(name, "name")?,
        })
    }

    /// `DESTROY <scope> CONNECTION ...`
    ///
    /// The vnode name must be concrete; the endpoint fields default to `*`.
    pub fn destroy_connection(
        scope: Scope,
        name: &str,
        address: Option<&str>,
        protocol: Option<&str>,
        listen: Option<&str>,
    ) -> Result<Self> {
        Ok(Self::DestroyConnection {
            scope: scope.concrete()?,
            name: Pattern::concrete(name, "name")?,
            endpoint: Endpoint {
                address: Pattern::value_or_any(address, "address")?,
                protocol: Pattern::value_or_any(protocol, "protocol")?,
                listen: Pattern::value_or_any(listen, "listen address")?,
            },
        })
    }

    /// How the response affects the result buffer
    #[must_use]
    pub fn effect(&self) -> BufferEffect {
        match self {
            Self::ShowLogin { .. } => BufferEffect::Replace(StreamKind::Login),
            Self::ShowConnection { .. } => BufferEffect::Replace(StreamKind::Connection),
            Self::CreateLogin { .. }
            | Self::CreateConnection { .. }
            | Self::DestroyLogin { .. }
            | Self::DestroyConnection { .. } => BufferEffect::Clear,
            Self::Quiesce(_) | Self::Stop(_) => BufferEffect::Keep,
        }
    }

    /// `QUIESCE <server>`; blank or absent means every server
    pub fn quiesce(server: Option<&str>) -> Result<Self> {
        Ok(Self::Quiesce(ServerId::new(server)?))
    }

    /// `STOP <server>`; blank or absent means every server
    pub fn stop(server: Option<&str>) -> Result<Self> {
        Ok(Self::Stop(ServerId::new(server)?))
    }

    /// Leading keyword, for logging
    #[must_use]
    pub fn verb(&self) -> &'static str {
        match self {
            Self::ShowLogin { .. } | Self::ShowConnection { .. } => "SHOW",
            Self::CreateLogin { .. } | Self::CreateConnection { .. } => "CREATE",
            Self::DestroyLogin { .. } | Self::DestroyConnection { .. } => "DESTROY",
            Self::Quiesce(_) => "QUIESCE",
            Self::Stop(_) => "STOP",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = self.verb();
        match self {
            Self::ShowLogin { scope, name }
            | Self::CreateLogin { scope, name }
            | Self::DestroyLogin { scope, name } => {
                write!(f, "{} {} LOGIN {}", verb, scope, name)
            }
            Self::ShowConnection {
                scope,
                name,
                endpoint,
            }
            | Self::CreateConnection {
                scope,
                name,
                endpoint,
            }
            | Self::DestroyConnection {
                scope,
                name,
                endpoint,
            } => write!(f, "{} {} CONNECTION {} {}", verb, scope, name, endpoint),
            Self::Quiesce(server) | Self::Stop(server) => write!(f, "{} {}", verb, server),
        }
    }
}
