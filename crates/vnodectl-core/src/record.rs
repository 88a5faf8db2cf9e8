//! Typed views over listing lines

use crate::error::{Error, Result};
use serde::Serialize;

/// One line of a login listing: `<type> <vnode> <account>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginEntry {
    /// `Global` or `Private`, as printed by the console
    pub scope: String,
    /// VNode name
    pub vnode: String,
    /// Remote account
    pub account: String,
}

impl LoginEntry {
    /// Build from a tokenized line. Exactly three fields are expected.
    pub fn from_fields(fields: &[String]) -> Result<Self> {
        match fields {
            [scope, vnode, account] => Ok(Self {
                scope: scope.clone(),
                vnode: vnode.clone(),
                account: account.clone(),
            }),
            _ => Err(Error::invalid(format!(
                "login line needs 3 fields, got {}: '{}'",
                fields.len(),
                fields.join(" ")
            ))),
        }
    }
}

/// One line of a connection listing:
/// `<type> <vnode> <address> <protocol> <listen>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionEntry {
    /// `Global` or `Private`, as printed by the console
    pub scope: String,
    /// VNode name
    pub vnode: String,
    /// Remote host address
    pub address: String,
    /// Network protocol
    pub protocol: String,
    /// Listen address; may span several tokens in malformed data
    pub listen: String,
}

impl ConnectionEntry {
    /// Build from a tokenized line. Surplus tokens are folded into `listen`.
    pub fn from_fields(fields: &[String]) -> Result<Self> {
        match fields {
            [scope, vnode, address, protocol, listen @ ..] if !listen.is_empty() => Ok(Self {
                scope: scope.clone(),
                vnode: vnode.clone(),
                address: address.clone(),
                protocol: protocol.clone(),
                listen: listen.join(" "),
            }),
            _ => Err(Error::invalid(format!(
                "connection line needs at least 5 fields, got {}: '{}'",
                fields.len(),
                fields.join(" ")
            ))),
        }
    }
}
