//! Typed command arguments
//!
//! The console accepts free text, but only three visibility keywords and
//! a wildcard are meaningful. These types make the invalid values
//! unrepresentable once parsed.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The wildcard token understood by the console
pub const WILDCARD: &str = "*";

/// Visibility scope of a login or connection entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Visible to every user of the installation
    Global,
    /// Visible only to the owning user
    Private,
    /// Both scopes (only valid for listings and login removal)
    #[serde(rename = "*")]
    Any,
}

impl Scope {
    /// Keyword as sent to the console
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "GLOBAL",
            Self::Private => "PRIVATE",
            Self::Any => WILDCARD,
        }
    }

    /// Reject the wildcard where a concrete scope is required
    pub fn concrete(self) -> Result<Self> {
        match self {
            Self::Any => Err(Error::invalid(
                "scope must be GLOBAL or PRIVATE for this command",
            )),
            scope => Ok(scope),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GLOBAL" => Ok(Self::Global),
            "PRIVATE" => Ok(Self::Private),
            "*" => Ok(Self::Any),
            other => Err(Error::invalid(format!(
                "unknown scope '{}'. Valid: global, private, *",
                other
            ))),
        }
    }
}

/// Reject values that would split the command line: any whitespace or
/// control character inside the token.
fn single_token<'a>(value: &'a str, field: &str) -> Result<&'a str> {
    if value.contains(|c: char| c.is_whitespace() || c.is_control()) {
        return Err(Error::invalid(format!(
            "'{}' must be a single token, got {:?}",
            field, value
        )));
    }
    Ok(value)
}

/// A free-text argument: a listing filter or a concrete entry value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern(String);

impl Pattern {
    /// The `*` pattern
    #[must_use]
    pub fn any() -> Self {
        Self(WILDCARD.to_string())
    }

    /// Listing filter: upper-cased, absent or blank means `*`
    pub fn filter(raw: Option<&str>) -> Result<Self> {
        match raw.map(str::trim) {
            Some(s) if !s.is_empty() => Ok(Self(single_token(s, "filter")?.to_uppercase())),
            _ => Ok(Self::any()),
        }
    }

    /// Entry value kept as typed, absent or blank means `*`
    pub fn value_or_any(raw: Option<&str>, field: &str) -> Result<Self> {
        match raw.map(str::trim) {
            Some(s) if !s.is_empty() => Ok(Self(single_token(s, field)?.to_string())),
            _ => Ok(Self::any()),
        }
    }

    /// Entry value that must be present. `field` names it in the error.
    pub fn required(raw: &str, field: &str) -> Result<Self> {
        let value = raw.trim();
        if value.is_empty() {
            return Err(Error::invalid(format!("'{}' must not be empty", field)));
        }
        Ok(Self(single_token(value, field)?.to_string()))
    }

    /// Entry value that must be present and not the wildcard
    pub fn concrete(raw: &str, field: &str) -> Result<Self> {
        let pattern = Self::required(raw, field)?;
        if pattern.is_wildcard() {
            return Err(Error::invalid(format!(
                "'{}' must name a single entry, not '*'",
                field
            )));
        }
        Ok(pattern)
    }

    /// Whether this is the `*` wildcard
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.0 == WILDCARD
    }

    /// The raw text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Pattern {
    fn default() -> Self {
        Self::any()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Target of a quiesce or stop request; `*` addresses every server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerId(String);

impl ServerId {
    /// Parse a server id; blank means every server
    pub fn new(raw: Option<&str>) -> Result<Self> {
        match raw.map(str::trim) {
            Some(s) if !s.is_empty() => Ok(Self(single_token(s, "server id")?.to_string())),
            _ => Ok(Self::all()),
        }
    }

    /// Every server
    #[must_use]
    pub fn all() -> Self {
        Self(WILDCARD.to_string())
    }
}

impl Default for ServerId {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
