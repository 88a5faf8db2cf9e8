//! Response normalization and the line cursor
//!
//! Console listings are column-aligned with runs of spaces. After
//! [`normalize`] every field is separated by exactly one space, so a line
//! tokenizes with a plain split.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static SPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(" {2,}").expect("space-run pattern is a valid regex"));

/// Collapse every run of two or more spaces into one.
///
/// Only U+0020 is touched. Idempotent.
#[must_use]
pub fn normalize(text: &str) -> String {
    SPACE_RUN.replace_all(text, " ").into_owned()
}

/// Split a normalized line into fields
#[must_use]
pub fn tokenize(line: &str) -> Vec<String> {
    line.trim()
        .split(' ')
        .filter(|field| !field.is_empty())
        .map(str::to_string)
        .collect()
}

/// Which listing the buffer holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    /// `SHOW ... LOGIN`
    Login,
    /// `SHOW ... CONNECTION`
    Connection,
}

/// What `next` does after the last line has been consumed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorPolicy {
    /// Return an empty record until the next show
    #[default]
    Exhaust,
    /// Wrap the cursor back to the first line
    Restart,
}

/// Lines of the most recent listing plus the read cursor
#[derive(Debug, Clone, Default)]
pub struct ResultBuffer {
    lines: Vec<String>,
    kind: Option<StreamKind>,
    cursor: usize,
    policy: CursorPolicy,
}

impl ResultBuffer {
    /// Create an empty buffer
    #[must_use]
    pub fn new(policy: CursorPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Replace the contents with a normalized listing and rewind
    pub fn load(&mut self, kind: StreamKind, normalized: &str) {
        self.lines = normalized
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        self.kind = Some(kind);
        self.cursor = 0;
    }

    /// Drop the contents and the kind tag
    pub fn clear(&mut self) {
        self.lines.clear();
        self.kind = None;
        self.cursor = 0;
    }

    /// Kind of the loaded listing, if any
    #[must_use]
    pub fn kind(&self) -> Option<StreamKind> {
        self.kind
    }

    /// Current cursor offset
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of loaded lines
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether no lines are loaded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Tokenize the line at the cursor and advance.
    ///
    /// Returns `None` when the caller's kind does not match the loaded one.
    /// An empty vector marks end of stream.
    pub fn next_fields(&mut self, expected: StreamKind) -> Option<Vec<String>> {
        if self.kind != Some(expected) {
            return None;
        }
        let Some(line) = self.lines.get(self.cursor) else {
            return Some(Vec::new());
        };
        let fields = tokenize(line);
        self.cursor += 1;
        if self.cursor >= self.lines.len() && self.policy == CursorPolicy::Restart {
            self.cursor = 0;
        }
        Some(fields)
    }

    /// Tokenize every remaining line, leaving the cursor at the end
    pub fn drain_fields(&mut self, expected: StreamKind) -> Option<Vec<Vec<String>>> {
        if self.kind != Some(expected) {
            return None;
        }
        let rest = self.lines[self.cursor.min(self.lines.len())..]
            .iter()
            .map(|line| tokenize(line))
            .collect();
        self.cursor = match self.policy {
            CursorPolicy::Exhaust => self.lines.len(),
            CursorPolicy::Restart => 0,
        };
        Some(rest)
    }
}
