//! Analyzer configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What to do after the first diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// Keep walking and report as many problems as possible.
    #[default]
    Collect,
    /// Stop the whole pass at the first problem.
    FailFast,
}

impl FromStr for ErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "collect" => Ok(ErrorPolicy::Collect),
            "fail-fast" | "failfast" | "fail_fast" => Ok(ErrorPolicy::FailFast),
            other => Err(format!(
                "unknown error policy '{}' (expected 'collect' or 'fail-fast')",
                other
            )),
        }
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorPolicy::Collect => f.write_str("collect"),
            ErrorPolicy::FailFast => f.write_str("fail-fast"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub policy: ErrorPolicy,
    /// Deepest node nesting the analyzer will descend into.
    pub max_depth: usize,
    /// Maximum number of symbols; `None` means unbounded.
    pub capacity: Option<usize>,
}

pub const DEFAULT_MAX_DEPTH: usize = 256;

impl Default for Options {
    fn default() -> Self {
        Self {
            policy: ErrorPolicy::Collect,
            max_depth: DEFAULT_MAX_DEPTH,
            capacity: None,
        }
    }
}

impl Options {
    pub fn fail_fast() -> Self {
        Self {
            policy: ErrorPolicy::FailFast,
            ..Self::default()
        }
    }
}
