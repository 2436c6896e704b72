//! Flag kinds, typed values and the per-kind parsing rules.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What kind of value a flag carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagKind {
    String,
    Bool,
    Int,
    StringList,
}

impl FlagKind {
    /// The value a flag resolves to when no source provides one and it has no default.
    pub fn zero_value(&self) -> FlagValue {
        match self {
            Self::String => FlagValue::String(String::new()),
            Self::Bool => FlagValue::Bool(false),
            Self::Int => FlagValue::Int(0),
            Self::StringList => FlagValue::StringList(Vec::new()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::StringList => "string_list",
        }
    }
}

impl fmt::Display for FlagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed flag value. One canonical representation per kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FlagValue {
    String(String),
    Bool(bool),
    Int(i64),
    StringList(Vec<String>),
}

impl FlagValue {
    pub fn kind(&self) -> FlagKind {
        match self {
            Self::String(_) => FlagKind::String,
            Self::Bool(_) => FlagKind::Bool,
            Self::Int(_) => FlagKind::Int,
            Self::StringList(_) => FlagKind::StringList,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::StringList(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FlagValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FlagValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<Vec<String>> for FlagValue {
    fn from(value: Vec<String>) -> Self {
        Self::StringList(value)
    }
}

/// Parse a boolean token.
///
/// Case-insensitive `true|1|yes` and `false|0|no`; the empty string means true.
pub fn parse_bool(raw: &str) -> Option<bool> {
    if raw.is_empty() {
        return Some(true);
    }
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Parse a base-10 integer token. Whitespace is not trimmed.
pub fn parse_int(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok()
}

/// Parse a single token (one CLI occurrence) into `kind`.
///
/// A `StringList` token becomes a one-element list; accumulation across
/// occurrences is the classifier's job.
pub fn parse_token(kind: FlagKind, raw: &str) -> Option<FlagValue> {
    match kind {
        FlagKind::String => Some(FlagValue::String(raw.to_string())),
        FlagKind::Bool => parse_bool(raw).map(FlagValue::Bool),
        FlagKind::Int => parse_int(raw).map(FlagValue::Int),
        FlagKind::StringList => Some(FlagValue::StringList(vec![raw.to_string()])),
    }
}

/// Parse a string read from the environment or the config view into `kind`.
///
/// Lists are comma-separated; elements are trimmed and empty ones dropped.
pub fn parse_external(kind: FlagKind, raw: &str) -> Option<FlagValue> {
    match kind {
        FlagKind::StringList => Some(FlagValue::StringList(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        )),
        other => parse_token(other, raw),
    }
}
