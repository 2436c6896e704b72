use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::args::{FlagKind, PositionalSlot, ToolFlag};

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Flag values every command may consult, keyed by flag name.
    #[serde(default)]
    pub defaults: BTreeMap<String, toml::Value>,
    /// Per-command values and custom command declarations.
    #[serde(default)]
    pub commands: BTreeMap<String, CommandDeclaration>,
}

/// A command section: values for an existing command, or a new command.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandDeclaration {
    #[serde(default)]
    pub description: String,
    /// Program the command wraps. Without it, unknown `--flags` are rejected.
    #[serde(default)]
    pub tool: Option<String>,
    /// Flag values scoped to this command. They win over the global `[defaults]`.
    #[serde(default)]
    pub defaults: BTreeMap<String, toml::Value>,
    #[serde(default)]
    pub flags: Vec<FlagDeclaration>,
    #[serde(default)]
    pub arguments: Vec<PositionalSlot>,
    /// Flags of the wrapped tool that are forwarded in place.
    #[serde(default)]
    pub tool_flags: Vec<ToolFlag>,
}

/// A flag declared in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagDeclaration {
    pub name: String,
    #[serde(default)]
    pub shorthand: Option<char>,
    #[serde(default = "default_kind")]
    pub kind: FlagKind,
    #[serde(default)]
    pub default: Option<toml::Value>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub sentinel: Option<String>,
    /// Environment variables, first set wins.
    #[serde(default)]
    pub env: Vec<String>,
    #[serde(default)]
    pub valid_values: Vec<String>,
    #[serde(default)]
    pub description: String,
}

fn default_kind() -> FlagKind {
    FlagKind::String
}

/// Render a TOML value the way the resolver expects config values: as a string.
///
/// Arrays become comma-joined lists. Tables have no string form.
pub fn value_to_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        toml::Value::Datetime(d) => Some(d.to_string()),
        toml::Value::Array(items) => items
            .iter()
            .map(value_to_string)
            .collect::<Option<Vec<_>>>()
            .map(|parts| parts.join(",")),
        toml::Value::Table(_) => None,
    }
}
