//! Flag registry: single source of truth for a command's native flags.
//!
//! A registry is built once per command and is read-only afterwards, so the
//! same value can back any number of parses.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::args::error::ArgsError;
use crate::args::value::{parse_token, FlagKind, FlagValue};

/// Sentinel the `identity` flag takes when given without a value.
pub const IDENTITY_SELECT: &str = "__SELECT__";

/// Names of the builtin flags, shared with the typed views.
pub mod names {
    pub const LOGS_LEVEL: &str = "logs-level";
    pub const LOGS_FILE: &str = "logs-file";
    pub const NO_COLOR: &str = "no-color";
    pub const CHDIR: &str = "chdir";
    pub const BASE_PATH: &str = "base-path";
    pub const CONFIG_PATH: &str = "config-path";
    pub const IDENTITY: &str = "identity";
    pub const STACK: &str = "stack";
    pub const DRY_RUN: &str = "dry-run";
    pub const UPLOAD_STATUS: &str = "upload-status";
    pub const SKIP_INIT: &str = "skip-init";
    pub const FROM_PLAN: &str = "from-plan";
}

/// Accepted `--logs-level` values.
pub const LOG_LEVELS: &[&str] = &["Trace", "Debug", "Info", "Warning", "Off"];

/// A single native flag definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSpec {
    /// Long name without dashes (e.g., "stack").
    pub name: String,
    /// Optional one-character short form (e.g., 's').
    pub shorthand: Option<char>,
    pub kind: FlagKind,
    /// Used when no source provides a value.
    pub default: Option<FlagValue>,
    /// Must be satisfied by CLI, environment or config.
    pub required: bool,
    /// Value taken when the flag is used alone. Such a flag never consumes the next token.
    pub sentinel: Option<String>,
    /// Environment variables checked in order, first set wins.
    pub env_vars: Vec<String>,
    /// Closed set of allowed values; empty means anything goes.
    pub valid_values: Vec<String>,
    /// Human-readable description.
    pub description: String,
}

impl FlagSpec {
    pub fn new(name: impl Into<String>, kind: FlagKind) -> Self {
        Self {
            name: name.into(),
            shorthand: None,
            kind,
            default: None,
            required: false,
            sentinel: None,
            env_vars: Vec::new(),
            valid_values: Vec::new(),
            description: String::new(),
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FlagKind::String)
    }

    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, FlagKind::Bool)
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, FlagKind::Int)
    }

    pub fn string_list(name: impl Into<String>) -> Self {
        Self::new(name, FlagKind::StringList)
    }

    pub fn shorthand(mut self, short: char) -> Self {
        self.shorthand = Some(short);
        self
    }

    pub fn default_value(mut self, value: impl Into<FlagValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn sentinel(mut self, value: impl Into<String>) -> Self {
        self.sentinel = Some(value.into());
        self
    }

    pub fn env(mut self, var: impl Into<String>) -> Self {
        self.env_vars.push(var.into());
        self
    }

    pub fn valid_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.valid_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = text.into();
        self
    }

    /// `--name`.
    pub fn long_form(&self) -> String {
        format!("--{}", self.name)
    }

    /// Whether `value` is acceptable under `valid_values`. Sentinels always are.
    pub fn allows(&self, value: &str) -> bool {
        self.valid_values.is_empty()
            || self.sentinel.as_deref() == Some(value)
            || self.valid_values.iter().any(|v| v == value)
    }

    fn validate(&self) -> Result<(), ArgsError> {
        let invalid = |reason: &str| ArgsError::InvalidFlagSpec {
            name: self.name.clone(),
            reason: reason.to_string(),
        };

        if self.name.is_empty()
            || self.name.starts_with('-')
            || self.name.contains('=')
            || self.name.chars().any(char::is_whitespace)
        {
            return Err(invalid("name must be non-empty, without leading '-', '=' or whitespace"));
        }
        if let Some(short) = self.shorthand {
            if !short.is_ascii_alphanumeric() {
                return Err(invalid("shorthand must be a single ASCII letter or digit"));
            }
        }
        if self.required && self.default.is_some() {
            return Err(invalid("a required flag cannot declare a default"));
        }
        if let Some(default) = &self.default {
            if default.kind() != self.kind {
                return Err(invalid(&format!(
                    "default is a {} but the flag is a {}",
                    default.kind(),
                    self.kind
                )));
            }
            let outside = match default {
                FlagValue::String(s) => !self.allows(s),
                FlagValue::StringList(items) => items.iter().any(|s| !self.allows(s)),
                _ => false,
            };
            if outside {
                return Err(invalid("default is not one of the valid values"));
            }
        }
        if let Some(sentinel) = &self.sentinel {
            if parse_token(self.kind, sentinel).is_none() {
                return Err(invalid(&format!(
                    "sentinel '{sentinel}' is not a valid {}",
                    self.kind
                )));
            }
        }
        Ok(())
    }
}

/// Whether a wrapped-tool flag takes the next token as its value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolFlagArity {
    #[default]
    Switch,
    Value,
}

/// A flag owned by the wrapped tool, spelled the tool's way (e.g., `-var`).
///
/// It is forwarded in place and never bound to a positional slot. A `Value`
/// flag in bare form also forwards the token after it, whatever it looks like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolFlag {
    pub name: String,
    #[serde(default)]
    pub arity: ToolFlagArity,
}

impl ToolFlag {
    pub fn switch(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arity: ToolFlagArity::Switch,
        }
    }

    pub fn value(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arity: ToolFlagArity::Value,
        }
    }

    pub fn takes_value(&self) -> bool {
        self.arity == ToolFlagArity::Value
    }

    fn validate(&self) -> Result<(), ArgsError> {
        let body = self.name.strip_prefix('-').unwrap_or_default();
        if body.chars().count() < 2
            || body.starts_with('-')
            || body.contains('=')
            || body.chars().any(char::is_whitespace)
        {
            return Err(ArgsError::InvalidFlagSpec {
                name: self.name.clone(),
                reason: "tool flag must be a single dash and at least two characters, \
                         without '=' or whitespace"
                    .to_string(),
            });
        }
        Ok(())
    }
}

/// Ordered, duplicate-free collection of flag definitions.
///
/// Also holds the wrapped tool's own flags, which the classifier forwards
/// without resolving.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagRegistry {
    flags: Vec<FlagSpec>,
    by_name: HashMap<String, usize>,
    by_short: HashMap<char, usize>,
    tool_flags: HashMap<String, ToolFlag>,
}

impl FlagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from definitions, in order.
    pub fn from_specs(specs: impl IntoIterator<Item = FlagSpec>) -> Result<Self, ArgsError> {
        let mut registry = Self::new();
        registry.extend(specs)?;
        Ok(registry)
    }

    /// Add a flag. Fails if its name or shorthand is taken or the definition is inconsistent.
    pub fn register(&mut self, spec: FlagSpec) -> Result<(), ArgsError> {
        spec.validate()?;
        if self.by_name.contains_key(&spec.name) {
            return Err(ArgsError::DuplicateFlag { name: spec.name });
        }
        if let Some(short) = spec.shorthand {
            if self.by_short.contains_key(&short) {
                return Err(ArgsError::DuplicateFlag {
                    name: format!("-{short}"),
                });
            }
            self.by_short.insert(short, self.flags.len());
        }
        self.by_name.insert(spec.name.clone(), self.flags.len());
        self.flags.push(spec);
        Ok(())
    }

    pub fn extend(&mut self, specs: impl IntoIterator<Item = FlagSpec>) -> Result<(), ArgsError> {
        for spec in specs {
            self.register(spec)?;
        }
        Ok(())
    }

    /// Add a wrapped-tool flag. Fails if the name is already a tool flag.
    pub fn register_tool_flag(&mut self, flag: ToolFlag) -> Result<(), ArgsError> {
        flag.validate()?;
        if self.tool_flags.contains_key(&flag.name) {
            return Err(ArgsError::DuplicateFlag { name: flag.name });
        }
        self.tool_flags.insert(flag.name.clone(), flag);
        Ok(())
    }

    pub fn extend_tool_flags(
        &mut self,
        flags: impl IntoIterator<Item = ToolFlag>,
    ) -> Result<(), ArgsError> {
        for flag in flags {
            self.register_tool_flag(flag)?;
        }
        Ok(())
    }

    /// Wrapped-tool flag spelled exactly `name`, dash included.
    pub fn tool_flag(&self, name: &str) -> Option<&ToolFlag> {
        self.tool_flags.get(name)
    }

    /// Look up by long name, or by shorthand when `key` is a single character.
    pub fn lookup(&self, key: &str) -> Option<&FlagSpec> {
        if let Some(spec) = self.by_long(key) {
            return Some(spec);
        }
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(short), None) => self.by_short(short),
            _ => None,
        }
    }

    pub fn by_long(&self, name: &str) -> Option<&FlagSpec> {
        self.by_name.get(name).map(|&i| &self.flags[i])
    }

    pub fn by_short(&self, short: char) -> Option<&FlagSpec> {
        self.by_short.get(&short).map(|&i| &self.flags[i])
    }

    /// All definitions in registration order.
    pub fn all(&self) -> &[FlagSpec] {
        &self.flags
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

/// Flags every command accepts.
pub fn global_flags() -> Vec<FlagSpec> {
    vec![
        FlagSpec::string(names::LOGS_LEVEL)
            .default_value("Info")
            .env("INFRAWRAP_LOGS_LEVEL")
            .valid_values(LOG_LEVELS.iter().copied())
            .description("Log level (Trace, Debug, Info, Warning, Off)"),
        FlagSpec::string(names::LOGS_FILE)
            .env("INFRAWRAP_LOGS_FILE")
            .description("Write logs to this file instead of stderr"),
        FlagSpec::bool(names::NO_COLOR)
            .sentinel("true")
            .env("INFRAWRAP_NO_COLOR")
            .description("Disable color output"),
        FlagSpec::string(names::CHDIR)
            .shorthand('C')
            .env("INFRAWRAP_CHDIR")
            .description("Change to this directory before running the tool"),
        FlagSpec::string(names::BASE_PATH)
            .env("INFRAWRAP_BASE_PATH")
            .description("Base path for components and stacks"),
        FlagSpec::string_list(names::CONFIG_PATH)
            .env("INFRAWRAP_CONFIG_PATH")
            .description("Additional configuration directories"),
        FlagSpec::string(names::IDENTITY)
            .sentinel(IDENTITY_SELECT)
            .env("INFRAWRAP_IDENTITY")
            .description("Identity to assume; use alone to select interactively"),
    ]
}

/// Flags shared by the tool-wrapping commands.
pub fn common_flags() -> Vec<FlagSpec> {
    vec![
        FlagSpec::string(names::STACK)
            .shorthand('s')
            .env("INFRAWRAP_STACK")
            .description("Stack name"),
        FlagSpec::bool(names::DRY_RUN)
            .sentinel("true")
            .env("INFRAWRAP_DRY_RUN")
            .description("Print the resolved invocation without running the tool"),
    ]
}

/// Flags for the terraform command.
pub fn terraform_flags() -> Vec<FlagSpec> {
    let mut flags = common_flags();
    flags.extend([
        FlagSpec::bool(names::UPLOAD_STATUS)
            .sentinel("true")
            .env("INFRAWRAP_UPLOAD_STATUS")
            .description("Upload plan status"),
        FlagSpec::bool(names::SKIP_INIT)
            .sentinel("true")
            .env("INFRAWRAP_SKIP_INIT")
            .description("Skip terraform init before running the command"),
        FlagSpec::string(names::FROM_PLAN)
            .env("INFRAWRAP_FROM_PLAN")
            .description("Apply from a previously generated plan file"),
    ]);
    flags
}

/// Terraform's own flags, forwarded to terraform wherever they appear.
pub fn terraform_tool_flags() -> Vec<ToolFlag> {
    const VALUE: &[&str] = &[
        "-var",
        "-var-file",
        "-target",
        "-replace",
        "-out",
        "-lock-timeout",
        "-parallelism",
        "-backup",
        "-state",
        "-state-out",
        "-backend-config",
        "-from-module",
        "-plugin-dir",
        "-lockfile",
        "-generate-config-out",
        "-chdir",
        "-test-directory",
        "-id",
    ];
    const SWITCH: &[&str] = &[
        "-auto-approve",
        "-destroy",
        "-refresh-only",
        "-detailed-exitcode",
        "-json",
        "-no-color",
        "-compact-warnings",
        "-input",
        "-lock",
        "-refresh",
        "-help",
        "-version",
        "-backend",
        "-force-copy",
        "-get",
        "-reconfigure",
        "-migrate-state",
        "-upgrade",
        "-ignore-remote-version",
        "-no-tests",
        "-raw",
    ];
    VALUE
        .iter()
        .map(|name| ToolFlag::value(*name))
        .chain(SWITCH.iter().map(|name| ToolFlag::switch(*name)))
        .collect()
}

/// Flags for the helmfile command.
pub fn helmfile_flags() -> Vec<FlagSpec> {
    common_flags()
}

/// Flags for the packer command.
pub fn packer_flags() -> Vec<FlagSpec> {
    common_flags()
}
