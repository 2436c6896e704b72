//! Error taxonomy for argument resolution.
//!
//! Every variant names the flag, slot or command at fault so the user can fix
//! the exact mistake. All of them abort the parse before the wrapped tool runs.

use std::fmt;

use thiserror::Error;

use crate::args::value::FlagKind;

/// Where an externally supplied flag value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Read from the named environment variable.
    Env(String),
    /// Read from the configuration view.
    Config,
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Env(var) => write!(f, "environment variable {var}"),
            Self::Config => f.write_str("configuration"),
        }
    }
}

/// Errors produced while building a registry or parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgsError {
    /// Two flags share a name or a shorthand.
    #[error("flag '{name}' is already registered")]
    DuplicateFlag { name: String },

    /// A flag definition is internally inconsistent.
    #[error("invalid definition for flag '{name}': {reason}")]
    InvalidFlagSpec { name: String, reason: String },

    /// A double-dash token matches no registered flag and the command wraps no tool.
    #[error("unknown flag '{token}'")]
    UnknownFlag { token: String },

    /// A value flag was the last token.
    #[error("flag '--{flag}' requires a value")]
    MissingFlagValue { flag: String },

    /// A command-line token does not parse as the flag's kind.
    #[error("invalid {kind} value '{token}' for flag '--{flag}'")]
    MalformedFlagValue {
        flag: String,
        kind: FlagKind,
        token: String,
    },

    /// An environment or config string does not parse as the flag's kind.
    #[error("invalid {kind} value '{value}' for flag '--{flag}' from {origin}")]
    ConfigValueType {
        flag: String,
        kind: FlagKind,
        value: String,
        origin: ValueSource,
    },

    /// A resolved value is outside the flag's allowed set.
    #[error("invalid value '{value}' for flag '--{flag}' (valid: {})", .allowed.join(", "))]
    InvalidFlagValue {
        flag: String,
        value: String,
        allowed: Vec<String>,
    },

    /// A required flag has no value from the command line, environment or config.
    #[error("required flag '--{flag}' was not provided")]
    RequiredFlagMissing { flag: String },

    /// Fewer positional tokens than required slots.
    #[error("missing required argument '{slot}'")]
    MissingPositionalArg { slot: String },

    /// The requested command is neither builtin nor declared in config.
    #[error("unknown command '{name}'")]
    UnknownCommand { name: String },
}
