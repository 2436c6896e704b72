//! Typed per-command views copied out of a [`ParseResult`].

use serde::Serialize;

use crate::args::assembler::ParseResult;
use crate::args::registry::{names, IDENTITY_SELECT};

/// Build a typed view from a parse result by copying fields.
pub trait FromParseResult: Sized {
    fn from_parse_result(result: &ParseResult) -> Self;
}

/// What the `identity` flag asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentitySelection {
    /// No identity given anywhere.
    Unset,
    /// `--identity` alone: the caller should let the user pick one.
    Select,
    /// `false`, `0`, `no` or `off` in any case: authentication is turned off.
    Disabled,
    Named(String),
}

/// Identity values that turn authentication off.
const IDENTITY_DISABLED: &[&str] = &["false", "0", "no", "off"];

impl IdentitySelection {
    pub fn from_value(value: &str) -> Self {
        match value {
            "" => Self::Unset,
            IDENTITY_SELECT => Self::Select,
            v if IDENTITY_DISABLED.iter().any(|d| v.eq_ignore_ascii_case(d)) => Self::Disabled,
            name => Self::Named(name.to_string()),
        }
    }
}

/// Flags shared verbatim by every command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlobalOptions {
    pub logs_level: String,
    pub logs_file: Option<String>,
    pub no_color: bool,
    pub chdir: Option<String>,
    pub base_path: Option<String>,
    pub config_paths: Vec<String>,
    pub identity: IdentitySelection,
}

impl FromParseResult for GlobalOptions {
    fn from_parse_result(result: &ParseResult) -> Self {
        Self {
            logs_level: result.string(names::LOGS_LEVEL).unwrap_or_default().to_string(),
            logs_file: non_empty(result.string(names::LOGS_FILE)),
            no_color: result.bool(names::NO_COLOR).unwrap_or_default(),
            chdir: non_empty(result.string(names::CHDIR)),
            base_path: non_empty(result.string(names::BASE_PATH)),
            config_paths: result
                .list(names::CONFIG_PATH)
                .map(<[String]>::to_vec)
                .unwrap_or_default(),
            identity: IdentitySelection::from_value(
                result.string(names::IDENTITY).unwrap_or_default(),
            ),
        }
    }
}

/// Options of a tool-wrapping command (helmfile, packer, custom commands).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolOptions {
    pub global: GlobalOptions,
    pub stack: Option<String>,
    pub dry_run: bool,
    pub subcommand: Option<String>,
    pub component: Option<String>,
    pub pass_through: Vec<String>,
}

impl FromParseResult for ToolOptions {
    fn from_parse_result(result: &ParseResult) -> Self {
        Self {
            global: GlobalOptions::from_parse_result(result),
            stack: non_empty(result.string(names::STACK)),
            dry_run: result.bool(names::DRY_RUN).unwrap_or_default(),
            subcommand: result.field("subcommand").map(String::from),
            component: result.field("component").map(String::from),
            pass_through: result.pass_through_args.clone(),
        }
    }
}

/// Options of the terraform command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TerraformOptions {
    pub tool: ToolOptions,
    pub upload_status: bool,
    pub skip_init: bool,
    pub from_plan: Option<String>,
}

impl FromParseResult for TerraformOptions {
    fn from_parse_result(result: &ParseResult) -> Self {
        Self {
            tool: ToolOptions::from_parse_result(result),
            upload_status: result.bool(names::UPLOAD_STATUS).unwrap_or_default(),
            skip_init: result.bool(names::SKIP_INIT).unwrap_or_default(),
            from_plan: non_empty(result.string(names::FROM_PLAN)),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(String::from)
}
