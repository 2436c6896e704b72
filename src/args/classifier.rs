//! Argument classifier: raw args → classified args.
//!
//! One left-to-right scan; a value flag takes the next token. Tokens are never
//! reordered; classification only labels them.

use std::collections::BTreeMap;

use crate::args::error::ArgsError;
use crate::args::registry::{FlagRegistry, FlagSpec, ToolFlag};
use crate::args::value::{parse_token, FlagKind, FlagValue};

/// Conventional separator token.
pub const DEFAULT_SEPARATOR: &str = "--";

/// What a raw token turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenClass {
    /// A native flag (bare or equals form), holding the flag's long name.
    NativeFlag(String),
    /// The token consumed as the value of the named flag.
    NativeFlagValue(String),
    /// The first separator token.
    Separator,
    /// A wrapped-tool flag before the separator, or the value it takes.
    ToolArg,
    /// After the separator; handed to the wrapped tool verbatim.
    PassThrough,
    /// Not a native flag. Positional or pass-through, decided by the binder.
    Unclassified,
}

/// One element of the raw argument vector plus its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentToken {
    pub raw: String,
    pub index: usize,
    pub class: TokenClass,
}

/// How the classifier treats tokens it cannot match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifyPolicy {
    /// Token that ends native parsing.
    pub separator: String,
    /// The command wraps a tool, so unknown `--flags` belong to it.
    pub wraps_tool: bool,
}

impl Default for ClassifyPolicy {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            wraps_tool: true,
        }
    }
}

/// Result of classifying raw arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifyResult {
    /// Every raw token, in order.
    pub tokens: Vec<ArgumentToken>,
    /// Command-line values per flag name. Lists accumulate, scalars keep the last occurrence.
    pub values: BTreeMap<String, FlagValue>,
}

impl ClassifyResult {
    /// Unclassified tokens in original order.
    pub fn unclassified(&self) -> Vec<String> {
        self.raw_with(|class| matches!(class, TokenClass::Unclassified))
    }

    /// Tokens after the separator, verbatim.
    pub fn pass_through_tail(&self) -> Vec<String> {
        self.raw_with(|class| matches!(class, TokenClass::PassThrough))
    }

    /// Wrapped-tool flags and their values found before the separator.
    pub fn tool_args(&self) -> Vec<String> {
        self.raw_with(|class| matches!(class, TokenClass::ToolArg))
    }

    /// Flags, their values and the separator.
    pub fn consumed_count(&self) -> usize {
        self.tokens
            .iter()
            .filter(|t| {
                matches!(
                    t.class,
                    TokenClass::NativeFlag(_) | TokenClass::NativeFlagValue(_) | TokenClass::Separator
                )
            })
            .count()
    }

    pub fn has_separator(&self) -> bool {
        self.tokens.iter().any(|t| t.class == TokenClass::Separator)
    }

    fn raw_with(&self, pred: impl Fn(&TokenClass) -> bool) -> Vec<String> {
        self.tokens
            .iter()
            .filter(|t| pred(&t.class))
            .map(|t| t.raw.clone())
            .collect()
    }
}

/// Classify raw args against the registry.
pub fn classify(
    raw_args: &[String],
    registry: &FlagRegistry,
    policy: &ClassifyPolicy,
) -> Result<ClassifyResult, ArgsError> {
    let mut tokens = Vec::with_capacity(raw_args.len());
    let mut values = BTreeMap::new();
    let mut separated = false;
    let mut iter = raw_args.iter().enumerate();

    while let Some((index, arg)) = iter.next() {
        if separated {
            tokens.push(token(arg, index, TokenClass::PassThrough));
            continue;
        }

        if *arg == policy.separator {
            separated = true;
            tracing::trace!(index, "separator");
            tokens.push(token(arg, index, TokenClass::Separator));
            continue;
        }

        if let Some(flag) = match_tool_flag(arg, registry) {
            tokens.push(token(arg, index, TokenClass::ToolArg));
            if flag.takes_value() && !arg.contains('=') {
                // At the end of input the tool reports the missing value itself.
                if let Some((value_index, value)) = iter.next() {
                    tokens.push(token(value, value_index, TokenClass::ToolArg));
                }
            }
            tracing::trace!(index, flag = %flag.name, "tool flag");
            continue;
        }

        // --name=value, -s=value, -name=value
        if let Some((head, value)) = arg.split_once('=') {
            if let Some(spec) = match_equals_head(head, registry) {
                let parsed = parse_cli(spec, value)?;
                record(&mut values, spec, parsed);
                tracing::trace!(index, flag = %spec.name, "equals form");
                tokens.push(token(arg, index, TokenClass::NativeFlag(spec.name.clone())));
                continue;
            }
        } else if let Some(spec) = match_bare(arg, registry) {
            tokens.push(token(arg, index, TokenClass::NativeFlag(spec.name.clone())));

            if let Some(sentinel) = &spec.sentinel {
                // Used alone: never look at the next token.
                let parsed = parse_cli(spec, sentinel)?;
                record(&mut values, spec, parsed);
                tracing::trace!(index, flag = %spec.name, "sentinel");
                continue;
            }

            let Some((value_index, value)) = iter.next() else {
                return Err(ArgsError::MissingFlagValue {
                    flag: spec.name.clone(),
                });
            };
            let parsed = parse_cli(spec, value)?;
            record(&mut values, spec, parsed);
            tracing::trace!(index, flag = %spec.name, "bare form with value");
            tokens.push(token(
                value,
                value_index,
                TokenClass::NativeFlagValue(spec.name.clone()),
            ));
            continue;
        }

        if is_double_dash(arg) && !policy.wraps_tool {
            return Err(ArgsError::UnknownFlag { token: arg.clone() });
        }

        tracing::trace!(index, arg = %arg, "unclassified");
        tokens.push(token(arg, index, TokenClass::Unclassified));
    }

    Ok(ClassifyResult { tokens, values })
}

fn token(raw: &str, index: usize, class: TokenClass) -> ArgumentToken {
    ArgumentToken {
        raw: raw.to_string(),
        index,
        class,
    }
}

fn is_double_dash(arg: &str) -> bool {
    arg.len() > 2 && arg.starts_with("--")
}

/// Match `-name` or `-name=value` against the wrapped tool's flags.
fn match_tool_flag<'r>(arg: &str, registry: &'r FlagRegistry) -> Option<&'r ToolFlag> {
    if arg.starts_with("--") {
        return None;
    }
    let head = arg.split_once('=').map_or(arg, |(head, _)| head);
    registry.tool_flag(head)
}

/// Match the part before `=`: `--name`, `-s` or `-name`.
fn match_equals_head<'r>(head: &str, registry: &'r FlagRegistry) -> Option<&'r FlagSpec> {
    if let Some(name) = head.strip_prefix("--") {
        return registry.by_long(name);
    }
    let body = head.strip_prefix('-')?;
    let mut chars = body.chars();
    match (chars.next(), chars.next()) {
        (Some(short), None) => registry.by_short(short),
        (Some(_), Some(_)) => registry.by_long(body),
        _ => None,
    }
}

/// Match `--name` or `-s` exactly.
fn match_bare<'r>(arg: &str, registry: &'r FlagRegistry) -> Option<&'r FlagSpec> {
    if let Some(name) = arg.strip_prefix("--") {
        return registry.by_long(name);
    }
    let body = arg.strip_prefix('-')?;
    let mut chars = body.chars();
    match (chars.next(), chars.next()) {
        (Some(short), None) => registry.by_short(short),
        _ => None,
    }
}

fn parse_cli(spec: &FlagSpec, raw: &str) -> Result<FlagValue, ArgsError> {
    parse_token(spec.kind, raw).ok_or_else(|| ArgsError::MalformedFlagValue {
        flag: spec.name.clone(),
        kind: spec.kind,
        token: raw.to_string(),
    })
}

fn record(values: &mut BTreeMap<String, FlagValue>, spec: &FlagSpec, value: FlagValue) {
    if spec.kind == FlagKind::StringList {
        if let (Some(FlagValue::StringList(existing)), FlagValue::StringList(new)) =
            (values.get_mut(&spec.name), &value)
        {
            existing.extend(new.iter().cloned());
            return;
        }
    }
    values.insert(spec.name.clone(), value);
}
