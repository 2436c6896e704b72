//! Precedence resolver: CLI > environment > config > default, per flag.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::args::error::{ArgsError, ValueSource};
use crate::args::registry::{FlagRegistry, FlagSpec};
use crate::args::source::{ConfigView, EnvSource};
use crate::args::value::{parse_external, FlagValue};

/// Which source produced a resolved value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Cli,
    Env,
    Config,
    Default,
}

/// Final value of one flag and where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedFlagValue {
    pub flag: String,
    pub value: FlagValue,
    pub source: Source,
}

/// Resolve every flag in the registry. Exactly one entry per flag.
pub fn resolve_flags(
    registry: &FlagRegistry,
    cli: &BTreeMap<String, FlagValue>,
    env: &dyn EnvSource,
    config: &dyn ConfigView,
) -> Result<BTreeMap<String, ResolvedFlagValue>, ArgsError> {
    let mut resolved = BTreeMap::new();
    for spec in registry.all() {
        let value = resolve_flag(spec, cli.get(&spec.name), env, config)?;
        tracing::debug!(flag = %spec.name, source = ?value.source, "resolved flag");
        resolved.insert(spec.name.clone(), value);
    }
    Ok(resolved)
}

/// Resolve a single flag given its command-line value, if any.
pub fn resolve_flag(
    spec: &FlagSpec,
    cli: Option<&FlagValue>,
    env: &dyn EnvSource,
    config: &dyn ConfigView,
) -> Result<ResolvedFlagValue, ArgsError> {
    let found = match cli {
        Some(value) => Some((value.clone(), Source::Cli)),
        None => match from_env(spec, env)? {
            Some(found) => Some(found),
            None => from_config(spec, config)?,
        },
    };

    let (value, source) = match found {
        Some(found) => found,
        None if spec.required => {
            return Err(ArgsError::RequiredFlagMissing {
                flag: spec.name.clone(),
            })
        }
        None => (
            spec.default.clone().unwrap_or_else(|| spec.kind.zero_value()),
            Source::Default,
        ),
    };

    if source != Source::Default {
        check_allowed(spec, &value)?;
    }

    Ok(ResolvedFlagValue {
        flag: spec.name.clone(),
        value,
        source,
    })
}

fn from_env(
    spec: &FlagSpec,
    env: &dyn EnvSource,
) -> Result<Option<(FlagValue, Source)>, ArgsError> {
    for var in &spec.env_vars {
        if let Some(raw) = env.var(var) {
            let value = parse_external_for(spec, &raw, ValueSource::Env(var.clone()))?;
            return Ok(Some((value, Source::Env)));
        }
    }
    Ok(None)
}

fn from_config(
    spec: &FlagSpec,
    config: &dyn ConfigView,
) -> Result<Option<(FlagValue, Source)>, ArgsError> {
    match config.get(&spec.name) {
        Some(raw) => {
            let value = parse_external_for(spec, &raw, ValueSource::Config)?;
            Ok(Some((value, Source::Config)))
        }
        None => Ok(None),
    }
}

fn parse_external_for(
    spec: &FlagSpec,
    raw: &str,
    origin: ValueSource,
) -> Result<FlagValue, ArgsError> {
    parse_external(spec.kind, raw).ok_or_else(|| ArgsError::ConfigValueType {
        flag: spec.name.clone(),
        kind: spec.kind,
        value: raw.to_string(),
        origin,
    })
}

fn check_allowed(spec: &FlagSpec, value: &FlagValue) -> Result<(), ArgsError> {
    let rejected = match value {
        FlagValue::String(s) => (!spec.allows(s)).then(|| s.clone()),
        FlagValue::StringList(items) => items.iter().find(|s| !spec.allows(s)).cloned(),
        FlagValue::Bool(_) | FlagValue::Int(_) => None,
    };
    match rejected {
        Some(value) => Err(ArgsError::InvalidFlagValue {
            flag: spec.name.clone(),
            value,
            allowed: spec.valid_values.clone(),
        }),
        None => Ok(()),
    }
}
