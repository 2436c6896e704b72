//! Command definitions: registry + positional slots + wrapped tool.

use crate::args::assembler::{OptionsAssembler, ParseResult};
use crate::args::classifier::{classify, ClassifyPolicy, DEFAULT_SEPARATOR};
use crate::args::error::ArgsError;
use crate::args::positional::{bind_positionals, PositionalSlot};
use crate::args::registry::{
    global_flags, helmfile_flags, packer_flags, terraform_flags, terraform_tool_flags,
    FlagRegistry, FlagSpec, ToolFlag,
};
use crate::args::resolver::resolve_flags;
use crate::args::source::{ConfigView, EnvSource};
use crate::args::value::parse_external;
use crate::config::{value_to_string, CommandDeclaration, Config, FlagDeclaration};

/// Names of the commands that exist without any configuration.
pub const BUILTIN_COMMANDS: &[&str] = &["terraform", "helmfile", "packer"];

/// The external program a command hands its pass-through arguments to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedTool {
    pub program: String,
}

/// Everything needed to parse one command's arguments.
///
/// Immutable once built; `parse` keeps no state between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: String,
    pub registry: FlagRegistry,
    pub slots: Vec<PositionalSlot>,
    pub wrapped_tool: Option<WrappedTool>,
    pub separator: String,
}

impl CommandSpec {
    pub fn new(name: impl Into<String>, registry: FlagRegistry) -> Self {
        Self {
            name: name.into(),
            registry,
            slots: Vec::new(),
            wrapped_tool: None,
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }

    pub fn with_slot(mut self, slot: PositionalSlot) -> Self {
        self.slots.push(slot);
        self
    }

    /// Declare the wrapped tool. Unknown `--flags` then pass through instead of failing.
    pub fn wrapping(mut self, program: impl Into<String>) -> Self {
        self.wrapped_tool = Some(WrappedTool {
            program: program.into(),
        });
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn policy(&self) -> ClassifyPolicy {
        ClassifyPolicy {
            separator: self.separator.clone(),
            wraps_tool: self.wrapped_tool.is_some(),
        }
    }

    /// Parse one argument vector.
    ///
    /// Classify → resolve → bind → assemble. The first error aborts the parse.
    pub fn parse(
        &self,
        raw_args: &[String],
        env: &dyn EnvSource,
        config: &dyn ConfigView,
    ) -> Result<ParseResult, ArgsError> {
        let classified = classify(raw_args, &self.registry, &self.policy())?;
        let resolved = resolve_flags(&self.registry, &classified.values, env, config)?;
        let binding = bind_positionals(&self.slots, classified.unclassified())?;

        tracing::debug!(
            command = %self.name,
            positionals = binding.bound(),
            overflow = binding.overflow.len(),
            separator = classified.has_separator(),
            "parsed arguments"
        );

        Ok(OptionsAssembler::new(&self.name, raw_args)
            .with_classified(&classified)
            .with_flags(resolved)
            .with_binding(binding)
            .build())
    }

    /// Build a custom command from its config declaration.
    pub fn from_declaration(
        name: impl Into<String>,
        declaration: &CommandDeclaration,
    ) -> Result<Self, ArgsError> {
        let registry = FlagRegistry::from_specs(global_flags())?;
        let mut command = Self::new(name, registry);
        if let Some(tool) = &declaration.tool {
            command = command.wrapping(tool);
        }
        command.extend(declaration)?;
        Ok(command)
    }

    /// Add declared flags and arguments to this command.
    pub fn extend(&mut self, declaration: &CommandDeclaration) -> Result<(), ArgsError> {
        for flag in &declaration.flags {
            self.registry.register(flag_from_declaration(flag)?)?;
        }
        self.registry
            .extend_tool_flags(declaration.tool_flags.iter().cloned())?;
        self.slots.extend(declaration.arguments.iter().cloned());
        Ok(())
    }
}

fn flag_from_declaration(declaration: &FlagDeclaration) -> Result<FlagSpec, ArgsError> {
    let mut spec = FlagSpec::new(&declaration.name, declaration.kind)
        .valid_values(declaration.valid_values.iter().cloned())
        .description(&declaration.description);
    spec.shorthand = declaration.shorthand;
    spec.required = declaration.required;
    spec.sentinel = declaration.sentinel.clone();
    spec.env_vars = declaration.env.clone();

    if let Some(raw) = &declaration.default {
        let value = value_to_string(raw)
            .and_then(|s| parse_external(declaration.kind, &s))
            .ok_or_else(|| ArgsError::InvalidFlagSpec {
                name: declaration.name.clone(),
                reason: format!("default {raw} is not a valid {}", declaration.kind),
            })?;
        spec.default = Some(value);
    }
    Ok(spec)
}

fn tool_command(
    name: &str,
    flags: Vec<FlagSpec>,
    tool_flags: Vec<ToolFlag>,
) -> Result<CommandSpec, ArgsError> {
    let mut registry = FlagRegistry::from_specs(global_flags())?;
    registry.extend(flags)?;
    registry.extend_tool_flags(tool_flags)?;
    Ok(CommandSpec::new(name, registry)
        .wrapping(name)
        .with_slot(PositionalSlot::required("subcommand"))
        .with_slot(PositionalSlot::optional("component")))
}

pub fn terraform_command() -> Result<CommandSpec, ArgsError> {
    tool_command("terraform", terraform_flags(), terraform_tool_flags())
}

pub fn helmfile_command() -> Result<CommandSpec, ArgsError> {
    tool_command("helmfile", helmfile_flags(), Vec::new())
}

pub fn packer_command() -> Result<CommandSpec, ArgsError> {
    tool_command("packer", packer_flags(), Vec::new())
}

/// Builtin command by name, if there is one.
pub fn builtin_command(name: &str) -> Option<Result<CommandSpec, ArgsError>> {
    match name {
        "terraform" => Some(terraform_command()),
        "helmfile" => Some(helmfile_command()),
        "packer" => Some(packer_command()),
        _ => None,
    }
}

/// Find a command: builtin (extended by its config section) or declared in config.
pub fn resolve_command(name: &str, config: &Config) -> Result<CommandSpec, ArgsError> {
    let declaration = config.commands.get(name);
    match (builtin_command(name), declaration) {
        (Some(builtin), None) => builtin,
        (Some(builtin), Some(declaration)) => {
            let mut command = builtin?;
            command.extend(declaration)?;
            if let Some(tool) = &declaration.tool {
                command = command.wrapping(tool);
            }
            Ok(command)
        }
        (None, Some(declaration)) => CommandSpec::from_declaration(name, declaration),
        (None, None) => Err(ArgsError::UnknownCommand {
            name: name.to_string(),
        }),
    }
}
