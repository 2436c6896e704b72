//! Argument resolution pipeline.
//!
//! Splits a raw argument vector into native flags, positional arguments and
//! pass-through arguments for the wrapped tool:
//!
//! ```text
//! raw args → classify → resolve (CLI > env > config > default) → bind positionals → assemble
//! ```
//!
//! Each stage is a pure function of its inputs and can be unit-tested on its own.

mod assembler;
mod classifier;
mod command;
mod error;
mod options;
mod positional;
mod registry;
mod resolver;
mod source;
mod value;

pub use assembler::{OptionsAssembler, ParseResult};
pub use classifier::{
    classify, ArgumentToken, ClassifyPolicy, ClassifyResult, TokenClass, DEFAULT_SEPARATOR,
};
pub use command::{
    builtin_command, helmfile_command, packer_command, resolve_command, terraform_command,
    CommandSpec, WrappedTool, BUILTIN_COMMANDS,
};
pub use error::{ArgsError, ValueSource};
pub use options::{
    FromParseResult, GlobalOptions, IdentitySelection, TerraformOptions, ToolOptions,
};
pub use positional::{bind_positionals, Binding, PositionalSlot};
pub use registry::{
    common_flags, global_flags, helmfile_flags, names, packer_flags, terraform_flags,
    terraform_tool_flags, FlagRegistry, FlagSpec, ToolFlag, ToolFlagArity, IDENTITY_SELECT,
    LOG_LEVELS,
};
pub use resolver::{resolve_flag, resolve_flags, ResolvedFlagValue, Source};
pub use source::{ConfigView, EnvSet, EnvSource, NoConfig, ProcessEnv};
pub use value::{parse_bool, parse_external, parse_int, parse_token, FlagKind, FlagValue};
