//! Launch plan: the wrapped tool's program, arguments, environment and cwd.

use std::path::PathBuf;
use std::process::Command;

use serde::Serialize;

use crate::args::{
    names, CommandSpec, EnvSet, FromParseResult, GlobalOptions, IdentitySelection, ParseResult,
};

/// Slot target that names a component; consumed by the wrapper, not forwarded.
const COMPONENT_FIELD: &str = "component";

/// Ready-to-run parameters for the wrapped tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchPlan {
    /// Program to execute.
    pub program: String,
    /// Arguments for the program.
    pub args: Vec<String>,
    /// Environment variables to add.
    pub env: Vec<(String, String)>,
    /// Working directory, if `--chdir` was given.
    pub cwd: Option<PathBuf>,
}

impl LaunchPlan {
    /// Build the plan. `None` when the command wraps no tool.
    ///
    /// Arguments are the bound positionals in slot order (except the component)
    /// followed by the pass-through arguments, untouched.
    pub fn from_parse(command: &CommandSpec, result: &ParseResult) -> Option<Self> {
        let tool = command.wrapped_tool.as_ref()?;
        let global = GlobalOptions::from_parse_result(result);

        let mut args: Vec<String> = command
            .slots
            .iter()
            .filter(|slot| slot.field() != COMPONENT_FIELD)
            .filter_map(|slot| result.positional(&slot.name).map(String::from))
            .collect();
        args.extend(result.pass_through_args.iter().cloned());

        let mut env = EnvSet::new();
        if let Some(stack) = result.string(names::STACK).filter(|s| !s.is_empty()) {
            env = env.with_var("INFRAWRAP_STACK", stack);
        }
        if let Some(component) = result.field(COMPONENT_FIELD) {
            env = env.with_var("INFRAWRAP_COMPONENT", component);
        }
        if let IdentitySelection::Named(identity) = &global.identity {
            env = env.with_var("INFRAWRAP_IDENTITY", identity.as_str());
        }

        Some(Self {
            program: tool.program.clone(),
            args,
            env: env.build(),
            cwd: global.chdir.map(PathBuf::from),
        })
    }

    /// A `Command` ready to spawn.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd.envs(self.env.iter().map(|(k, v)| (k, v)));
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }
        cmd
    }
}
