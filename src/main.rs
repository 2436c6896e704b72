use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;

use infrawrap::args::{
    names, resolve_command, FromParseResult, GlobalOptions, IdentitySelection, ProcessEnv,
};
use infrawrap::config::Config;
use infrawrap::launch::LaunchPlan;
use infrawrap::logging::{init_tracing, LogSettings};

/// Exit status for errors raised before the wrapped tool starts.
const EXIT_USAGE: u8 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "infrawrap",
    version,
    about = "Run infrastructure tools with resolved stack, identity and flags"
)]
struct Cli {
    /// Configuration file (default: $INFRAWRAP_CONFIG or the user config directory)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the resolved invocation as JSON instead of running the tool
    #[arg(long)]
    describe: bool,

    /// Command to run: terraform, helmfile, packer or a command declared in config
    command: String,

    /// Arguments for the command
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<OsString>,
}

/// Arguments must be UTF-8 to be classified; name the first one that is not.
fn utf8_args(args: Vec<OsString>) -> Result<Vec<String>> {
    args.into_iter()
        .enumerate()
        .map(|(index, arg)| {
            arg.into_string().map_err(|raw| {
                anyhow!("argument {} ({raw:?}) is not valid UTF-8", index + 1)
            })
        })
        .collect()
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(EXIT_USAGE)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load configuration")?;
    let args = utf8_args(cli.args)?;
    let view = config.view_for(&cli.command);

    let logging = LogSettings::resolve(&args, &ProcessEnv, &view);
    init_tracing(&logging.level, logging.file.as_deref(), logging.no_color);

    let command = resolve_command(&cli.command, &config)?;
    let parsed = command
        .parse(&args, &ProcessEnv, &view)
        .inspect_err(|err| tracing::debug!(%err, "argument parsing failed"))?;

    let global = GlobalOptions::from_parse_result(&parsed);
    tracing::debug!(
        command = %command.name,
        pass_through = ?parsed.pass_through_args,
        identity = ?global.identity,
        "resolved invocation"
    );

    let plan = LaunchPlan::from_parse(&command, &parsed);
    let dry_run = parsed.bool(names::DRY_RUN).unwrap_or(false);
    if cli.describe || dry_run {
        let out = serde_json::json!({ "parse": parsed, "launch": plan });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(ExitCode::SUCCESS);
    }

    if global.identity == IdentitySelection::Select {
        bail!("--identity without a value needs an interactive selector; pass --identity=<name>");
    }

    let Some(plan) = plan else {
        bail!("command '{}' does not wrap a tool", command.name);
    };

    let status = plan
        .command()
        .status()
        .with_context(|| format!("failed to run '{}'", plan.program))?;
    tracing::info!(program = %plan.program, code = ?status.code(), "tool exited");

    Ok(match status.code() {
        Some(0) => ExitCode::SUCCESS,
        Some(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        None => ExitCode::FAILURE,
    })
}
