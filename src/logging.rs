use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::args::{
    classify, global_flags, names, resolve_flags, ClassifyPolicy, ConfigView, EnvSource,
    FlagRegistry, FlagValue,
};

/// Environment variable holding an `EnvFilter` directive. Overrides `--logs-level`.
pub const LOG_ENV: &str = "INFRAWRAP_LOG";

/// Logging flags, resolved before the command's own parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: String,
    pub file: Option<String>,
    pub no_color: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "Info".to_string(),
            file: None,
            no_color: false,
        }
    }
}

impl LogSettings {
    /// Resolve `--logs-level`, `--logs-file` and `--no-color` from the global
    /// flags alone, with the usual CLI > env > config > default precedence.
    ///
    /// Falls back to the defaults on any error; the full parse reports it.
    pub fn resolve(args: &[String], env: &dyn EnvSource, config: &dyn ConfigView) -> Self {
        let Ok(registry) = FlagRegistry::from_specs(global_flags()) else {
            return Self::default();
        };
        let resolved = classify(args, &registry, &ClassifyPolicy::default())
            .and_then(|classified| resolve_flags(&registry, &classified.values, env, config));
        let Ok(resolved) = resolved else {
            return Self::default();
        };

        let value = |name: &str| resolved.get(name).map(|r| &r.value);
        let string = |name: &str| {
            value(name)
                .and_then(FlagValue::as_str)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };
        Self {
            level: string(names::LOGS_LEVEL).unwrap_or_else(|| Self::default().level),
            file: string(names::LOGS_FILE),
            no_color: value(names::NO_COLOR)
                .and_then(FlagValue::as_bool)
                .unwrap_or(false),
        }
    }
}

/// Map a `--logs-level` value to a filter directive.
pub fn level_directive(level: &str) -> &'static str {
    match level {
        "Trace" => "trace",
        "Debug" => "debug",
        "Warning" => "warn",
        "Off" => "off",
        _ => "info",
    }
}

/// Initialize tracing.
///
/// Logs go to stderr unless `log_file` is set. File names get a
/// `.{timestamp}.{pid}` suffix so concurrent runs never share a file.
pub fn init_tracing(level: &str, log_file: Option<&str>, no_color: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(level_directive(level)));

    if let Some(log_path) = log_file {
        let pid = std::process::id();
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let unique_path = format!("{}.{}.{}", log_path, timestamp, pid);

        match std::fs::File::create(&unique_path) {
            Ok(file) => {
                let file_layer = fmt::layer()
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false)
                    .with_target(true)
                    .with_level(true);
                let _ = tracing_subscriber::registry()
                    .with(filter)
                    .with(file_layer)
                    .try_init();
                return;
            }
            Err(e) => eprintln!("Warning: Failed to create log file {}: {}", unique_path, e),
        }
    }

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init();
}
