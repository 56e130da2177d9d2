use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Overrides `--log-level` with full filter directives, e.g.
/// `RENARD_LOG=renard_frame=trace`.
pub const LOG_ENV: &str = "RENARD_LOG";

/// Crates whose events the CLI shows by default.
const LOG_TARGETS: [&str; 3] = ["renard", "renard_frame", "renard_transport"];

/// Shape of the log lines written to stderr.
#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    /// Every wire byte read by the decoder.
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Filter directives for `level`, scoped to the renard crates so dependency
/// noise stays out of the serial log.
fn directives(level: LogLevel) -> String {
    let level = LevelFilter::from(level);
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn build_filter(level: LogLevel, env_override: Option<&str>) -> EnvFilter {
    env_override
        .and_then(|spec| EnvFilter::try_new(spec).ok())
        .unwrap_or_else(|| EnvFilter::new(directives(level)))
}

/// Install the global subscriber. Logs always go to stderr so `--format raw`
/// output on stdout stays clean.
pub fn init_logging(format: LogFormat, level: LogLevel) {
    let env_override = std::env::var(LOG_ENV).ok();
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(build_filter(level, env_override.as_deref()))
        .with_ansi(false)
        .with_target(matches!(level, LogLevel::Debug | LogLevel::Trace));

    let _ = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
