#![forbid(unsafe_code)]

//! Structured logging setup.
//!
//! Library code only emits `tracing` events and spans; hosts that want them
//! printed call [`init`] once at startup:
//!
//! - `RUST_LOG` filter support, default `info` for the three clockface crates;
//! - JSON lines when `CLOCKFACE_LOG_FORMAT=json`, human-readable otherwise;
//! - output goes to stderr.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "clockface_web=info,clockface_render=info,clockface_core=info";
const ENV_LOG_FORMAT: &str = "CLOCKFACE_LOG_FORMAT";

/// Output format for the global subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Format requested by `CLOCKFACE_LOG_FORMAT`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_value(std::env::var(ENV_LOG_FORMAT).ok().as_deref())
    }

    fn from_value(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Install the global subscriber using the environment.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init() {
    init_with(LogFormat::from_env());
}

/// Install the global subscriber with an explicit format.
pub fn init_with(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let _ = match format {
        LogFormat::Json => subscriber.json().try_init(),
        LogFormat::Pretty => subscriber.try_init(),
    };
}
