//! Logging setup for the execql binary
//!
//! Log lines go to stderr so that stdout stays free for the run summary.
//! `RUST_LOG` takes precedence over the filter derived from `-v`.

use clap::ValueEnum;
use serde::Serialize;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const CRATES: [&str; 5] = [
    "execql",
    "execql_core",
    "execql_connection",
    "execql_dispatch",
    "execql_driver_postgres",
];

/// Console output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,

    /// Whether to include file/line information in logs
    pub include_location: bool,

    /// Whether to log span open/close (lanes, dispatch)
    pub enable_spans: bool,

    /// Filter used when `RUST_LOG` is unset
    pub default_filter: String,
}

impl LoggingConfig {
    pub fn from_verbosity(verbose: u8, format: LogFormat) -> Self {
        let level = match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        let mut default_filter = String::from("warn");
        for krate in CRATES {
            default_filter.push_str(&format!(",{}={}", krate, level));
        }

        Self {
            format,
            include_location: verbose > 1,
            enable_spans: verbose > 0,
            default_filter,
        }
    }
}

/// Install the global subscriber
pub fn init(config: LoggingConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let span_events = if config.enable_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let base = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_span_events(span_events);

    let layer = match config.format {
        LogFormat::Pretty => base.pretty().with_filter(env_filter).boxed(),
        LogFormat::Compact => base.compact().with_filter(env_filter).boxed(),
        LogFormat::Json => base
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_filter(env_filter)
            .boxed(),
    };

    tracing_subscriber::registry().with(layer).try_init()?;

    tracing::debug!(
        format = ?config.format,
        filter = %config.default_filter,
        "logging initialized"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_levels() {
        let quiet = LoggingConfig::from_verbosity(0, LogFormat::Pretty);
        assert!(quiet.default_filter.starts_with("warn,"));
        assert!(quiet.default_filter.contains("execql_dispatch=info"));
        assert!(!quiet.enable_spans);

        let verbose = LoggingConfig::from_verbosity(1, LogFormat::Json);
        assert!(verbose.default_filter.contains("execql_driver_postgres=debug"));
        assert!(verbose.enable_spans);
        assert!(!verbose.include_location);

        let trace = LoggingConfig::from_verbosity(5, LogFormat::Compact);
        assert!(trace.default_filter.contains("execql=trace"));
        assert!(trace.include_location);
    }

    #[test]
    fn test_default_filter_parses() {
        let config = LoggingConfig::from_verbosity(2, LogFormat::Pretty);
        assert!(EnvFilter::try_new(&config.default_filter).is_ok());
    }
}
