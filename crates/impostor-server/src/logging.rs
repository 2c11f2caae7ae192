//! Logging configuration and initialization.
//!
//! Presets are picked from CLI flags, individual targets can be overridden
//! with `--log TARGET=LEVEL`, and `RUST_LOG` replaces the whole filter when set.

use std::collections::HashMap;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: '{}'. Use 'text' or 'json'.", s)),
        }
    }
}

/// Logging preset levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogPreset {
    /// Room lifecycle and startup only
    #[default]
    Production,
    /// Adds per-connection and vote activity
    Verbose,
    Debug,
    Trace,
    /// Warnings and errors only
    Quiet,
}

/// Logging configuration built from CLI arguments.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub preset: LogPreset,
    /// Per-target level overrides (e.g. "impostor::vote" -> DEBUG)
    pub overrides: HashMap<String, Level>,
    pub format: LogFormat,
}

impl LogConfig {
    pub fn from_cli(
        verbose: bool,
        debug: bool,
        trace: bool,
        quiet: bool,
        log_overrides: Vec<String>,
        format: LogFormat,
    ) -> Self {
        let preset = if quiet {
            LogPreset::Quiet
        } else if trace {
            LogPreset::Trace
        } else if debug {
            LogPreset::Debug
        } else if verbose {
            LogPreset::Verbose
        } else {
            LogPreset::Production
        };

        // "vote=debug" and "impostor::vote=debug" are equivalent.
        let mut overrides = HashMap::new();
        for override_str in log_overrides {
            for part in override_str.split(',') {
                let Some((target, level_str)) = part.split_once('=') else {
                    continue;
                };
                let target = target.trim();
                let full_target = if target.starts_with("impostor::") || target == "tower_http" {
                    target.to_string()
                } else {
                    format!("impostor::{}", target)
                };

                if let Ok(level) = parse_level(level_str.trim()) {
                    overrides.insert(full_target, level);
                }
            }
        }

        Self {
            preset,
            overrides,
            format,
        }
    }

    fn directives(&self) -> Vec<String> {
        let mut directives: Vec<String> = match self.preset {
            LogPreset::Production => vec![
                "impostor::startup=info".into(),
                "impostor::api=info".into(),
                "impostor::ws=warn".into(),
                "impostor::room=info".into(),
                "impostor::vote=info".into(),
                "impostor::corpus=info".into(),
                "impostor::transport=warn".into(),
                "tower_http=warn".into(),
            ],
            LogPreset::Verbose => vec![
                "impostor=info".into(),
                "tower_http=info".into(),
            ],
            LogPreset::Debug => vec![
                "impostor=debug".into(),
                "tower_http=debug".into(),
            ],
            LogPreset::Trace => vec![
                "impostor=trace".into(),
                "tower_http=trace".into(),
            ],
            LogPreset::Quiet => vec![
                "impostor=warn".into(),
                "tower_http=error".into(),
            ],
        };

        let mut overrides: Vec<_> = self.overrides.iter().collect();
        overrides.sort();
        for (target, level) in overrides {
            directives.push(format!("{}={}", target, level_to_str(*level)));
        }
        directives
    }

    /// Build an EnvFilter from this configuration.
    pub fn build_filter(&self) -> EnvFilter {
        if let Ok(env_filter) = EnvFilter::try_from_default_env() {
            return env_filter;
        }

        let filter_str = self.directives().join(",");
        EnvFilter::try_new(&filter_str).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

fn parse_level(s: &str) -> Result<Level, ()> {
    match s.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(()),
    }
}

fn level_to_str(level: Level) -> &'static str {
    match level {
        Level::TRACE => "trace",
        Level::DEBUG => "debug",
        Level::INFO => "info",
        Level::WARN => "warn",
        Level::ERROR => "error",
    }
}

/// Initialize the global tracing subscriber.
pub fn init(config: &LogConfig) {
    let filter = config.build_filter();

    match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_thread_ids(false)
                        .with_file(false)
                        .with_line_number(false),
                )
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_span_events(FmtSpan::CLOSE),
                )
                .init();
        }
    }
}
