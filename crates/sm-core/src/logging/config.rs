//! Logging settings resolved from the environment and CLI flags.
//!
//! Precedence, lowest first: built-in defaults, `RUST_LOG` (coarse level only),
//! `SM_LOG`, `SM_LOG_FORMAT`, then `-v/-q` and `--log-format`.

use serde::{Deserialize, Serialize};

/// Where log lines go and how they look. Both variants write to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// `tracing_subscriber::fmt` lines for terminals.
    #[default]
    Human,
    /// One JSON object per line.
    Jsonl,
}

impl LogFormat {
    const ALIASES: [(&'static str, LogFormat); 6] = [
        ("human", LogFormat::Human),
        ("console", LogFormat::Human),
        ("pretty", LogFormat::Human),
        ("jsonl", LogFormat::Jsonl),
        ("json", LogFormat::Jsonl),
        ("structured", LogFormat::Jsonl),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Human => "human",
            LogFormat::Jsonl => "jsonl",
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALIASES
            .iter()
            .find(|(alias, _)| *alias == wanted)
            .map(|(_, format)| *format)
            .ok_or_else(|| format!("unrecognized SM_LOG_FORMAT value '{s}'"))
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verbosity for the `sm_core` target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    /// Nothing at all.
    Off,
}

impl LogLevel {
    const ALIASES: [(&'static str, LogLevel); 9] = [
        ("trace", LogLevel::Trace),
        ("debug", LogLevel::Debug),
        ("info", LogLevel::Info),
        ("warn", LogLevel::Warn),
        ("warning", LogLevel::Warn),
        ("error", LogLevel::Error),
        ("off", LogLevel::Off),
        ("none", LogLevel::Off),
        ("quiet", LogLevel::Off),
    ];

    /// Directive spelling understood by `EnvFilter`.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }

    /// Most verbose level named anywhere in a `RUST_LOG` directive string.
    fn most_verbose_in(directives: &str) -> Option<LogLevel> {
        let lowered = directives.to_ascii_lowercase();
        [
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
        ]
        .into_iter()
        .find(|level| lowered.contains(level.as_str()))
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALIASES
            .iter()
            .find(|(alias, _)| *alias == wanted)
            .map(|(_, level)| *level)
            .ok_or_else(|| format!("unrecognized SM_LOG value '{s}'"))
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved logging settings handed to [`super::init_logging`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    /// Prefix human lines with a timestamp.
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new(LogLevel::Info, LogFormat::Human)
    }
}

impl LogConfig {
    pub fn new(level: LogLevel, format: LogFormat) -> Self {
        Self {
            format,
            level,
            timestamps: true,
        }
    }

    /// Resolve from the process environment, then apply CLI overrides.
    pub fn from_env(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        Self::from_vars(|key| std::env::var(key).ok(), cli_level, cli_format)
    }

    /// Resolve from any variable lookup, then apply CLI overrides.
    ///
    /// Unparseable values are ignored rather than rejected.
    pub fn from_vars<F>(lookup: F, cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_level = match lookup("SM_LOG") {
            Some(value) => value.parse().ok(),
            None => lookup("RUST_LOG").and_then(|d| LogLevel::most_verbose_in(&d)),
        };
        let env_format = lookup("SM_LOG_FORMAT").and_then(|value| value.parse().ok());

        let defaults = Self::default();
        Self {
            level: cli_level.or(env_level).unwrap_or(defaults.level),
            format: cli_format.or(env_format).unwrap_or(defaults.format),
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn aliases_parse() {
        assert_eq!("Console".parse::<LogFormat>(), Ok(LogFormat::Human));
        assert_eq!(" structured ".parse::<LogFormat>(), Ok(LogFormat::Jsonl));
        assert!("xml".parse::<LogFormat>().is_err());

        assert_eq!("WARNING".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!("none".parse::<LogLevel>(), Ok(LogLevel::Off));
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn sm_log_beats_rust_log() {
        let config = LogConfig::from_vars(lookup(&[("SM_LOG", "warn"), ("RUST_LOG", "trace")]), None, None);
        assert_eq!(config.level, LogLevel::Warn);
    }

    #[test]
    fn rust_log_contributes_most_verbose_level() {
        let config = LogConfig::from_vars(
            lookup(&[("RUST_LOG", "rayon=warn,sm_core=debug")]),
            None,
            None,
        );
        assert_eq!(config.level, LogLevel::Debug);

        let config = LogConfig::from_vars(lookup(&[("RUST_LOG", "sm_core")]), None, None);
        assert_eq!(config.level, LogLevel::Info);
    }

    #[test]
    fn flags_beat_environment() {
        let config = LogConfig::from_vars(
            lookup(&[("SM_LOG", "error"), ("SM_LOG_FORMAT", "jsonl")]),
            Some(LogLevel::Trace),
            Some(LogFormat::Human),
        );
        assert_eq!(config, LogConfig::new(LogLevel::Trace, LogFormat::Human));
    }

    #[test]
    fn garbage_environment_falls_back_to_defaults() {
        let config = LogConfig::from_vars(
            lookup(&[("SM_LOG", "loud"), ("SM_LOG_FORMAT", "xml")]),
            None,
            None,
        );
        assert_eq!(config, LogConfig::default());
    }

    #[test]
    fn levels_order_by_verbosity() {
        assert!(LogLevel::Trace < LogLevel::Info);
        assert!(LogLevel::Error < LogLevel::Off);
        assert_eq!(LogLevel::Debug.to_string(), "debug");
    }
}
