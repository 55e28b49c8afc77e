//! Structured logging for sm-core.
//!
//! stdout belongs to command payloads, so every subscriber writes to stderr,
//! either as `fmt` lines or as JSONL through [`JsonlLayer`]. Events carry a
//! stable `event` field from [`event_names`]; the CLI opens a span holding its
//! `run_id`, and nested spans add `stage` and `key`.

pub mod config;
pub mod events;
pub mod layer;

pub use config::{LogConfig, LogFormat, LogLevel};
pub use events::{event_names, Level, Stage};
pub use layer::JsonlLayer;

use std::io::IsTerminal;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

/// `RUST_LOG` directives when present, otherwise `sm_core=<level>` with
/// every other target silenced.
fn env_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::OFF.into())
            .parse_lossy(format!("sm_core={}", config.level))
    })
}

/// The output layer for the configured format.
fn output_layer(config: &LogConfig) -> Box<dyn Layer<Registry> + Send + Sync> {
    match config.format {
        LogFormat::Jsonl => JsonlLayer::stderr().boxed(),
        LogFormat::Human => {
            let lines = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(std::io::stderr().is_terminal());
            if config.timestamps {
                lines.boxed()
            } else {
                lines.without_time().boxed()
            }
        }
    }
}

/// Install the global subscriber. Later calls leave the first one in place.
pub fn init_logging(config: &LogConfig) {
    let installed = tracing_subscriber::registry()
        .with(output_layer(config))
        .with(env_filter(config))
        .try_init();

    if installed.is_err() {
        tracing::debug!("subscriber already installed; keeping it");
    }
}

/// Short identifier correlating the log lines and payload of one invocation.
pub fn generate_run_id() -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    format!("run-{}", &hex[..12])
}
