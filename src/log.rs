//! Tracing subscriber setup.
//!
//! `RUST_LOG`, when set, wins over the configured level.

use std::sync::Once;

use tracing_subscriber::fmt::format::{DefaultFields, Format};
use tracing_subscriber::fmt::SubscriberBuilder;
use tracing_subscriber::EnvFilter;

use crate::config::{LogConfig, LogFormat};

static INIT: Once = Once::new();

type Subscriber = Box<dyn tracing::Subscriber + Send + Sync>;

/// Install the global subscriber. Later calls are no-ops.
pub fn init(config: &LogConfig) {
    INIT.call_once(|| {
        let subscriber = set_format(config, builder(config));
        if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
            eprintln!("Could not set the tracing subscriber: {e}");
        }
    });
}

pub fn env_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::builder().parse_lossy(&config.level))
}

pub fn builder(config: &LogConfig) -> SubscriberBuilder<DefaultFields, Format, EnvFilter> {
    let debug = is_debug(&config.level);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_file(debug)
        .with_line_number(debug)
}

pub fn set_format(
    config: &LogConfig,
    builder: SubscriberBuilder<DefaultFields, Format, EnvFilter>,
) -> Subscriber {
    match config.format {
        LogFormat::Pretty => Box::new(builder.pretty().finish()),
        LogFormat::Structured => Box::new(builder.json().finish()),
        LogFormat::Text => Box::new(builder.finish()),
    }
}

fn is_debug(level: &str) -> bool {
    let level = level.to_ascii_uppercase();
    level == "DEBUG" || level == "TRACE"
}
