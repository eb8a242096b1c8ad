//! Tracing setup and log formatting helpers

use crate::config::LogConfig;
use serde::Serialize;
use std::fmt::Debug;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

/// Install the global subscriber
///
/// `RUST_LOG` wins over the configured level when set. Calling this again
/// after a subscriber is installed does nothing and returns `false`.
pub fn init_logging(config: &LogConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(config.ansi),
        )
        .try_init()
        .is_ok()
}

/// Wrapper for pretty-printing types in logs as YAML
///
/// ```ignore
/// use orgops_lineage::logging::Pretty;
/// use tracing::debug;
///
/// debug!("saving rows: {}", Pretty(&rows));
/// ```
///
/// Falls back to `{:#?}` if YAML serialization fails.
pub struct Pretty<T>(pub T);

impl<T: Serialize + Debug> std::fmt::Display for Pretty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_yaml_ng::to_string(&self.0) {
            Ok(yaml) => write!(f, "\n{}", yaml),
            Err(_) => write!(f, "\n{:#?}", self.0),
        }
    }
}
