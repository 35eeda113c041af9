//! Logging setup.

use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Logging errors.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },
}

/// Install the tracing subscriber, writing to stderr.
///
/// `RUST_LOG` takes priority over `default_level`. An unparsable `RUST_LOG` is
/// reported as a warning once the subscriber is running.
pub fn setup_logging(default_level: &str) -> Result<(), LoggingError> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let (filter, rejected) = build_filter(env.as_deref(), default_level)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(err) = rejected {
        tracing::warn!(
            error = %err,
            "Ignoring {}, using '{}'",
            EnvFilter::DEFAULT_ENV,
            default_level
        );
    }

    Ok(())
}

/// Pick the filter from the environment value or the default level.
///
/// Returns the rejected environment filter error alongside the fallback filter.
fn build_filter(
    env: Option<&str>,
    default_level: &str,
) -> Result<(EnvFilter, Option<LoggingError>), LoggingError> {
    let rejected = match env.filter(|value| !value.trim().is_empty()) {
        Some(value) => match parse_filter(value) {
            Ok(filter) => return Ok((filter, None)),
            Err(e) => Some(e),
        },
        None => None,
    };

    Ok((parse_filter(default_level)?, rejected))
}

fn parse_filter(filter: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(filter).map_err(|e| LoggingError::InvalidFilter {
        filter: filter.to_string(),
        reason: e.to_string(),
    })
}
