//! Diagnostic logging on stderr.
//!
//! `RUST_LOG` wins when set; otherwise `default_level` applies. Build output
//! proper goes to stdout through [`crate::output`], so logs never mix with it.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("invalid log filter `{filter}`: {source}")]
    Filter {
        filter: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("initialize tracing subscriber: {0}")]
    Init(String),
}

pub fn init(default_level: &str) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|source| LoggingError::Filter {
            filter: default_level.to_string(),
            source,
        })?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| LoggingError::Init(err.to_string()))?;

    Ok(())
}
