//! Structured logging for Postern.
//!
//! # Usage
//!
//! ```ignore
//! use postern_telemetry::TelemetryConfig;
//!
//! let config = TelemetryConfig::new().with_log_level("debug");
//! postern_telemetry::init(&config)?;
//! ```

pub mod config;
pub mod logging;

pub use config::{LogFormat, TelemetryConfig};
pub use logging::events;

use thiserror::Error;

/// Telemetry errors.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Failed to initialize logging.
    #[error("failed to initialize logging: {0}")]
    LoggingInit(String),
}

/// Initialize the logging subsystem for the process.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    logging::init_logging(config)
}
