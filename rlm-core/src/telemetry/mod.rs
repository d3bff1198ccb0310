//! Telemetry
//!
//! Structured logging setup shared by the CLI and embedding services.

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
