//! Logging setup and operation timing for Parfum.
//!
//! This crate provides:
//! - `init_logging` - Installs the global `tracing` subscriber
//! - `LogConfig` / `LogLevel` / `LogFormat` - Settings read from `parfum.toml`
//! - `OperationTimer` - Logs how long a backend call or command took

mod logging;
mod timer;

pub use logging::*;
pub use timer::*;
