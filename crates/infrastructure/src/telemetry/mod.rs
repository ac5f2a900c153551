//! Logging infrastructure
//!
//! Installs the global `tracing` subscriber: an `EnvFilter` plus a console
//! formatter, optionally emitting JSON lines.

mod subscriber;

pub use subscriber::{TelemetryError, build_env_filter, init_telemetry};
