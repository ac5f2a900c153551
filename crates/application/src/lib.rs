//! Application layer - Use cases and orchestration
//!
//! Contains the collection use case and the port definitions it depends on.
//! Infrastructure adapters implement the ports.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
