//! Application layer - Use cases and orchestration
//!
//! Contains the route importer, the route query engine and the port
//! definitions they run against. Infrastructure adapters implement the ports.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
