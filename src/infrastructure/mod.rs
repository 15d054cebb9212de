//! Infrastructure layer: HTTP transport and service wiring
//!
//! This layer implements the I/O boundary trait and wires up services.

pub mod di;
pub mod error;
pub mod traits;

pub use error::{InfraError, InfraResult};
