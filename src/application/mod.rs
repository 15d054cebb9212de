//! Application layer: credential-aware client and resource services
//!
//! This layer orchestrates domain payloads and depends on the HTTP transport trait.

pub mod client;
pub mod error;
pub mod services;

pub use client::{AuthenticatedClient, API_PREFIX};
pub use error::{ApplicationError, ApplicationResult};
