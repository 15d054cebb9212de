//! Application services
//!
//! One service per Zephyr resource. Each method validates nothing itself
//! (the domain constructors already did), performs exactly one request and
//! returns the server JSON unchanged.

mod folder;
mod plan;

pub use folder::FolderService;
pub use plan::PlanService;

use serde::Serialize;
use serde_json::Value;

use crate::application::{ApplicationError, ApplicationResult};

/// Serialize a request payload into a JSON body.
fn to_body<T: Serialize>(payload: &T) -> ApplicationResult<Value> {
    serde_json::to_value(payload).map_err(|e| ApplicationError::Decode {
        message: format!("encode request body: {e}"),
    })
}
