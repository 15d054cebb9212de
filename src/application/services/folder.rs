//! Folder service
//!
//! The public Zephyr Scale API can only create and rename folders; there is
//! no endpoint to fetch or delete one.

use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;
use tracing::{debug, instrument};

use super::to_body;
use crate::application::{ApplicationResult, AuthenticatedClient};
use crate::domain::{FolderCreate, FolderUpdate};

pub struct FolderService {
    client: Arc<AuthenticatedClient>,
}

impl FolderService {
    pub fn new(client: Arc<AuthenticatedClient>) -> Self {
        Self { client }
    }

    /// Create a folder: `POST folder`.
    #[instrument(level = "debug", skip(self))]
    pub fn create(&self, folder: &FolderCreate) -> ApplicationResult<Value> {
        let body = to_body(folder)?;
        debug!("create folder body: {}", body);
        self.client.request(Method::POST, "folder", Some(&body))
    }

    /// Rename a folder: `PUT folder/{id}`.
    #[instrument(level = "debug", skip(self))]
    pub fn update(&self, folder: &FolderUpdate) -> ApplicationResult<Value> {
        let body = to_body(folder)?;
        let path = format!("folder/{}", folder.id);
        self.client.request(Method::PUT, &path, Some(&body))
    }
}
