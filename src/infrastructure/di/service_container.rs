//! Service container for dependency injection
//!
//! Wires the resource services to one authenticated client.

use std::sync::Arc;

use crate::application::services::{FolderService, PlanService};
use crate::application::AuthenticatedClient;
use crate::config::Credentials;
use crate::infrastructure::traits::{HttpTransport, ReqwestTransport};
use crate::infrastructure::{InfraError, InfraResult};

/// Container holding the services for one invocation.
pub struct ServiceContainer {
    pub folders: FolderService,
    pub plans: PlanService,
}

impl ServiceContainer {
    /// Create a container talking to the real server.
    pub fn new(credentials: &Credentials) -> InfraResult<Self> {
        let transport =
            ReqwestTransport::new().map_err(|e| InfraError::io("build HTTP client", e))?;
        Ok(Self::with_transport(credentials, Arc::new(transport)))
    }

    /// Create a container with a custom transport (for testing).
    pub fn with_transport(credentials: &Credentials, transport: Arc<dyn HttpTransport>) -> Self {
        let client = Arc::new(AuthenticatedClient::new(credentials, transport));
        Self {
            folders: FolderService::new(Arc::clone(&client)),
            plans: PlanService::new(client),
        }
    }
}
